use serde::Serialize;

use super::image_analysis::ImagePackagesAnalysis;
use super::scan_result::ScanResult;

pub const OUTPUT_FORMAT_VERSION: &str = "1.0.0";

/// Top-level JSON document written by the CLI.
#[derive(Serialize, Debug)]
pub struct Output {
    pub headers: Vec<Header>,
    pub scan_results: Vec<ScanResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_packages: Option<ImagePackagesAnalysis>,
}

#[derive(Serialize, Debug)]
pub struct Header {
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub duration: f64,
    pub extra_data: ExtraData,
    pub errors: Vec<String>,
    pub output_format_version: String,
}

#[derive(Serialize, Debug)]
pub struct ExtraData {
    pub files_count: usize,
    pub directories_count: usize,
    pub excluded_count: usize,
    pub system_environment: SystemEnvironment,
}

#[derive(Serialize, Debug)]
pub struct SystemEnvironment {
    pub operating_system: Option<String>,
    pub cpu_architecture: String,
    pub platform: String,
    pub rust_version: String,
}

//! Parsed RPM package records and version formatting.
//!
//! Records arrive already parsed from a package database reader (passed in
//! as JSON by the CLI). Decoding rpmdb formats is out of scope here.

use serde::Deserialize;

/// One installed RPM package as reported by the database reader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpmPackageRecord {
    pub name: String,
    pub version: String,
    pub release: String,
    #[serde(default)]
    pub epoch: Option<u32>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// Modularity label in `name:version` form, e.g. `"python3:3.9"`.
    #[serde(default)]
    pub module: Option<String>,
}

/// Formats the epoch:version-release string for a record.
///
/// A zero epoch is treated the same as no epoch and produces no prefix.
pub fn format_evr(record: &RpmPackageRecord) -> String {
    let mut evr = String::new();

    if let Some(epoch) = record.epoch
        && epoch > 0
    {
        evr.push_str(&format!("{}:", epoch));
    }

    evr.push_str(&record.version);

    if !record.release.is_empty() {
        evr.push('-');
        evr.push_str(&record.release);
    }

    evr
}

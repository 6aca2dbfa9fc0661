mod dep_graph;
mod ecosystem;
mod image_analysis;
mod os_release;
mod output;
mod rpm_record;
mod scan_result;

pub use dep_graph::{DEP_GRAPH_SCHEMA_VERSION, DepGraph, DepGraphBuilder, Pkg, PkgInfo, PkgManager};
pub use ecosystem::Ecosystem;
pub use image_analysis::{AnalysisType, AnalyzedPackage, ImagePackagesAnalysis};
pub use os_release::OsRelease;
pub use output::{ExtraData, Header, OUTPUT_FORMAT_VERSION, Output, SystemEnvironment};
pub use rpm_record::{RpmPackageRecord, format_evr};
pub use scan_result::{Fact, Identity, ScanResult};

pub mod analysis;
pub mod cli;
pub mod events;
pub mod identity;
pub mod models;
pub mod pairing;
pub mod parsers;
pub mod scanner;
pub mod snapshot;
pub mod utils;

pub use analysis::{AnalysisInput, AnalysisOutcome, RpmInput, run_analyzers};
pub use events::{CollectingSink, EventSink, LogSink, NullSink, ScanEvent};
pub use models::{DepGraph, Ecosystem, ImagePackagesAnalysis, Output, ScanResult};
pub use scanner::{CollectResult, ScanCounts, collect, count};
pub use snapshot::FileSnapshot;

//! Filesystem walk that materializes a [`FileSnapshot`](crate::snapshot::FileSnapshot).

mod count;
mod process;

use crate::snapshot::FileSnapshot;

/// What the collection walk produced.
pub struct CollectResult {
    pub snapshot: FileSnapshot,
    pub excluded_count: usize,
    /// Read failures, one message per path. These end up in the output
    /// header; they never abort the scan.
    pub errors: Vec<String>,
}

pub use self::count::{ScanCounts, count};
pub use self::process::{DEFAULT_MAX_FILE_SIZE, collect};

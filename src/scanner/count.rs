use std::fs;
use std::io;
use std::path::Path;

use glob::Pattern;
use log::warn;

use crate::utils::file::is_path_excluded;

/// Totals from the pre-scan pass. They size the progress bar and fill the
/// output header; no file content is read to produce them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounts {
    pub files: usize,
    pub directories: usize,
    pub excluded: usize,
}

/// Counts files, directories and exclusions under `path`.
///
/// An excluded directory counts as one exclusion; nothing beneath it is
/// visited. `max_depth` of 0 stops recursion at the top directory. Only an
/// unlistable root fails the call; deeper unlistable subtrees drop out of
/// the totals, matching the collection pass.
pub fn count<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    exclude_patterns: &[Pattern],
) -> io::Result<ScanCounts> {
    let path = path.as_ref();

    if is_path_excluded(path, exclude_patterns) {
        return Ok(ScanCounts {
            excluded: 1,
            ..ScanCounts::default()
        });
    }

    let mut counts = ScanCounts {
        directories: 1,
        ..ScanCounts::default()
    };
    count_entries(path, max_depth, exclude_patterns, &mut counts)?;

    Ok(counts)
}

fn count_entries(
    path: &Path,
    max_depth: usize,
    exclude_patterns: &[Pattern],
    counts: &mut ScanCounts,
) -> io::Result<()> {
    for entry in fs::read_dir(path)?.filter_map(Result::ok) {
        let entry_path = entry.path();

        if is_path_excluded(&entry_path, exclude_patterns) {
            counts.excluded += 1;
            continue;
        }

        let Ok(metadata) = fs::metadata(&entry_path) else {
            continue;
        };

        if metadata.is_file() {
            counts.files += 1;
        } else if metadata.is_dir() {
            counts.directories += 1;
            if max_depth > 0
                && let Err(err) =
                    count_entries(&entry_path, max_depth - 1, exclude_patterns, counts)
            {
                // An unlistable subtree drops out of the totals; the
                // collection pass skips it the same way.
                warn!("failed to count {}: {}", entry_path.display(), err);
            }
        }
    }

    Ok(())
}

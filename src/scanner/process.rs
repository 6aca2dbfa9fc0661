use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Error;
use glob::Pattern;
use indicatif::ProgressBar;
use log::{debug, warn};
use rayon::prelude::*;

use crate::scanner::CollectResult;
use crate::snapshot::FileSnapshot;
use crate::utils::file::is_path_excluded;

/// Files above this size are never manifests and are skipped unread.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Walks `path` and builds a snapshot of every readable UTF-8 text file.
///
/// Snapshot keys are recorded relative to the walk root with a leading
/// `/`, so scanning an unpacked image tree yields the image-absolute paths
/// (`/etc/os-release`, `/app/pyproject.toml`) the analyzers expect.
///
/// Oversized and binary files are skipped silently: they cannot be
/// manifests, so they are not snapshot material. Read failures are recorded
/// per path and the walk continues. Only a failure to list the top
/// directory itself aborts.
pub fn collect<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    progress_bar: Arc<ProgressBar>,
    exclude_patterns: &[Pattern],
    max_file_size: u64,
) -> Result<CollectResult, Error> {
    let mut result = CollectResult {
        snapshot: FileSnapshot::new(),
        excluded_count: 0,
        errors: Vec::new(),
    };

    let root = path.as_ref();
    collect_into(
        root,
        root,
        max_depth,
        &progress_bar,
        exclude_patterns,
        max_file_size,
        &mut result,
    )?;

    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn collect_into(
    root: &Path,
    path: &Path,
    max_depth: usize,
    progress_bar: &ProgressBar,
    exclude_patterns: &[Pattern],
    max_file_size: u64,
    result: &mut CollectResult,
) -> Result<(), Error> {
    if is_path_excluded(path, exclude_patterns) {
        result.excluded_count += 1;
        return Ok(());
    }

    let mut file_entries = Vec::new();
    let mut dir_entries = Vec::new();

    for entry in fs::read_dir(path)?.filter_map(Result::ok) {
        let entry_path = entry.path();

        if is_path_excluded(&entry_path, exclude_patterns) {
            result.excluded_count += 1;
            continue;
        }

        match fs::metadata(&entry_path) {
            Ok(metadata) if metadata.is_file() => file_entries.push((entry_path, metadata)),
            Ok(metadata) if metadata.is_dir() => dir_entries.push(entry_path),
            _ => continue,
        }
    }

    // File contents are read in parallel; directory recursion stays
    // sequential so snapshot insertion needs no locking.
    let contents: Vec<(String, Result<Option<String>, String>)> = file_entries
        .par_iter()
        .map(|(entry_path, metadata)| {
            let outcome = read_textual(entry_path, metadata, max_file_size);
            progress_bar.inc(1);
            (snapshot_path(root, entry_path), outcome)
        })
        .collect();

    for (path_str, outcome) in contents {
        match outcome {
            Ok(Some(content)) => result.snapshot.insert(path_str, content),
            Ok(None) => {}
            Err(message) => result.errors.push(message),
        }
    }

    for dir_path in dir_entries {
        if max_depth > 0
            && let Err(err) = collect_into(
                root,
                &dir_path,
                max_depth - 1,
                progress_bar,
                exclude_patterns,
                max_file_size,
                result,
            )
        {
            // An unlistable subtree should not sink the whole scan.
            let message = format!("failed to scan {}: {}", dir_path.display(), err);
            warn!("{}", message);
            result.errors.push(message);
        }
    }

    Ok(())
}

/// Rewrites a host path into its position inside the scanned tree.
fn snapshot_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => format!("/{}", relative.to_string_lossy()),
        Err(_) => path.to_string_lossy().to_string(),
    }
}

fn read_textual(
    path: &Path,
    metadata: &fs::Metadata,
    max_file_size: u64,
) -> Result<Option<String>, String> {
    if metadata.len() > max_file_size {
        debug!("skipping {} ({} bytes)", path.display(), metadata.len());
        return Ok(None);
    }

    let buffer =
        fs::read(path).map_err(|err| format!("failed to read {}: {}", path.display(), err))?;

    match String::from_utf8(buffer) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            debug!("skipping non-text file {}", path.display());
            Ok(None)
        }
    }
}

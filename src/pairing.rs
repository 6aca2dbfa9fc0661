//! Manifest/lock pair discovery across a snapshot.
//!
//! Files are grouped by parent directory, then each directory is checked
//! against the recognized `{manifest, lock}` filename set of an ecosystem.
//! Only directories containing exactly those two files produce a pair;
//! anything else is skipped without guessing. Paths are opaque
//! '/'-separated strings, never touched as real filesystem paths.

use std::collections::BTreeMap;

use crate::snapshot::FileSnapshot;

/// Recognized manifest and lock filenames for one ecosystem.
#[derive(Debug, Clone, Copy)]
pub struct FilePair {
    pub manifest: &'static str,
    pub lock: &'static str,
}

/// A manifest and its lock file located together in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLockPair {
    pub directory: String,
    pub manifest_path: String,
    pub lock_path: String,
}

/// Groups snapshot paths by parent directory, keeping file base-names.
///
/// The returned map iterates in sorted directory order, so everything built
/// on top of it is deterministic for a given snapshot.
pub fn group_files_by_directory(snapshot: &FileSnapshot) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in snapshot.paths() {
        groups
            .entry(parent_directory(path).to_string())
            .or_default()
            .push(base_name(path).to_string());
    }
    groups
}

/// Finds directories containing exactly the two recognized files and emits
/// pairs with full joined paths, ordered by directory.
pub fn find_manifest_lock_pairs(
    grouped: &BTreeMap<String, Vec<String>>,
    file_pair: FilePair,
) -> Vec<ManifestLockPair> {
    let mut pairs = Vec::new();

    for (directory, file_names) in grouped {
        // Either a missing file or extra company in the directory: ignore.
        if file_names.len() != 2 {
            continue;
        }

        let has_manifest = file_names.iter().any(|name| name == file_pair.manifest);
        let has_lock = file_names.iter().any(|name| name == file_pair.lock);

        if has_manifest && has_lock {
            pairs.push(ManifestLockPair {
                directory: directory.clone(),
                manifest_path: join(directory, file_pair.manifest),
                lock_path: join(directory, file_pair.lock),
            });
        }
    }

    pairs
}

fn parent_directory(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((directory, _)) => directory,
        None => ".",
    }
}

/// Final component of a '/'-separated path.
pub fn base_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

fn join(directory: &str, name: &str) -> String {
    match directory {
        "/" => format!("/{name}"),
        "." => name.to_string(),
        _ => format!("{directory}/{name}"),
    }
}

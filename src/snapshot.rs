//! In-memory filesystem snapshot consumed by the analyzers.
//!
//! A snapshot maps absolute file paths to textual file content. It is the
//! only input the application analyzers see; nothing in the analysis layer
//! touches the filesystem. Paths are opaque '/'-separated strings exactly as
//! they appeared in the scanned tree or image layer.

use std::collections::BTreeMap;

/// Mapping from absolute file path to raw file content.
///
/// Backed by a `BTreeMap` so iteration is sorted by path, which keeps
/// directory grouping and result ordering reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct FileSnapshot {
    files: BTreeMap<String, String>,
}

impl FileSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the snapshot, replacing any previous content at `path`.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// All file paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(String, String)> for FileSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FileSnapshot {
    fn from(entries: [(&str, &str); N]) -> Self {
        entries
            .into_iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect()
    }
}

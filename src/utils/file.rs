use std::path::Path;

use glob::Pattern;

/// Check if a path should be excluded based on a list of glob patterns.
///
/// A pattern matches if it matches the full path or just the final path
/// component, so `node_modules` excludes the directory wherever it sits.
pub fn is_path_excluded(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    exclude_patterns
        .iter()
        .any(|pattern| pattern.matches(&path_str) || pattern.matches(&file_name))
}

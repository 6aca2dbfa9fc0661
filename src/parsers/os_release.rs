//! OS release detection from a snapshot.
//!
//! Reads the standard os-release locations out of the snapshot (never the
//! host filesystem) and extracts the distribution identity used to enrich
//! package qualifiers.
//!
//! Format: shell-compatible KEY=VALUE pairs, values optionally quoted with
//! single or double quotes, comments start with #.
//! Spec: https://www.freedesktop.org/software/systemd/man/os-release.html

use std::collections::HashMap;

use crate::models::OsRelease;
use crate::snapshot::FileSnapshot;

const ETC_OS_RELEASE: &str = "/etc/os-release";
const USR_LIB_OS_RELEASE: &str = "/usr/lib/os-release";

/// Looks up `/etc/os-release`, then `/usr/lib/os-release`, in the snapshot.
pub fn detect_os_release(snapshot: &FileSnapshot) -> Option<OsRelease> {
    [ETC_OS_RELEASE, USR_LIB_OS_RELEASE]
        .iter()
        .find_map(|path| snapshot.content(path).and_then(parse_os_release))
}

/// Parses os-release content.
///
/// The name comes from `ID`, falling back to a lowercased `NAME`. Returns
/// `None` unless a name and `VERSION_ID` are present: a distribution we
/// cannot fully name is worse than no context, because it would flow into
/// identity qualifiers.
pub fn parse_os_release(content: &str) -> Option<OsRelease> {
    let fields = parse_key_value_pairs(content);

    let name = fields
        .get("ID")
        .cloned()
        .filter(|id| !id.is_empty())
        .or_else(|| fields.get("NAME").map(|name| name.to_ascii_lowercase()))?;
    let version = fields.get("VERSION_ID")?.clone();
    if name.is_empty() || version.is_empty() {
        return None;
    }

    Some(OsRelease {
        name,
        version,
        pretty_name: fields.get("PRETTY_NAME").cloned(),
    })
}

fn parse_key_value_pairs(content: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            fields.insert(key.trim().to_string(), unquote(value.trim()));
        }
    }

    fields
}

fn unquote(s: &str) -> String {
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

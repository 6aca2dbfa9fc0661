/// Distribution context attached at analysis time.
///
/// Enriches identity qualifiers (`distro`, vendor namespace) for installed
/// OS packages. Never stored inside a package record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    /// Distribution identifier, e.g. `"centos"`.
    pub name: String,
    /// Distribution version identifier, e.g. `"8"`.
    pub version: String,
    /// Human-readable name, e.g. `"CentOS Linux 8"`.
    pub pretty_name: Option<String>,
}

impl OsRelease {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            pretty_name: None,
        }
    }
}

//! Ecosystem identifiers for the analyzer registry.

use std::fmt;

/// Package ecosystem handled by an analyzer.
///
/// The set is closed on purpose: adding a package manager means adding a
/// variant here and an analyzer to the registry, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Poetry,
    Rpm,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poetry => "poetry",
            Self::Rpm => "rpm",
        }
    }

    /// Package URL type for identifiers in this ecosystem.
    pub fn purl_type(&self) -> &'static str {
        match self {
            Self::Poetry => "pypi",
            Self::Rpm => "rpm",
        }
    }
}

impl AsRef<str> for Ecosystem {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(Ecosystem::Poetry.as_str(), "poetry");
        assert_eq!(Ecosystem::Rpm.as_str(), "rpm");
    }

    #[test]
    fn test_purl_type() {
        assert_eq!(Ecosystem::Poetry.purl_type(), "pypi");
        assert_eq!(Ecosystem::Rpm.purl_type(), "rpm");
    }
}

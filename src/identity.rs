//! Canonical package identity encoding.
//!
//! Builds Package URL strings for installed packages. Qualifier selection
//! and ordering live here; percent-encoding and canonical serialization
//! belong to the `packageurl` crate.

use std::fmt;

use packageurl::PackageUrl;

use crate::models::{Ecosystem, OsRelease, RpmPackageRecord, format_evr};

/// The underlying encoder rejected a component of the identity.
///
/// Does not happen for well-formed records; when it does, the caller drops
/// that single record and continues.
#[derive(Debug)]
pub struct IdentityError(packageurl::Error);

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to encode package url: {}", self.0)
    }
}

impl std::error::Error for IdentityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<packageurl::Error> for IdentityError {
    fn from(err: packageurl::Error) -> Self {
        Self(err)
    }
}

/// Encodes the canonical identity of one installed RPM package.
///
/// Qualifiers are selected in the fixed order module, repositories, epoch,
/// distro. The version is the formatted EVR string. With OS-release context
/// the distribution name doubles as the purl namespace; without it the
/// namespace stays empty.
pub fn rpm_purl(
    record: &RpmPackageRecord,
    repositories: &[String],
    os_release: Option<&OsRelease>,
) -> Result<String, IdentityError> {
    let mut qualifiers: Vec<(&'static str, String)> = Vec::new();

    if let Some(module) = &record.module {
        qualifiers.push(("module", module_qualifier_value(module)));
    }

    if !repositories.is_empty() {
        qualifiers.push(("repositories", repositories.join(",")));
    }

    if let Some(epoch) = record.epoch
        && epoch > 0
    {
        qualifiers.push(("epoch", epoch.to_string()));
    }

    let mut vendor = None;
    if let Some(os_release) = os_release {
        qualifiers.push(("distro", format!("{}-{}", os_release.name, os_release.version)));
        vendor = Some(os_release.name.as_str());
    }

    // Absence and emptiness are different things to the encoder: an empty
    // qualifier collection must never reach it.
    let qualifiers = if qualifiers.is_empty() {
        None
    } else {
        Some(qualifiers)
    };

    let mut purl = PackageUrl::new(Ecosystem::Rpm.purl_type(), record.name.clone())?;

    if let Some(vendor) = vendor {
        purl.with_namespace(vendor.to_string())?;
    }

    purl.with_version(format_evr(record))?;

    if let Some(qualifiers) = qualifiers {
        for (key, value) in qualifiers {
            purl.add_qualifier(key, value)?;
        }
    }

    Ok(purl.to_string())
}

/// Reduces a modularity label to its `name:stream` head. Contract inputs
/// are already two segments; longer labels carry build context that is not
/// part of the identity.
fn module_qualifier_value(module: &str) -> String {
    let mut parts = module.splitn(3, ':');
    match (parts.next(), parts.next()) {
        (Some(name), Some(stream)) => format!("{}:{}", name, stream),
        _ => module.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, version: &str, release: &str) -> RpmPackageRecord {
        RpmPackageRecord {
            name: name.to_string(),
            version: version.to_string(),
            release: release.to_string(),
            epoch: None,
            arch: None,
            size: None,
            module: None,
        }
    }

    #[test]
    fn test_minimal_purl_has_no_qualifier_segment() {
        let purl = rpm_purl(&record("bash", "5.1.8", "9.el9"), &[], None).unwrap();

        assert_eq!(purl, "pkg:rpm/bash@5.1.8-9.el9");
        assert!(!purl.contains('?'), "No qualifiers means no '?' segment");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let mut pkg = record("httpd", "2.4.37", "43.module+el8");
        pkg.epoch = Some(1);
        pkg.module = Some("httpd:2.4".to_string());
        let repositories = vec!["baseos".to_string(), "appstream".to_string()];
        let os_release = OsRelease::new("rhel", "8.4");

        let first = rpm_purl(&pkg, &repositories, Some(&os_release)).unwrap();
        let second = rpm_purl(&pkg, &repositories, Some(&os_release)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_qualifier_set() {
        let mut pkg = record("python3", "3.9.2", "1.el8");
        pkg.epoch = Some(2);
        pkg.module = Some("python3:3.9".to_string());
        let repositories = vec!["baseos".to_string(), "appstream".to_string()];

        let purl = rpm_purl(&pkg, &repositories, None).unwrap();

        // The serializer canonicalizes qualifier order, so building the same
        // set by hand in a different insertion order must give the same
        // string. That pins the qualifier set without assuming an encoding.
        let mut expected = PackageUrl::new("rpm", "python3").unwrap();
        expected.with_version("2:3.9.2-1.el8").unwrap();
        expected.add_qualifier("epoch", "2").unwrap();
        expected
            .add_qualifier("repositories", "baseos,appstream")
            .unwrap();
        expected.add_qualifier("module", "python3:3.9").unwrap();

        assert_eq!(purl, expected.to_string());
        assert!(purl.contains("epoch=2"));
    }

    #[test]
    fn test_os_release_sets_vendor_and_distro() {
        let pkg = record("openssl", "1.1.1k", "6.el8_5");
        let os_release = OsRelease::new("centos", "8");

        let purl = rpm_purl(&pkg, &[], Some(&os_release)).unwrap();

        assert!(purl.starts_with("pkg:rpm/centos/openssl@"));
        assert!(purl.contains("distro=centos-8"));
    }

    #[test]
    fn test_zero_epoch_emits_no_qualifier() {
        let mut pkg = record("bash", "5.1.8", "9.el9");
        pkg.epoch = Some(0);

        let purl = rpm_purl(&pkg, &[], None).unwrap();
        assert!(!purl.contains("epoch"));
        assert!(!purl.contains('?'));
    }

    #[test]
    fn test_epoch_prefixes_version() {
        let mut pkg = record("dbus", "1.12.8", "14.el8");
        pkg.epoch = Some(1);

        let purl = rpm_purl(&pkg, &[], None).unwrap();
        assert!(purl.contains("@1%3A1.12.8-14.el8") || purl.contains("@1:1.12.8-14.el8"));
        assert!(purl.contains("epoch=1"));
    }

    #[test]
    fn test_module_qualifier_value_truncates_long_labels() {
        assert_eq!(
            module_qualifier_value("nodejs:12:8030020201124152102:229f0a1c"),
            "nodejs:12"
        );
        assert_eq!(module_qualifier_value("python3:3.9"), "python3:3.9");
        assert_eq!(module_qualifier_value("plain"), "plain");
    }
}

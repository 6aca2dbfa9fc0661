//! Flat RPM package analyzer.
//!
//! Produces one analyzed entry per installed package record, identity
//! attached. No dependency edges: the RPM report is an inventory, not a
//! graph. A record whose identity cannot be encoded is dropped with a
//! warning and the rest of the inventory stands.

use std::collections::BTreeMap;

use log::warn;

use super::{AnalysisInput, EcosystemAnalyzer, EcosystemReport, RpmInput};
use crate::events::EventSink;
use crate::identity::rpm_purl;
use crate::models::{AnalysisType, AnalyzedPackage, Ecosystem, ImagePackagesAnalysis, format_evr};

pub struct RpmAnalyzer;

impl EcosystemAnalyzer for RpmAnalyzer {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rpm
    }

    fn analyze(
        &self,
        input: &AnalysisInput<'_>,
        _events: &dyn EventSink,
    ) -> Option<EcosystemReport> {
        let rpm = input.rpm.as_ref()?;
        Some(EcosystemReport::OsPackages(analyze_records(rpm)))
    }
}

fn analyze_records(input: &RpmInput<'_>) -> ImagePackagesAnalysis {
    let analysis = input
        .records
        .iter()
        .filter_map(|record| {
            let purl = match rpm_purl(record, input.repositories, input.os_release) {
                Ok(purl) => purl,
                Err(err) => {
                    warn!("dropping rpm record {}: {}", record.name, err);
                    return None;
                }
            };

            Some(AnalyzedPackage {
                name: record.name.clone(),
                version: format_evr(record),
                source: None,
                provides: Vec::new(),
                deps: BTreeMap::new(),
                auto_installed: None,
                purl,
            })
        })
        .collect();

    ImagePackagesAnalysis {
        image: input.image.to_string(),
        analyze_type: AnalysisType::Rpm,
        analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use crate::models::{OsRelease, RpmPackageRecord};
    use crate::snapshot::FileSnapshot;

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

    fn analyze(rpm: Option<RpmInput<'_>>) -> Option<EcosystemReport> {
        let snapshot = FileSnapshot::new();
        let input = AnalysisInput {
            snapshot: &snapshot,
            rpm,
        };
        RpmAnalyzer.analyze(&input, &NullSink)
    }

    #[test]
    fn test_without_records_there_is_no_report() {
        assert!(analyze(None).is_none());
    }

    #[test]
    fn test_empty_record_list_yields_empty_analysis() {
        let report = analyze(Some(RpmInput {
            image: "registry.example.com/base:9",
            records: &[],
            repositories: &[],
            os_release: None,
        }));

        match report {
            Some(EcosystemReport::OsPackages(analysis)) => {
                assert_eq!(analysis.image, "registry.example.com/base:9");
                assert_eq!(analysis.analyze_type, AnalysisType::Rpm);
                assert!(analysis.analysis.is_empty());
            }
            other => panic!("expected an os package report, got {:?}", other),
        }
    }

    #[test]
    fn test_one_entry_per_record_with_no_edges() {
        let records = vec![
            record("bash", "5.1.8", "9.el9"),
            record("openssl", "3.0.7", "27.el9"),
        ];
        let report = analyze(Some(RpmInput {
            image: "base:9",
            records: &records,
            repositories: &[],
            os_release: None,
        }));

        let analysis = match report {
            Some(EcosystemReport::OsPackages(analysis)) => analysis,
            other => panic!("expected an os package report, got {:?}", other),
        };

        assert_eq!(analysis.analysis.len(), 2);
        let bash = &analysis.analysis[0];
        assert_eq!(bash.name, "bash");
        assert_eq!(bash.version, "5.1.8-9.el9");
        assert_eq!(bash.purl, "pkg:rpm/bash@5.1.8-9.el9");
        assert!(bash.provides.is_empty());
        assert!(bash.deps.is_empty());
        assert_eq!(bash.source, None);
        assert_eq!(bash.auto_installed, None);
    }

    #[test]
    fn test_version_is_the_full_evr() {
        let mut gpg = record("gnupg2", "2.3.3", "4.el9");
        gpg.epoch = Some(2);

        let records = vec![gpg];
        let report = analyze(Some(RpmInput {
            image: "base:9",
            records: &records,
            repositories: &[],
            os_release: None,
        }));

        let analysis = match report {
            Some(EcosystemReport::OsPackages(analysis)) => analysis,
            other => panic!("expected an os package report, got {:?}", other),
        };

        assert_eq!(analysis.analysis[0].version, "2:2.3.3-4.el9");
    }

    #[test]
    fn test_vendor_namespace_from_os_release() {
        let records = vec![record("bash", "5.1.8", "9.el9")];
        let os_release = OsRelease::new("centos", "9");
        let report = analyze(Some(RpmInput {
            image: "base:9",
            records: &records,
            repositories: &[],
            os_release: Some(&os_release),
        }));

        let analysis = match report {
            Some(EcosystemReport::OsPackages(analysis)) => analysis,
            other => panic!("expected an os package report, got {:?}", other),
        };

        let purl = &analysis.analysis[0].purl;
        assert!(
            purl.starts_with("pkg:rpm/centos/bash@"),
            "vendor should be the purl namespace, got {}",
            purl
        );
        assert!(purl.contains("distro=centos-9"), "got {}", purl);
    }
}

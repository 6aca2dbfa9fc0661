//! Ecosystem analyzers.
//!
//! One analyzer per supported ecosystem, each turning its slice of the scan
//! input into a report. The set is closed on purpose: adding an ecosystem
//! means writing an analyzer and listing it in [`analyzers`], not wiring up
//! a plugin registry.

mod python;
mod rpm;

pub use self::python::PoetryAnalyzer;
pub use self::rpm::RpmAnalyzer;

use crate::events::EventSink;
use crate::models::{Ecosystem, ImagePackagesAnalysis, OsRelease, RpmPackageRecord, ScanResult};
use crate::snapshot::FileSnapshot;

/// Everything a scan run hands to the analyzers.
pub struct AnalysisInput<'a> {
    pub snapshot: &'a FileSnapshot,
    pub rpm: Option<RpmInput<'a>>,
}

/// OS package inputs, present only when the caller supplied package records.
pub struct RpmInput<'a> {
    pub image: &'a str,
    pub records: &'a [RpmPackageRecord],
    pub repositories: &'a [String],
    pub os_release: Option<&'a OsRelease>,
}

/// What one analyzer produced.
#[derive(Debug)]
pub enum EcosystemReport {
    Applications(Vec<ScanResult>),
    OsPackages(ImagePackagesAnalysis),
}

pub trait EcosystemAnalyzer: Sync {
    fn ecosystem(&self) -> Ecosystem;

    /// Runs the analyzer over the input. `None` means the input carried
    /// nothing for this ecosystem, as opposed to an empty report.
    fn analyze(
        &self,
        input: &AnalysisInput<'_>,
        events: &dyn EventSink,
    ) -> Option<EcosystemReport>;
}

/// The full, fixed analyzer set.
pub fn analyzers() -> &'static [&'static dyn EcosystemAnalyzer] {
    const ANALYZERS: &[&dyn EcosystemAnalyzer] = &[&PoetryAnalyzer, &RpmAnalyzer];
    ANALYZERS
}

/// Merged output of a full analyzer sweep.
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub scan_results: Vec<ScanResult>,
    pub image_packages: Option<ImagePackagesAnalysis>,
}

/// Runs every registered analyzer and merges the reports.
pub fn run_analyzers(input: &AnalysisInput<'_>, events: &dyn EventSink) -> AnalysisOutcome {
    let mut outcome = AnalysisOutcome::default();

    for analyzer in analyzers() {
        match analyzer.analyze(input, events) {
            Some(EcosystemReport::Applications(results)) => {
                outcome.scan_results.extend(results);
            }
            Some(EcosystemReport::OsPackages(analysis)) => {
                outcome.image_packages = Some(analysis);
            }
            None => {}
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_set_is_closed_and_ordered() {
        let kinds: Vec<Ecosystem> = analyzers()
            .iter()
            .map(|analyzer| analyzer.ecosystem())
            .collect();
        assert_eq!(kinds, vec![Ecosystem::Poetry, Ecosystem::Rpm]);
    }
}

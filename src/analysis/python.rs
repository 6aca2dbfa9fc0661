//! Poetry application analyzer.
//!
//! Walks the snapshot for directories holding exactly a `pyproject.toml`
//! plus `poetry.lock` pair, builds one dependency graph per pair, and wraps
//! each graph in a scan result. Pairs are independent: a pair that fails to
//! parse is logged, reported to the event sink and dropped while the rest of
//! the scan carries on.

use log::warn;
use rayon::prelude::*;

use super::{AnalysisInput, EcosystemAnalyzer, EcosystemReport};
use crate::events::{EventSink, ScanEvent};
use crate::models::{DepGraph, Ecosystem, Fact, Identity, ScanResult};
use crate::pairing::{
    ManifestLockPair, base_name, find_manifest_lock_pairs, group_files_by_directory,
};
use crate::parsers::poetry;

pub struct PoetryAnalyzer;

impl EcosystemAnalyzer for PoetryAnalyzer {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Poetry
    }

    fn analyze(
        &self,
        input: &AnalysisInput<'_>,
        events: &dyn EventSink,
    ) -> Option<EcosystemReport> {
        let grouped = group_files_by_directory(input.snapshot);
        let pairs = find_manifest_lock_pairs(&grouped, poetry::FILE_PAIR);

        for pair in &pairs {
            events.emit(ScanEvent::PairDiscovered {
                directory: pair.directory.clone(),
                manifest: pair.manifest_path.clone(),
                lock: pair.lock_path.clone(),
            });
        }

        // Pairs never share state, so each one parses on its own worker.
        // `collect` keeps the discovery order regardless of which worker
        // finishes first.
        let results: Vec<ScanResult> = pairs
            .par_iter()
            .filter_map(|pair| analyze_pair(input, pair, events))
            .collect();

        Some(EcosystemReport::Applications(results))
    }
}

fn analyze_pair(
    input: &AnalysisInput<'_>,
    pair: &ManifestLockPair,
    events: &dyn EventSink,
) -> Option<ScanResult> {
    let manifest_content = match input.snapshot.content(&pair.manifest_path) {
        Some(content) => content,
        None => {
            warn!("{} vanished from the snapshot, skipping", pair.manifest_path);
            return None;
        }
    };
    let lock_content = match input.snapshot.content(&pair.lock_path) {
        Some(content) => content,
        None => {
            warn!("{} vanished from the snapshot, skipping", pair.lock_path);
            return None;
        }
    };

    events.emit(ScanEvent::ParseAttempted {
        manifest_path: pair.manifest_path.clone(),
    });

    match poetry::build_dep_graph(
        manifest_content,
        lock_content,
        poetry::INCLUDE_DEV_DEPENDENCIES,
    ) {
        Ok(graph) => {
            events.emit(ScanEvent::ParseSucceeded {
                manifest_path: pair.manifest_path.clone(),
                package_count: graph.package_count(),
            });
            Some(assemble_result(pair, graph))
        }
        Err(err) => {
            warn!(
                "could not build a dependency graph for {}: {}",
                pair.manifest_path, err
            );
            events.emit(ScanEvent::ParseFailed {
                manifest_path: pair.manifest_path.clone(),
                reason: err.to_string(),
            });
            None
        }
    }
}

fn assemble_result(pair: &ManifestLockPair, graph: DepGraph) -> ScanResult {
    let identity = Identity {
        // Read back from the graph rather than assumed, so the identity can
        // never disagree with the fact it describes.
        package_manager: graph.package_manager().to_string(),
        target_file: Some(pair.manifest_path.clone()),
    };

    let tested_files = vec![
        base_name(&pair.manifest_path).to_string(),
        base_name(&pair.lock_path).to_string(),
    ];

    ScanResult {
        facts: vec![Fact::DepGraph(graph), Fact::TestedFiles(tested_files)],
        identity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CollectingSink, NullSink};
    use crate::snapshot::FileSnapshot;

    const MANIFEST: &str = r#"
[tool.poetry]
name = "webapp"
version = "0.1.0"

[tool.poetry.dependencies]
python = "^3.9"
flask = "^2.0"
"#;

    const LOCK: &str = r#"
[[package]]
name = "flask"
version = "2.0.3"
"#;

    fn run(snapshot: &FileSnapshot, events: &dyn EventSink) -> Vec<ScanResult> {
        let input = AnalysisInput {
            snapshot,
            rpm: None,
        };
        match PoetryAnalyzer.analyze(&input, events) {
            Some(EcosystemReport::Applications(results)) => results,
            other => panic!("expected an application report, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_snapshot_yields_empty_report() {
        let results = run(&FileSnapshot::new(), &NullSink);
        assert!(results.is_empty());
    }

    #[test]
    fn test_one_pair_yields_one_result() {
        let snapshot = FileSnapshot::from([
            ("/srv/app/pyproject.toml", MANIFEST),
            ("/srv/app/poetry.lock", LOCK),
        ]);

        let results = run(&snapshot, &NullSink);
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.identity.package_manager, "poetry");
        assert_eq!(
            result.identity.target_file.as_deref(),
            Some("/srv/app/pyproject.toml")
        );
        assert_eq!(
            result.tested_files().unwrap(),
            &["pyproject.toml".to_string(), "poetry.lock".to_string()]
        );
        assert_eq!(result.dep_graph().unwrap().package_count(), 2);
    }

    #[test]
    fn test_results_keep_directory_order() {
        let snapshot = FileSnapshot::from([
            ("/zeta/pyproject.toml", MANIFEST),
            ("/zeta/poetry.lock", LOCK),
            ("/alpha/pyproject.toml", MANIFEST),
            ("/alpha/poetry.lock", LOCK),
        ]);

        let results = run(&snapshot, &NullSink);
        let targets: Vec<&str> = results
            .iter()
            .filter_map(|result| result.identity.target_file.as_deref())
            .collect();
        assert_eq!(targets, vec!["/alpha/pyproject.toml", "/zeta/pyproject.toml"]);
    }

    #[test]
    fn test_broken_pair_does_not_stop_the_others() {
        let snapshot = FileSnapshot::from([
            ("/bad/pyproject.toml", "not [ valid toml"),
            ("/bad/poetry.lock", LOCK),
            ("/good/pyproject.toml", MANIFEST),
            ("/good/poetry.lock", LOCK),
        ]);

        let sink = CollectingSink::new();
        let results = run(&snapshot, &sink);

        assert_eq!(results.len(), 1, "only the healthy pair should survive");
        assert_eq!(
            results[0].identity.target_file.as_deref(),
            Some("/good/pyproject.toml")
        );

        assert_eq!(
            sink.count_matching(|event| matches!(event, ScanEvent::PairDiscovered { .. })),
            2
        );
        assert_eq!(
            sink.count_matching(|event| matches!(event, ScanEvent::ParseFailed { .. })),
            1
        );
        assert_eq!(
            sink.count_matching(|event| matches!(event, ScanEvent::ParseSucceeded { .. })),
            1
        );
    }

    #[test]
    fn test_directory_with_extra_file_is_not_analyzed() {
        let snapshot = FileSnapshot::from([
            ("/srv/app/pyproject.toml", MANIFEST),
            ("/srv/app/poetry.lock", LOCK),
            ("/srv/app/setup.py", ""),
        ]);

        let sink = CollectingSink::new();
        let results = run(&snapshot, &sink);

        assert!(results.is_empty());
        assert!(sink.events().is_empty(), "nothing should even be attempted");
    }
}

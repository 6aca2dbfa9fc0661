//! Ecosystem-agnostic scan result records.
//!
//! A scan result carries typed facts plus an identity descriptor telling the
//! downstream consumer which package manager produced the data and which
//! file it was built from. Field casing in the JSON output is part of the
//! contract and is pinned by tests.

use serde::Serialize;

use super::dep_graph::DepGraph;

/// Typed payload attached to a scan result.
///
/// Serializes as `{"type": <tag>, "data": <payload>}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Fact {
    DepGraph(DepGraph),
    TestedFiles(Vec<String>),
}

/// Which package manager the result belongs to and which manifest produced
/// it. `package_manager` is read from the dependency graph's own tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(rename = "type")]
    pub package_manager: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_file: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub facts: Vec<Fact>,
    pub identity: Identity,
}

impl ScanResult {
    pub fn dep_graph(&self) -> Option<&DepGraph> {
        self.facts.iter().find_map(|fact| match fact {
            Fact::DepGraph(graph) => Some(graph),
            _ => None,
        })
    }

    pub fn tested_files(&self) -> Option<&[String]> {
        self.facts.iter().find_map(|fact| match fact {
            Fact::TestedFiles(files) => Some(files.as_slice()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dep_graph::{DepGraphBuilder, PkgInfo};

    fn sample_result() -> ScanResult {
        let builder =
            DepGraphBuilder::new("poetry", PkgInfo::new("app", Some("1.0.0".to_string())));
        let graph = builder.build();
        ScanResult {
            facts: vec![
                Fact::DepGraph(graph),
                Fact::TestedFiles(vec![
                    "pyproject.toml".to_string(),
                    "poetry.lock".to_string(),
                ]),
            ],
            identity: Identity {
                package_manager: "poetry".to_string(),
                target_file: Some("/app/pyproject.toml".to_string()),
            },
        }
    }

    #[test]
    fn test_fact_serialization_tags() {
        let value = serde_json::to_value(sample_result()).unwrap();
        let facts = value["facts"].as_array().unwrap();

        assert_eq!(facts[0]["type"], "depGraph");
        assert_eq!(facts[0]["data"]["pkgManager"]["name"], "poetry");
        assert_eq!(facts[1]["type"], "testedFiles");
        assert_eq!(
            facts[1]["data"],
            serde_json::json!(["pyproject.toml", "poetry.lock"])
        );
    }

    #[test]
    fn test_identity_serialization_keys() {
        let value = serde_json::to_value(sample_result()).unwrap();

        assert_eq!(value["identity"]["type"], "poetry");
        assert_eq!(value["identity"]["targetFile"], "/app/pyproject.toml");
    }

    #[test]
    fn test_fact_accessors() {
        let result = sample_result();

        assert_eq!(result.dep_graph().unwrap().package_manager(), "poetry");
        assert_eq!(
            result.tested_files().unwrap(),
            &["pyproject.toml".to_string(), "poetry.lock".to_string()]
        );
    }
}

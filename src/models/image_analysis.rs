//! Flat per-image package analysis records.
//!
//! The RPM path produces one entry per installed package with no dependency
//! edges. Output keys are PascalCase; `Source` and `AutoInstalled` are
//! omitted entirely when absent rather than serialized as null.

use std::collections::BTreeMap;

use serde::Serialize;

/// Kind of flat analysis carried by an [`ImagePackagesAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Rpm,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rpm => "Rpm",
        }
    }
}

impl Serialize for AnalysisType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One installed package, identity included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzedPackage {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub provides: Vec<String>,
    pub deps: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_installed: Option<bool>,
    pub purl: String,
}

/// Flat package inventory for one image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImagePackagesAnalysis {
    pub image: String,
    pub analyze_type: AnalysisType,
    pub analysis: Vec<AnalyzedPackage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_serializes_with_pascal_case_keys() {
        let analysis = ImagePackagesAnalysis {
            image: "registry.example.com/base:9".to_string(),
            analyze_type: AnalysisType::Rpm,
            analysis: vec![AnalyzedPackage {
                name: "bash".to_string(),
                version: "5.1.8-9.el9".to_string(),
                source: None,
                provides: Vec::new(),
                deps: BTreeMap::new(),
                auto_installed: None,
                purl: "pkg:rpm/bash@5.1.8-9.el9".to_string(),
            }],
        };

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["Image"], "registry.example.com/base:9");
        assert_eq!(value["AnalyzeType"], "Rpm");

        let entry = &value["Analysis"][0];
        assert_eq!(entry["Name"], "bash");
        assert_eq!(entry["Version"], "5.1.8-9.el9");
        assert_eq!(entry["Provides"], serde_json::json!([]));
        assert_eq!(entry["Deps"], serde_json::json!({}));
        assert_eq!(entry["Purl"], "pkg:rpm/bash@5.1.8-9.el9");
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let entry = AnalyzedPackage {
            name: "bash".to_string(),
            version: "5.1.8-9.el9".to_string(),
            source: None,
            provides: Vec::new(),
            deps: BTreeMap::new(),
            auto_installed: None,
            purl: "pkg:rpm/bash@5.1.8-9.el9".to_string(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("Source").is_none());
        assert!(value.get("AutoInstalled").is_none());
    }
}

//! Poetry manifest/lock parsing into dependency graphs.
//!
//! Consumes the raw text of a `pyproject.toml` and its sibling
//! `poetry.lock` and produces a dependency graph rooted at the project
//! package. Direct dependencies come from the manifest; resolved versions
//! and transitive edges come from the lock file. The graph carries the
//! `poetry` package-manager tag that downstream identity descriptors read
//! back.
//!
//! # Implementation Notes
//! - Package names are normalized (lowercase, runs of `-_.` collapse to
//!   `-`) before any manifest/lock matching, so spelling differences
//!   between the two files still resolve.
//! - The `python` interpreter constraint is not a package and never enters
//!   the graph.
//! - A dependency referenced by a lock entry but missing from the lock is
//!   skipped with a warning; no placeholder node is invented for it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use log::warn;
use toml::Value as TomlValue;
use toml::map::Map as TomlMap;

use crate::models::{DepGraph, DepGraphBuilder, PkgInfo};
use crate::pairing::FilePair;

pub const PACKAGE_MANAGER: &str = "poetry";

pub const FILE_PAIR: FilePair = FilePair {
    manifest: "pyproject.toml",
    lock: "poetry.lock",
};

/// Fixed policy: non-production dependency groups stay out of the graph.
pub const INCLUDE_DEV_DEPENDENCIES: bool = false;

const FIELD_TOOL: &str = "tool";
const FIELD_POETRY: &str = "poetry";
const FIELD_NAME: &str = "name";
const FIELD_VERSION: &str = "version";
const FIELD_DEPENDENCIES: &str = "dependencies";
const FIELD_DEV_DEPENDENCIES: &str = "dev-dependencies";
const FIELD_GROUP: &str = "group";
const FIELD_PACKAGE: &str = "package";

const PYTHON_PSEUDO_DEPENDENCY: &str = "python";

/// Why a manifest/lock pair could not be turned into a graph.
#[derive(Debug)]
pub enum PoetryError {
    ManifestSyntax(toml::de::Error),
    LockSyntax(toml::de::Error),
    ManifestShape(String),
    LockShape(String),
}

impl fmt::Display for PoetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestSyntax(err) => write!(f, "invalid pyproject.toml: {}", err),
            Self::LockSyntax(err) => write!(f, "invalid poetry.lock: {}", err),
            Self::ManifestShape(msg) => write!(f, "unusable pyproject.toml: {}", msg),
            Self::LockShape(msg) => write!(f, "unusable poetry.lock: {}", msg),
        }
    }
}

impl std::error::Error for PoetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ManifestSyntax(err) | Self::LockSyntax(err) => Some(err),
            _ => None,
        }
    }
}

struct Manifest {
    name: String,
    version: Option<String>,
    dependencies: Vec<String>,
    dev_dependencies: Vec<String>,
}

struct LockedPackage {
    name: String,
    version: String,
    dependencies: Vec<String>,
}

/// Builds the dependency graph for one manifest/lock pair.
///
/// Fails only on malformed input; resolution gaps inside a well-formed lock
/// degrade to skipped subtrees instead of errors.
pub fn build_dep_graph(
    manifest_content: &str,
    lock_content: &str,
    include_dev_dependencies: bool,
) -> Result<DepGraph, PoetryError> {
    let manifest = parse_manifest(manifest_content)?;
    let lock = parse_lock(lock_content)?;

    let root = PkgInfo::new(manifest.name.clone(), manifest.version.clone());
    let mut builder = DepGraphBuilder::new(PACKAGE_MANAGER, root);
    let root_id = builder.root_node_id().to_string();

    let mut queue: VecDeque<(String, String)> = VecDeque::new();
    for name in &manifest.dependencies {
        queue.push_back((name.clone(), root_id.clone()));
    }
    if include_dev_dependencies {
        for name in &manifest.dev_dependencies {
            queue.push_back((name.clone(), root_id.clone()));
        }
    }

    let mut visited: BTreeSet<String> = BTreeSet::new();

    while let Some((name, parent_id)) = queue.pop_front() {
        let locked = match lock.get(&name) {
            Some(locked) => locked,
            None => {
                warn!("dependency {} is not in the lockfile, skipping its subtree", name);
                continue;
            }
        };

        let node_id = builder.add_package(PkgInfo::new(
            locked.name.clone(),
            Some(locked.version.clone()),
        ));
        builder.connect(&parent_id, &node_id);

        // First visit expands children; later visits only add the edge, so
        // cycles terminate.
        if visited.insert(name) {
            for dependency in &locked.dependencies {
                queue.push_back((dependency.clone(), node_id.clone()));
            }
        }
    }

    Ok(builder.build())
}

fn parse_manifest(content: &str) -> Result<Manifest, PoetryError> {
    let value: TomlValue = toml::from_str(content).map_err(PoetryError::ManifestSyntax)?;

    let poetry_table = value
        .get(FIELD_TOOL)
        .and_then(|tool| tool.get(FIELD_POETRY))
        .and_then(|poetry| poetry.as_table())
        .ok_or_else(|| PoetryError::ManifestShape("missing [tool.poetry] section".to_string()))?;

    let name = poetry_table
        .get(FIELD_NAME)
        .and_then(|name| name.as_str())
        .ok_or_else(|| PoetryError::ManifestShape("missing project name".to_string()))?
        .to_string();

    let version = poetry_table
        .get(FIELD_VERSION)
        .and_then(|version| version.as_str())
        .map(|version| version.to_string());

    let dependencies = dependency_names(
        poetry_table
            .get(FIELD_DEPENDENCIES)
            .and_then(|deps| deps.as_table()),
    );

    let mut dev_dependencies = dependency_names(
        poetry_table
            .get(FIELD_DEV_DEPENDENCIES)
            .and_then(|deps| deps.as_table()),
    );

    // Newer manifests declare [tool.poetry.group.<name>.dependencies]; every
    // named group is non-production.
    if let Some(groups) = poetry_table
        .get(FIELD_GROUP)
        .and_then(|groups| groups.as_table())
    {
        for group in groups.values() {
            dev_dependencies.extend(dependency_names(
                group
                    .get(FIELD_DEPENDENCIES)
                    .and_then(|deps| deps.as_table()),
            ));
        }
    }

    Ok(Manifest {
        name,
        version,
        dependencies,
        dev_dependencies,
    })
}

fn parse_lock(content: &str) -> Result<BTreeMap<String, LockedPackage>, PoetryError> {
    let value: TomlValue = toml::from_str(content).map_err(PoetryError::LockSyntax)?;

    let entries = match value.get(FIELD_PACKAGE) {
        // A lock for a project without dependencies has no [[package]] array.
        None => return Ok(BTreeMap::new()),
        Some(entries) => entries
            .as_array()
            .ok_or_else(|| PoetryError::LockShape("'package' is not an array".to_string()))?,
    };

    let mut lock = BTreeMap::new();

    for entry in entries {
        let entry = match entry.as_table() {
            Some(entry) => entry,
            None => continue,
        };

        let name = match entry.get(FIELD_NAME).and_then(|name| name.as_str()) {
            Some(name) => name,
            None => {
                warn!("poetry.lock package entry without a name, skipping");
                continue;
            }
        };

        let version = match entry.get(FIELD_VERSION).and_then(|version| version.as_str()) {
            Some(version) => version,
            None => {
                warn!("poetry.lock entry for {} has no version, skipping", name);
                continue;
            }
        };

        lock.insert(
            normalize_package_name(name),
            LockedPackage {
                name: name.to_string(),
                version: version.to_string(),
                dependencies: dependency_names(
                    entry
                        .get(FIELD_DEPENDENCIES)
                        .and_then(|deps| deps.as_table()),
                ),
            },
        );
    }

    Ok(lock)
}

/// Normalized names of the dependencies declared in a TOML table, with the
/// interpreter constraint filtered out. Values are ignored: the lock file
/// owns version resolution.
fn dependency_names(table: Option<&TomlMap<String, TomlValue>>) -> Vec<String> {
    let mut names = Vec::new();

    if let Some(table) = table {
        for name in table.keys() {
            if name.eq_ignore_ascii_case(PYTHON_PSEUDO_DEPENDENCY) {
                continue;
            }
            names.push(normalize_package_name(name));
        }
    }

    names
}

/// PEP 503 name normalization: lowercase, runs of `-`, `_` and `.` become a
/// single `-`.
fn normalize_package_name(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

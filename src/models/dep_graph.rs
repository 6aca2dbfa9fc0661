//! Dependency graph model and builder.
//!
//! The serialized shape is the depGraph fact payload consumed downstream:
//! a package list plus a node topology rooted at the manifest's project
//! package. Graphs are immutable once built; all construction goes through
//! [`DepGraphBuilder`], which deduplicates packages by `name@version` id.

use std::collections::BTreeMap;

use serde::Serialize;

pub const DEP_GRAPH_SCHEMA_VERSION: &str = "1.2.0";

const ROOT_NODE_ID: &str = "root-node";

/// Package name plus resolved version. The version is optional because a
/// project manifest may omit its own version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PkgInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PkgInfo {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pkg {
    pub id: String,
    pub info: PkgInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PkgManager {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeRef {
    node_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphNode {
    node_id: String,
    pkg_id: String,
    deps: Vec<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphTopology {
    root_node_id: String,
    nodes: Vec<GraphNode>,
}

/// Immutable dependency graph tagged with the package manager that produced
/// it. The tag travels with the graph; consumers read it back instead of
/// recomputing the ecosystem.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepGraph {
    schema_version: String,
    pkg_manager: PkgManager,
    pkgs: Vec<Pkg>,
    graph: GraphTopology,
}

impl DepGraph {
    /// The self-reported package manager name (e.g. "poetry").
    pub fn package_manager(&self) -> &str {
        &self.pkg_manager.name
    }

    /// Number of packages in the graph, root project included.
    pub fn package_count(&self) -> usize {
        self.pkgs.len()
    }

    pub fn packages(&self) -> impl Iterator<Item = &PkgInfo> {
        self.pkgs.iter().map(|pkg| &pkg.info)
    }

    /// The manifest's own package, always the first entry.
    pub fn root_package(&self) -> &PkgInfo {
        &self.pkgs[0].info
    }
}

/// Builder for [`DepGraph`]. Created with the root project package; consumed
/// by [`DepGraphBuilder::build`].
#[derive(Debug)]
pub struct DepGraphBuilder {
    package_manager: String,
    pkgs: Vec<Pkg>,
    nodes: Vec<GraphNode>,
    node_index: BTreeMap<String, usize>,
    node_for_pkg: BTreeMap<String, String>,
}

impl DepGraphBuilder {
    pub fn new(package_manager: impl Into<String>, root: PkgInfo) -> Self {
        let root_pkg_id = pkg_id(&root);
        let mut node_index = BTreeMap::new();
        node_index.insert(ROOT_NODE_ID.to_string(), 0);
        let mut node_for_pkg = BTreeMap::new();
        node_for_pkg.insert(root_pkg_id.clone(), ROOT_NODE_ID.to_string());

        Self {
            package_manager: package_manager.into(),
            pkgs: vec![Pkg {
                id: root_pkg_id.clone(),
                info: root,
            }],
            nodes: vec![GraphNode {
                node_id: ROOT_NODE_ID.to_string(),
                pkg_id: root_pkg_id,
                deps: Vec::new(),
            }],
            node_index,
            node_for_pkg,
        }
    }

    pub fn root_node_id(&self) -> &'static str {
        ROOT_NODE_ID
    }

    /// Adds a package node, returning its node id. Adding the same
    /// `name@version` twice is a no-op returning the existing node id; a
    /// package matching the root resolves to the root node.
    pub fn add_package(&mut self, info: PkgInfo) -> String {
        let id = pkg_id(&info);
        if let Some(node_id) = self.node_for_pkg.get(&id) {
            return node_id.clone();
        }
        self.node_for_pkg.insert(id.clone(), id.clone());
        self.node_index.insert(id.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            node_id: id.clone(),
            pkg_id: id.clone(),
            deps: Vec::new(),
        });
        self.pkgs.push(Pkg {
            id: id.clone(),
            info,
        });
        id
    }

    /// Records a "depends on" edge between two existing nodes. Duplicate
    /// edges collapse; edges from unknown parents are dropped.
    pub fn connect(&mut self, parent_node_id: &str, child_node_id: &str) {
        if let Some(&index) = self.node_index.get(parent_node_id) {
            let deps = &mut self.nodes[index].deps;
            if !deps.iter().any(|dep| dep.node_id == child_node_id) {
                deps.push(NodeRef {
                    node_id: child_node_id.to_string(),
                });
            }
        }
    }

    pub fn build(self) -> DepGraph {
        DepGraph {
            schema_version: DEP_GRAPH_SCHEMA_VERSION.to_string(),
            pkg_manager: PkgManager {
                name: self.package_manager,
            },
            pkgs: self.pkgs,
            graph: GraphTopology {
                root_node_id: ROOT_NODE_ID.to_string(),
                nodes: self.nodes,
            },
        }
    }
}

fn pkg_id(info: &PkgInfo) -> String {
    match &info.version {
        Some(version) => format!("{}@{}", info.name, version),
        None => info.name.clone(),
    }
}

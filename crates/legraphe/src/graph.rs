// Module dependency graph

use lemodule::Provenance;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{Dfs, Reversed};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Node ID type
pub type NodeId = petgraph::stable_graph::NodeIndex;

/// A module in the dependency graph
///
/// Identity is the dotted name alone; two values with the same name are equal
/// wherever they were created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Fully-qualified dotted name
    pub name: String,

    /// Origin classification
    pub provenance: Provenance,

    /// Resolved location, absent for built-in and namespace modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Module {
    /// Create a module without a known location
    pub fn new(name: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            name: name.into(),
            provenance,
            path: None,
        }
    }

    /// Attach a location
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Module {}

impl Hash for Module {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Directed graph of modules and import edges
///
/// An edge `a -> b` means `a` imports `b`, or `a` is a subpackage of `b`. Cycles are
/// allowed; see [`find_cycles`](Self::find_cycles) for the optional check.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Internal graph structure
    graph: StableGraph<Module, ()>,

    /// Module name to node ID mapping
    name_index: HashMap<String, NodeId>,
}

impl DependencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module, returning the existing node if the name is already present
    pub fn add_module(&mut self, module: Module) -> NodeId {
        if let Some(&id) = self.name_index.get(&module.name) {
            return id;
        }
        let name = module.name.clone();
        let id = self.graph.add_node(module);
        self.name_index.insert(name, id);
        id
    }

    /// Add an edge between two present modules
    ///
    /// Returns `false` when either endpoint is missing. Repeated edges collapse.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> bool {
        match (self.node_id(from), self.node_id(to)) {
            (Some(a), Some(b)) => {
                self.graph.update_edge(a, b, ());
                true
            }
            _ => false,
        }
    }

    /// Node ID for a module name
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    /// Look up a module by name
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.node_id(name).and_then(|id| self.graph.node_weight(id))
    }

    /// Whether a module with this name is present
    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// All modules, in insertion order
    pub fn modules(&self) -> impl Iterator<Item = &Module> + '_ {
        self.graph.node_weights()
    }

    /// All edges as `(importer, imported)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (&Module, &Module)> + '_ {
        self.graph.edge_indices().filter_map(move |edge| {
            let (a, b) = self.graph.edge_endpoints(edge)?;
            Some((&self.graph[a], &self.graph[b]))
        })
    }

    /// Modules that nothing depends on
    pub fn roots(&self) -> impl Iterator<Item = &Module> + '_ {
        self.graph.node_indices().filter_map(move |id| {
            self.has_no_incoming(id).then(|| &self.graph[id])
        })
    }

    /// Whether `name` is present and has no incoming edges
    pub fn is_root(&self, name: &str) -> bool {
        self.node_id(name)
            .map(|id| self.has_no_incoming(id))
            .unwrap_or(false)
    }

    fn has_no_incoming(&self, id: NodeId) -> bool {
        self.graph
            .neighbors_directed(id, Direction::Incoming)
            .next()
            .is_none()
    }

    /// Direct dependencies of `name`, sorted by name
    pub fn successors(&self, name: &str) -> Vec<&Module> {
        self.neighbors_sorted(name, Direction::Outgoing)
    }

    /// Direct dependents of `name`, sorted by name
    pub fn predecessors(&self, name: &str) -> Vec<&Module> {
        self.neighbors_sorted(name, Direction::Incoming)
    }

    fn neighbors_sorted(&self, name: &str, direction: Direction) -> Vec<&Module> {
        let Some(id) = self.node_id(name) else {
            return Vec::new();
        };
        let mut modules: Vec<&Module> = self
            .graph
            .neighbors_directed(id, direction)
            .map(|n| &self.graph[n])
            .collect();
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        modules
    }

    /// Every module reachable from `name`, excluding `name`
    pub fn transitive_dependencies(&self, name: &str) -> Vec<&Module> {
        let Some(start) = self.node_id(name) else {
            return Vec::new();
        };
        let mut reached = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(nx) = dfs.next(&self.graph) {
            if nx != start {
                reached.push(&self.graph[nx]);
            }
        }
        reached
    }

    /// Every module that can reach `name`, excluding `name`
    pub fn transitive_dependents(&self, name: &str) -> Vec<&Module> {
        let Some(start) = self.node_id(name) else {
            return Vec::new();
        };
        let reversed = Reversed(&self.graph);
        let mut reached = Vec::new();
        let mut dfs = Dfs::new(reversed, start);
        while let Some(nx) = dfs.next(reversed) {
            if nx != start {
                reached.push(&self.graph[nx]);
            }
        }
        reached
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no modules
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn inner(&self) -> &StableGraph<Module, ()> {
        &self.graph
    }
}

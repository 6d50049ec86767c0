// Graph exports
//
// Deterministic, sorted views of a dependency graph: a serde snapshot and Graphviz DOT.

use crate::graph::{DependencyGraph, Module};
use lemodule::Provenance;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Directed edge between two module names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeRecord {
    /// Importing module
    pub from: String,
    /// Imported module
    pub to: String,
}

/// Serializable copy of a graph with nodes and edges sorted by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    /// Modules sorted by name
    pub nodes: Vec<Module>,
    /// Edges sorted by `(from, to)`
    pub edges: Vec<EdgeRecord>,
}

impl GraphSnapshot {
    /// Rebuild a graph, dropping edges whose endpoints are missing
    pub fn into_graph(self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for module in self.nodes {
            graph.add_module(module);
        }
        for edge in &self.edges {
            graph.add_dependency(&edge.from, &edge.to);
        }
        graph
    }
}

fn fill_color(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::StandardLibrary => "lightgrey",
        Provenance::FirstParty => "lightblue",
        Provenance::ThirdParty => "lightyellow",
    }
}

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

impl DependencyGraph {
    /// Sorted, serializable copy of the graph
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<Module> = self.modules().cloned().collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut edges: Vec<EdgeRecord> = self
            .edges()
            .map(|(from, to)| EdgeRecord {
                from: from.name.clone(),
                to: to.name.clone(),
            })
            .collect();
        edges.sort();

        GraphSnapshot { nodes, edges }
    }

    /// Graphviz DOT text, nodes filled by provenance
    pub fn to_dot(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::from("digraph dependencies {\n");
        output.push_str("    rankdir=LR;\n");
        output.push_str("    node [shape=box, style=filled];\n");

        for module in &snapshot.nodes {
            let _ = writeln!(
                output,
                "    {} [fillcolor={}, tooltip={}];",
                quote(&module.name),
                fill_color(module.provenance),
                quote(module.provenance.as_str()),
            );
        }

        for edge in &snapshot.edges {
            let _ = writeln!(output, "    {} -> {};", quote(&edge.from), quote(&edge.to));
        }

        output.push_str("}\n");
        output
    }
}

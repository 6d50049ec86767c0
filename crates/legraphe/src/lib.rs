//! legraphe - Dependency Graph Core
//!
//! *Le Graphe* (The Graph) - breadth-first module dependency graph with cycle checks and exports

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Breadth-first graph construction.
pub mod builder;
/// Import cycle detection.
pub mod cycles;
/// Error types.
pub mod error;
/// Snapshot and Graphviz exports.
pub mod export;
/// Module dependency graph.
pub mod graph;
/// Build options and ignore rules.
pub mod options;

pub use builder::{validate_entry, GraphBuilder};
pub use cycles::Cycle;
pub use error::{BuildError, GraphError, Result};
pub use export::{EdgeRecord, GraphSnapshot};
pub use graph::{DependencyGraph, Module, NodeId};
pub use options::{BuildOptions, IgnoreSet};

use lemodule::{source_root, PathResolver, PythonEnvironment};
use std::path::Path;

/// Build the dependency graph of `entry` against an interpreter environment
///
/// Modules are searched in the entry's source root first, then on the interpreter's
/// search path.
pub fn build_graph(
    entry: &Path,
    options: BuildOptions,
    environment: PythonEnvironment,
) -> Result<DependencyGraph> {
    validate_entry(entry)?;
    let resolver = PathResolver::new(environment).with_search_path(source_root(entry)?);
    GraphBuilder::new(resolver, options).build(entry)
}

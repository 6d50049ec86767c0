// Breadth-first dependency graph construction
//
// Starting from one entry file, repeatedly resolve a module name, read its source and
// queue the names it imports, until the frontier is exhausted.

use crate::error::{BuildError, Result};
use crate::graph::{DependencyGraph, Module};
use crate::options::{BuildOptions, IgnoreSet};
use lemodule::naming::has_source_extension;
use lemodule::{find_module_root, package_chain, path_to_module, ModuleResolver, Provenance};
use leparse::ImportExtractor;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::Path;
use tree_sitter::Parser;

/// Check that `entry` is an existing Python source file
pub fn validate_entry(entry: &Path) -> Result<()> {
    if !entry.exists() {
        return Err(BuildError::EntryNotFound(entry.to_path_buf()));
    }
    if !entry.is_file() || !has_source_extension(entry) {
        return Err(BuildError::InvalidEntry(entry.to_path_buf()));
    }
    Ok(())
}

/// Builds a [`DependencyGraph`] from an entry file
///
/// The resolver decides where names live and what provenance they have; the builder only
/// drives the traversal.
#[derive(Debug, Clone)]
pub struct GraphBuilder<R> {
    resolver: R,
    options: BuildOptions,
    extractor: ImportExtractor,
}

impl<R: ModuleResolver> GraphBuilder<R> {
    /// Create a builder over a resolver
    pub fn new(resolver: R, options: BuildOptions) -> Self {
        let extractor = ImportExtractor::new(options.max_depth);
        Self {
            resolver,
            options,
            extractor,
        }
    }

    /// Options this builder was created with
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// The resolver used for every lookup
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Traverse everything reachable from `entry`
    pub fn build(&self, entry: &Path) -> Result<DependencyGraph> {
        validate_entry(entry)?;

        let start = path_to_module(entry, None)?;
        let root_module = find_module_root(entry)?;
        if self.options.ignore_modules.is_ignored(&start) {
            return Err(BuildError::EntryIgnored(start));
        }
        tracing::debug!(start = %start, root = %root_module, "starting traversal");

        let mut parser = leparse::grammar::python_parser()?;
        let mut traversal = Traversal::new(&self.options.ignore_modules);
        traversal.seed_with_parents(&start);

        while let Some(name) = traversal.frontier.pop_front() {
            if traversal.is_ignored(&name) || traversal.processed.contains(&name) {
                continue;
            }
            traversal.processed.insert(name.clone());

            let Some(resolved) = self.resolver.resolve(&name, &root_module) else {
                tracing::debug!("{} could not be resolved, dropping it", name);
                traversal.unresolved += 1;
                continue;
            };
            tracing::debug!(module = %name, provenance = %resolved.provenance, "visiting module");

            let source = resolved.source_path().map(Path::to_path_buf);
            let provenance = resolved.provenance;
            traversal.nodes.push(Module {
                name: name.clone(),
                provenance,
                path: resolved.path,
            });

            if provenance == Provenance::StandardLibrary {
                continue;
            }
            let Some(source) = source else {
                continue;
            };
            let Some(imports) = self.read_imports(&source, &mut parser) else {
                traversal.unreadable += 1;
                continue;
            };

            for imported in imports {
                // A package importing itself or one of its own names adds no dependency.
                if imported == name || traversal.is_ignored(&imported) {
                    continue;
                }
                traversal.edges.push((name.clone(), imported.clone()));
                traversal.seed_with_parents(&imported);
            }
        }

        Ok(traversal.assemble())
    }

    /// Imported names of one file, or `None` when it cannot be read or parsed
    fn read_imports(&self, path: &Path, parser: &mut Parser) -> Option<Vec<String>> {
        let source = match fs::read(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };

        match self.extractor.extract_with_parser(&source, parser) {
            Ok(imports) => Some(imports),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// State owned by a single `build` call
struct Traversal<'a> {
    ignore: &'a IgnoreSet,
    frontier: VecDeque<String>,
    processed: HashSet<String>,
    nodes: Vec<Module>,
    edges: Vec<(String, String)>,
    unresolved: usize,
    unreadable: usize,
}

impl<'a> Traversal<'a> {
    fn new(ignore: &'a IgnoreSet) -> Self {
        Self {
            ignore,
            frontier: VecDeque::new(),
            processed: HashSet::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            unresolved: 0,
            unreadable: 0,
        }
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.is_ignored(name)
    }

    /// Link `name` to each enclosing package and queue the whole chain
    fn seed_with_parents(&mut self, name: &str) {
        let chain = package_chain(name);
        for pair in chain.windows(2) {
            self.edges.push((pair[1].clone(), pair[0].clone()));
        }
        for module in chain {
            if !self.processed.contains(&module) && !self.is_ignored(&module) {
                self.frontier.push_back(module);
            }
        }
    }

    /// Keep every node; keep an edge only if both ends became nodes
    fn assemble(self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for module in self.nodes {
            graph.add_module(module);
        }

        let mut dropped = 0;
        for (from, to) in &self.edges {
            if !graph.add_dependency(from, to) {
                dropped += 1;
            }
        }

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            unresolved = self.unresolved,
            unreadable = self.unreadable,
            dropped_edges = dropped,
            "dependency graph built"
        );
        graph
    }
}

// Graph Rendering
//
// *Le Rendu* (The Rendering) - text, Graphviz and JSON views of a dependency graph

use crate::config::OutputFormat;
use legraphe::{DependencyGraph, Module};
use std::collections::HashSet;
use std::io::{self, Write};

/// Message printed for a graph without modules
pub const EMPTY_GRAPH_MESSAGE: &str = "No dependencies found";

/// Something that can write a dependency graph
pub trait GraphRenderer {
    /// Render `graph` into `out`
    fn render(&self, graph: &DependencyGraph, out: &mut dyn Write) -> io::Result<()>;
}

/// Pick the renderer for a format
pub fn renderer_for(format: OutputFormat) -> Box<dyn GraphRenderer> {
    match format {
        OutputFormat::Tree => Box::new(TreeRenderer::default()),
        OutputFormat::Dot => Box::new(DotRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// Indented tree from every root module
///
/// A module already on the current branch is printed as a cycle marker instead of
/// being expanded again. A module whose dependencies were already listed elsewhere in
/// the tree is printed once more with a `(see above)` marker and not expanded.
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer {
    /// Append the provenance label to each module
    pub show_provenance: bool,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self {
            show_provenance: true,
        }
    }
}

impl TreeRenderer {
    fn label(&self, module: &Module) -> String {
        if self.show_provenance {
            format!("{} ({})", module.name, module.provenance)
        } else {
            module.name.clone()
        }
    }

    fn render_children(
        &self,
        graph: &DependencyGraph,
        module: &Module,
        prefix: &str,
        branch: &mut Vec<String>,
        expanded: &mut HashSet<String>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let children = graph.successors(&module.name);
        let count = children.len();
        if count > 0 {
            expanded.insert(module.name.clone());
        }

        for (index, child) in children.into_iter().enumerate() {
            let last = index + 1 == count;
            let connector = if last { "└── " } else { "├── " };

            if branch.contains(&child.name) {
                writeln!(out, "{}{}↩ cycle to {}", prefix, connector, child.name)?;
                continue;
            }

            if expanded.contains(&child.name) {
                writeln!(out, "{}{}{} (see above)", prefix, connector, self.label(child))?;
                continue;
            }

            writeln!(out, "{}{}{}", prefix, connector, self.label(child))?;
            let extension = if last { "    " } else { "│   " };
            branch.push(child.name.clone());
            let prefix = format!("{}{}", prefix, extension);
            self.render_children(graph, child, &prefix, branch, expanded, out)?;
            branch.pop();
        }

        Ok(())
    }
}

impl GraphRenderer for TreeRenderer {
    fn render(&self, graph: &DependencyGraph, out: &mut dyn Write) -> io::Result<()> {
        let mut roots: Vec<&Module> = graph.roots().collect();
        if roots.is_empty() {
            // Every module sits on a cycle; start from the first name.
            roots = graph.modules().min_by(|a, b| a.name.cmp(&b.name)).into_iter().collect();
        }
        if roots.is_empty() {
            return writeln!(out, "{}", EMPTY_GRAPH_MESSAGE);
        }
        roots.sort_by(|a, b| a.name.cmp(&b.name));

        let mut expanded = HashSet::new();
        for root in roots {
            writeln!(out, "{}", self.label(root))?;
            let mut branch = vec![root.name.clone()];
            self.render_children(graph, root, "", &mut branch, &mut expanded, out)?;
        }
        Ok(())
    }
}

/// Graphviz DOT text
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl GraphRenderer for DotRenderer {
    fn render(&self, graph: &DependencyGraph, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(graph.to_dot().as_bytes())
    }
}

/// Pretty-printed JSON snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl GraphRenderer for JsonRenderer {
    fn render(&self, graph: &DependencyGraph, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, &graph.snapshot())?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lemodule::Provenance;

    fn render(renderer: &dyn GraphRenderer, graph: &DependencyGraph) -> String {
        let mut out = Vec::new();
        renderer.render(graph, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn plain() -> TreeRenderer {
        TreeRenderer {
            show_provenance: false,
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(render(&plain(), &graph), "No dependencies found\n");
    }

    #[test]
    fn test_tree_layout() {
        let mut graph = DependencyGraph::new();
        for name in ["pkg", "pkg.mod", "pkg.other", "os"] {
            graph.add_module(Module::new(name, Provenance::FirstParty));
        }
        graph.add_dependency("pkg.mod", "pkg");
        graph.add_dependency("pkg.mod", "os");
        graph.add_dependency("pkg.mod", "pkg.other");
        graph.add_dependency("pkg.other", "pkg");

        let expected = "\
pkg.mod
├── os
├── pkg
└── pkg.other
    └── pkg
";
        assert_eq!(render(&plain(), &graph), expected);
    }

    #[test]
    fn test_cycle_marker() {
        let mut graph = DependencyGraph::new();
        for name in ["main", "a", "b"] {
            graph.add_module(Module::new(name, Provenance::FirstParty));
        }
        graph.add_dependency("main", "a");
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "a");

        let expected = "\
main
└── a
    └── b
        └── ↩ cycle to a
";
        assert_eq!(render(&plain(), &graph), expected);
    }

    #[test]
    fn test_shared_subtree_is_expanded_once() {
        let mut graph = DependencyGraph::new();
        for name in ["app", "a", "b", "core", "util"] {
            graph.add_module(Module::new(name, Provenance::FirstParty));
        }
        graph.add_dependency("app", "a");
        graph.add_dependency("app", "b");
        graph.add_dependency("a", "core");
        graph.add_dependency("b", "core");
        graph.add_dependency("core", "util");
        graph.add_dependency("b", "util");

        let expected = "\
app
├── a
│   └── core
│       └── util
└── b
    ├── core (see above)
    └── util
";
        assert_eq!(render(&plain(), &graph), expected);
    }

    #[test]
    fn test_provenance_labels() {
        let mut graph = DependencyGraph::new();
        graph.add_module(Module::new("app", Provenance::FirstParty));
        graph.add_module(Module::new("json", Provenance::StandardLibrary));
        graph.add_dependency("app", "json");

        let output = render(&TreeRenderer::default(), &graph);
        assert_eq!(output, "app (first-party)\n└── json (stdlib)\n");
    }

    #[test]
    fn test_dot_and_json_renderers() {
        let mut graph = DependencyGraph::new();
        graph.add_module(Module::new("app", Provenance::FirstParty));

        let dot = render(&DotRenderer, &graph);
        assert!(dot.starts_with("digraph dependencies {"));

        let json: serde_json::Value = serde_json::from_str(&render(&JsonRenderer, &graph)).unwrap();
        assert_eq!(json["nodes"][0]["name"], "app");
        assert!(json["edges"].as_array().unwrap().is_empty());
    }
}

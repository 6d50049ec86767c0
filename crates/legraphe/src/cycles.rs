// Import cycle detection
//
// Cycles are tolerated during construction. These helpers report them for callers that
// want to reject cyclic graphs.

use crate::error::GraphError;
use crate::graph::{DependencyGraph, NodeId};
use petgraph::algo::tarjan_scc;
use std::collections::HashSet;
use std::fmt;

/// Upper bound on reported cycles; dense components have exponentially many
pub const MAX_REPORTED_CYCLES: usize = 256;

/// An elementary import cycle
///
/// Stored without the closing repetition, rotated to start at its smallest name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cycle {
    modules: Vec<String>,
}

impl Cycle {
    /// Build a cycle from its members in import order
    pub fn new(mut modules: Vec<String>) -> Self {
        if let Some(start) = modules
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map(|(i, _)| i)
        {
            modules.rotate_left(start);
        }
        Self { modules }
    }

    /// Members in import order
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Number of distinct modules in the cycle
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the cycle is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.modules.first() else {
            return Ok(());
        };
        for module in &self.modules {
            write!(f, "{} -> ", module)?;
        }
        f.write_str(first)
    }
}

impl DependencyGraph {
    /// Whether the graph has no import cycles
    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(self.inner())
    }

    /// Elementary cycles, sorted, at most [`MAX_REPORTED_CYCLES`]
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let graph = self.inner();
        let mut cycles = Vec::new();

        for component in tarjan_scc(graph) {
            let is_cyclic = component.len() > 1
                || component
                    .first()
                    .map(|&n| graph.contains_edge(n, n))
                    .unwrap_or(false);
            if !is_cyclic {
                continue;
            }

            let mut members: Vec<NodeId> = component;
            members.sort_by(|a, b| graph[*a].name.cmp(&graph[*b].name));
            let allowed: HashSet<NodeId> = members.iter().copied().collect();

            // Each cycle is found once, from its smallest member, avoiding smaller members.
            for (rank, &start) in members.iter().enumerate() {
                let excluded: HashSet<NodeId> = members[..rank].iter().copied().collect();
                let mut path = vec![start];
                self.cycles_from(start, start, &allowed, &excluded, &mut path, &mut cycles);
                if cycles.len() >= MAX_REPORTED_CYCLES {
                    tracing::debug!("cycle report truncated at {}", MAX_REPORTED_CYCLES);
                    break;
                }
            }
        }

        cycles.truncate(MAX_REPORTED_CYCLES);
        cycles.sort();
        cycles
    }

    fn cycles_from(
        &self,
        start: NodeId,
        current: NodeId,
        allowed: &HashSet<NodeId>,
        excluded: &HashSet<NodeId>,
        path: &mut Vec<NodeId>,
        cycles: &mut Vec<Cycle>,
    ) {
        let graph = self.inner();
        let mut next: Vec<NodeId> = graph.neighbors(current).collect();
        next.sort_by(|a, b| graph[*a].name.cmp(&graph[*b].name));
        next.dedup();

        for neighbor in next {
            if cycles.len() >= MAX_REPORTED_CYCLES {
                return;
            }
            if neighbor == start {
                let names = path.iter().map(|&n| graph[n].name.clone()).collect();
                cycles.push(Cycle::new(names));
            } else if allowed.contains(&neighbor)
                && !excluded.contains(&neighbor)
                && !path.contains(&neighbor)
            {
                path.push(neighbor);
                self.cycles_from(start, neighbor, allowed, excluded, path, cycles);
                path.pop();
            }
        }
    }

    /// Fail with every detected cycle if the graph is cyclic
    pub fn check_acyclic(&self) -> std::result::Result<(), GraphError> {
        if self.is_acyclic() {
            return Ok(());
        }
        Err(GraphError::Cyclic(self.find_cycles()))
    }
}

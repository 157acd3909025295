//! The output of a planning operation, and the accumulator that drives the
//! `install`/`uninstall`/`upgrade`/`downgrade` recursions.

use ahash::AHashSet;
use anvil_core::Set;
use petgraph::graph::{DiGraph, NodeIndex};

/// A plan: the Units a planning operation wants installed and/or
/// uninstalled, plus human-readable notes about units it dropped
/// (already installed, reverse-dependency guard, no upgrade candidate).
#[derive(Debug, Default)]
pub struct Plan {
    pub to_install: Set,
    pub to_uninstall: Set,
    pub notes: Vec<String>,
}

impl Plan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_install.is_empty() && self.to_uninstall.is_empty()
    }
}

/// Tracks which unit identities have already been visited during a single
/// traversal, guaranteeing termination over cyclic dependency graphs.
///
/// The dependency tree actually walked is also recorded as a graph, indexed
/// by an arena of [`NodeIndex`] — this makes cycles representable without
/// shared ownership, matching how the rest of the workspace models graphs.
#[derive(Debug, Default)]
pub struct Traversal {
    visited: AHashSet<String>,
    pub graph: DiGraph<String, ()>,
    indices: ahash::AHashMap<String, NodeIndex>,
}

impl Traversal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.visited.contains(identity)
    }

    pub fn mark(&mut self, identity: &str) -> NodeIndex {
        self.visited.insert(identity.to_string());
        *self
            .indices
            .entry(identity.to_string())
            .or_insert_with(|| self.graph.add_node(identity.to_string()))
    }

    pub fn unmark(&mut self, identity: &str) {
        self.visited.remove(identity);
    }

    pub fn node_of(&self, identity: &str) -> Option<NodeIndex> {
        self.indices.get(identity).copied()
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.add_edge(from, to, ());
    }
}

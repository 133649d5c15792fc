use crate::error::{PipegenError, Result};
use crate::grammar::graph::{Graph, NodeId};
use crate::grammar::pattern::{GraphPattern, Initializer};
use crate::grammar::registry::Kind;
use crate::grammar::sampler::Sampler;
use log::trace;
use std::sync::Arc;

/// A rewrite rule: match one node by kind, replace it with a pattern that
/// inherits its edges.
///
/// Matching is deliberately restricted to a single node kind. Arbitrary
/// subgraph patterns would need subgraph isomorphism and nothing in the
/// engine requires that generality.
pub struct Production<T> {
    pattern: Kind,
    replacement: GraphPattern,
    initializer: Initializer<T>,
}

impl<T> Clone for Production<T> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern,
            replacement: self.replacement.clone(),
            initializer: Arc::clone(&self.initializer),
        }
    }
}

impl<T> Production<T> {
    pub fn new(pattern: Kind, replacement: GraphPattern, initializer: Initializer<T>) -> Self {
        Self {
            pattern,
            replacement,
            initializer,
        }
    }

    /// The single kind this production matches.
    pub fn pattern(&self) -> Kind {
        self.pattern
    }

    pub fn replacement(&self) -> &GraphPattern {
        &self.replacement
    }

    /// All nodes in `graph` this production could rewrite.
    pub fn matches(&self, graph: &Graph<T>) -> Vec<NodeId> {
        graph.nodes_of_kind(self.pattern)
    }

    /// True iff the production matches somewhere in `graph`. Callers must
    /// check this before `apply`.
    pub fn has_match(&self, graph: &Graph<T>) -> bool {
        graph.contains_kind(self.pattern)
    }

    /// Rewrite `graph` in place: pick one matching node via `selection`,
    /// remove it, and build the replacement against its former in/out
    /// neighbors.
    ///
    /// Fails with `NoMatch` when the match set is empty; that is a contract
    /// violation, not a recoverable condition.
    pub fn apply(&self, graph: &mut Graph<T>, selection: &mut dyn Sampler) -> Result<()> {
        let matches = self.matches(graph);
        if matches.is_empty() {
            return Err(PipegenError::NoMatch(self.pattern));
        }

        let node = matches[selection.choice(matches.len())];
        let in_nodes = graph.in_neighbors(node)?.to_vec();
        let out_nodes = graph.out_neighbors(node)?.to_vec();

        trace!(
            "rewriting node {:?} (kind {:?}) with {} in / {} out neighbors",
            node,
            self.pattern,
            in_nodes.len(),
            out_nodes.len()
        );

        graph.remove_node(node)?;
        self.replacement
            .build(graph, &in_nodes, &out_nodes, &self.initializer)
    }
}

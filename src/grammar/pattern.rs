use crate::error::{PipegenError, Result};
use crate::grammar::graph::{Graph, NodeId};
use crate::grammar::registry::Kind;
use std::sync::Arc;

/// Factory turning a kind tag into a node payload.
///
/// The default builds payloads with `Default::default()`; the outer search
/// loop substitutes a factory that draws hyperparameters from a learned
/// distribution per kind.
pub type Initializer<T> = Arc<dyn Fn(Kind) -> T>;

/// Initializer that ignores the kind and builds a default payload.
pub fn default_initializer<T: Default>() -> Initializer<T> {
    Arc::new(|_| T::default())
}

/// Stateless template for splicing freshly built nodes into a graph.
///
/// A pattern is built against two splice lists: `in_nodes` (nodes that feed
/// the new subgraph) and `out_nodes` (nodes the new subgraph feeds). The
/// three shapes differ only in internal wiring:
///
/// - `Node(k)`: one node, wired to every in and every out.
/// - `Path(k1..kn)`: a linear chain `k1 -> ... -> kn`; only the head is wired
///   to `in_nodes` and only the tail to `out_nodes`.
/// - `Block(k1..kn)`: parallel branches, each wired to every in and every out
///   (a full bipartite fan-in/fan-out).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphPattern {
    Node(Kind),
    Path(Vec<Kind>),
    Block(Vec<Kind>),
}

impl GraphPattern {
    pub fn node(kind: Kind) -> Self {
        GraphPattern::Node(kind)
    }

    pub fn path<I: IntoIterator<Item = Kind>>(kinds: I) -> Self {
        GraphPattern::Path(kinds.into_iter().collect())
    }

    pub fn block<I: IntoIterator<Item = Kind>>(kinds: I) -> Self {
        GraphPattern::Block(kinds.into_iter().collect())
    }

    /// Instantiate the pattern into `graph`, wiring it against the given
    /// splice lists. Fails on a `Path`/`Block` with no kinds.
    pub fn build<T>(
        &self,
        graph: &mut Graph<T>,
        in_nodes: &[NodeId],
        out_nodes: &[NodeId],
        initializer: &Initializer<T>,
    ) -> Result<()> {
        match self {
            GraphPattern::Node(kind) => {
                let id = graph.add_node(*kind, initializer(*kind));
                add_in_edges(graph, in_nodes, id)?;
                add_out_edges(graph, out_nodes, id)?;
            }
            GraphPattern::Path(kinds) => {
                let ids = instantiate(graph, kinds, initializer)?;
                for pair in ids.windows(2) {
                    graph.add_edge(pair[0], pair[1])?;
                }
                add_in_edges(graph, in_nodes, ids[0])?;
                add_out_edges(graph, out_nodes, ids[ids.len() - 1])?;
            }
            GraphPattern::Block(kinds) => {
                let ids = instantiate(graph, kinds, initializer)?;
                for &id in &ids {
                    add_in_edges(graph, in_nodes, id)?;
                    add_out_edges(graph, out_nodes, id)?;
                }
            }
        }
        Ok(())
    }

    /// Materialize the pattern into a fresh graph with empty splice lists.
    /// Used to seed a grammar's start graph.
    pub fn make<T>(&self, initializer: &Initializer<T>) -> Result<Graph<T>> {
        let mut graph = Graph::new();
        self.build(&mut graph, &[], &[], initializer)?;
        Ok(graph)
    }

    /// Kinds this pattern instantiates, in build order.
    pub fn kinds(&self) -> Vec<Kind> {
        match self {
            GraphPattern::Node(kind) => vec![*kind],
            GraphPattern::Path(kinds) | GraphPattern::Block(kinds) => kinds.clone(),
        }
    }
}

fn instantiate<T>(
    graph: &mut Graph<T>,
    kinds: &[Kind],
    initializer: &Initializer<T>,
) -> Result<Vec<NodeId>> {
    if kinds.is_empty() {
        return Err(PipegenError::EmptyPattern);
    }
    Ok(kinds
        .iter()
        .map(|&kind| graph.add_node(kind, initializer(kind)))
        .collect())
}

fn add_in_edges<T>(graph: &mut Graph<T>, in_nodes: &[NodeId], node: NodeId) -> Result<()> {
    for &in_node in in_nodes {
        graph.add_edge(in_node, node)?;
    }
    Ok(())
}

fn add_out_edges<T>(graph: &mut Graph<T>, out_nodes: &[NodeId], node: NodeId) -> Result<()> {
    for &out_node in out_nodes {
        graph.add_edge(node, out_node)?;
    }
    Ok(())
}

use crate::error::{PipegenError, Result};
use crate::grammar::registry::Kind;
use std::collections::{HashMap, VecDeque};

/// Handle to a node inside one specific `Graph`.
///
/// Ids are slot indices: stable for the lifetime of the node, never reused
/// within the same graph, and meaningless across graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node instance: a kind tag plus the opaque payload the initializer built.
#[derive(Debug, Clone)]
pub struct Node<T> {
    kind: Kind,
    value: T,
}

impl<T> Node<T> {
    pub fn new(kind: Kind, value: T) -> Self {
        Self { kind, value }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    node: Node<T>,
    incoming: Vec<NodeId>,
    outgoing: Vec<NodeId>,
}

/// Directed acyclic graph over owned nodes.
///
/// Backed by an arena of slots with explicit in/out edge lists, so node
/// removal, edge rewiring, and topological traversal are plain bounds-checked
/// operations. Edges read as "produces input for": `a -> b` means `b` consumes
/// the output of `a`. The graph itself does not forbid cycles; `build_order`
/// rejects them when a traversal is requested.
#[derive(Debug, Clone, Default)]
pub struct Graph<T> {
    slots: Vec<Option<Slot<T>>>,
    node_count: usize,
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            node_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Add a node and return its handle. Slots are never reused, so the
    /// handle stays valid until the node is removed.
    pub fn add_node(&mut self, kind: Kind, value: T) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Slot {
            node: Node::new(kind, value),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }));
        self.node_count += 1;
        id
    }

    /// Remove a node, detaching every edge touching it, and hand back its
    /// contents.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node<T>> {
        let slot = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(PipegenError::InvalidNodeId(id.0))?;

        for &pred in &slot.incoming {
            if let Some(Some(p)) = self.slots.get_mut(pred.0) {
                p.outgoing.retain(|&n| n != id);
            }
        }
        for &succ in &slot.outgoing {
            if let Some(Some(s)) = self.slots.get_mut(succ.0) {
                s.incoming.retain(|&n| n != id);
            }
        }

        self.node_count -= 1;
        Ok(slot.node)
    }

    /// Add the edge `from -> to`. Adding an edge that already exists is a
    /// no-op.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.check_live(from)?;
        self.check_live(to)?;

        let out = &mut self.slot_mut(from)?.outgoing;
        if out.contains(&to) {
            return Ok(());
        }
        out.push(to);
        self.slot_mut(to)?.incoming.push(from);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node<T>> {
        Ok(&self.slot(id)?.node)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>> {
        Ok(&mut self.slot_mut(id)?.node)
    }

    /// Nodes with an edge into `id`, in insertion order.
    pub fn in_neighbors(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.slot(id)?.incoming)
    }

    /// Nodes `id` has an edge into, in insertion order.
    pub fn out_neighbors(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.slot(id)?.outgoing)
    }

    /// Iterate live node handles in slot order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| NodeId(i))
    }

    /// Iterate `(id, node)` pairs in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|slot| (NodeId(i), &slot.node)))
    }

    /// All nodes tagged with `kind`, in slot order.
    pub fn nodes_of_kind(&self, kind: Kind) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, n)| n.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn contains_kind(&self, kind: Kind) -> bool {
        self.nodes().any(|(_, n)| n.kind() == kind)
    }

    /// True iff any node's kind appears in `kinds`.
    pub fn contains_any<'a, I>(&self, kinds: I) -> bool
    where
        I: IntoIterator<Item = &'a Kind>,
    {
        let kinds: Vec<Kind> = kinds.into_iter().copied().collect();
        self.nodes().any(|(_, n)| kinds.contains(&n.kind()))
    }

    /// Compute a topological order and return a restartable iterator of
    /// `(node, in_neighbors)` pairs.
    ///
    /// Kahn's algorithm with a FIFO ready queue seeded in slot order, so the
    /// order is deterministic for a fixed graph. Fails with `CycleDetected`
    /// if any node is unreachable from the zero-in-degree frontier.
    pub fn build_order(&self) -> Result<BuildOrder<'_, T>> {
        let mut in_degree: HashMap<NodeId, usize> = HashMap::with_capacity(self.node_count);
        let mut ready = VecDeque::new();

        for id in self.node_ids() {
            let degree = self.in_neighbors(id)?.len();
            in_degree.insert(id, degree);
            if degree == 0 {
                ready.push_back(id);
            }
        }

        let mut order = Vec::with_capacity(self.node_count);
        while let Some(id) = ready.pop_front() {
            order.push(id);
            for &succ in self.out_neighbors(id)? {
                let degree = in_degree
                    .get_mut(&succ)
                    .expect("successor of a live node is live");
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(succ);
                }
            }
        }

        if order.len() != self.node_count {
            return Err(PipegenError::CycleDetected);
        }

        Ok(BuildOrder {
            graph: self,
            order,
            position: 0,
        })
    }

    /// Fold `f` over the graph in build order.
    ///
    /// For every node, `f` receives the node, its in-neighbors, and the values
    /// previously computed for those in-neighbors in the same order. Returns
    /// the value computed for the last node visited.
    pub fn apply<V, F>(&self, mut f: F) -> Result<V>
    where
        V: Clone,
        F: FnMut(&Node<T>, &[NodeId], &[V]) -> V,
    {
        if self.is_empty() {
            return Err(PipegenError::EmptyGraph);
        }

        let mut computed: HashMap<NodeId, V> = HashMap::with_capacity(self.node_count);
        let mut last = None;

        for (id, in_nodes) in self.build_order()? {
            let in_values: Vec<V> = in_nodes
                .iter()
                .map(|n| {
                    computed
                        .get(n)
                        .cloned()
                        .expect("in-neighbor visited before its consumer")
                })
                .collect();
            let value = f(self.node(id)?, &in_nodes, &in_values);
            computed.insert(id, value.clone());
            last = Some(value);
        }

        last.ok_or(PipegenError::EmptyGraph)
    }

    fn slot(&self, id: NodeId) -> Result<&Slot<T>> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(PipegenError::InvalidNodeId(id.0))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot<T>> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(PipegenError::InvalidNodeId(id.0))
    }

    fn check_live(&self, id: NodeId) -> Result<()> {
        self.slot(id).map(|_| ())
    }
}

/// Restartable topological traversal produced by `Graph::build_order`.
///
/// Yields `(node_id, in_neighbors)` so a consumer can feed each node the
/// outputs of the nodes it depends on. Call `build_order` again to restart.
pub struct BuildOrder<'a, T> {
    graph: &'a Graph<T>,
    order: Vec<NodeId>,
    position: usize,
}

impl<T> Iterator for BuildOrder<'_, T> {
    type Item = (NodeId, Vec<NodeId>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.order.get(self.position)?;
        self.position += 1;
        // Order came from a live snapshot of this graph
        let in_nodes = self.graph.in_neighbors(id).ok()?.to_vec();
        Some((id, in_nodes))
    }
}

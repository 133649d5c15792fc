use crate::error::Result;
use crate::grammar::graph::Graph;
use crate::grammar::pattern::{default_initializer, GraphPattern, Initializer};
use crate::grammar::production::Production;
use crate::grammar::registry::{Kind, KindRegistry};
use crate::grammar::sampler::Sampler;
use log::debug;
use std::collections::HashSet;

/// Probabilistic graph grammar over candidate pipeline graphs.
///
/// Holds a start graph, an ordered list of productions, and the set of
/// non-terminal kinds still eligible for expansion. `sample` clones the start
/// graph and fires matching productions until no non-terminal expansion
/// remains or the iteration budget runs out, so every call yields an
/// independently owned graph.
pub struct GraphGrammar<T> {
    start: Graph<T>,
    productions: Vec<Production<T>>,
    non_terminals: HashSet<Kind>,
    registry: KindRegistry,
}

impl<T> GraphGrammar<T> {
    /// Seed the grammar with a single start symbol.
    pub fn new(start_symbol: &str) -> Self
    where
        T: Default,
    {
        Self::with_registry(start_symbol, KindRegistry::new())
    }

    /// Seed the grammar with a single start symbol, resolving kinds through a
    /// caller-owned registry. Lets several grammars share one kind namespace.
    pub fn with_registry(start_symbol: &str, mut registry: KindRegistry) -> Self
    where
        T: Default,
    {
        let kind = registry.resolve(start_symbol);
        let mut start = Graph::new();
        start.add_node(kind, T::default());

        Self {
            start,
            productions: Vec::new(),
            non_terminals: HashSet::new(),
            registry,
        }
    }

    /// Seed the grammar from a start pattern materialized into a fresh graph.
    pub fn from_pattern(
        start: &GraphPattern,
        registry: KindRegistry,
        initializer: &Initializer<T>,
    ) -> Result<Self> {
        Ok(Self {
            start: start.make(initializer)?,
            productions: Vec::new(),
            non_terminals: HashSet::new(),
            registry,
        })
    }

    /// Resolve a kind name through the grammar's registry.
    pub fn kind(&mut self, name: &str) -> Kind {
        self.registry.resolve(name)
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Build a `Node` replacement pattern from a kind name.
    pub fn node_pattern(&mut self, name: &str) -> GraphPattern {
        let kind = self.registry.resolve(name);
        GraphPattern::node(kind)
    }

    /// Build a `Path` replacement pattern from kind names.
    pub fn path_pattern<'a, I: IntoIterator<Item = &'a str>>(&mut self, names: I) -> GraphPattern {
        let kinds: Vec<Kind> = names.into_iter().map(|n| self.registry.resolve(n)).collect();
        GraphPattern::path(kinds)
    }

    /// Build a `Block` replacement pattern from kind names.
    pub fn block_pattern<'a, I: IntoIterator<Item = &'a str>>(&mut self, names: I) -> GraphPattern {
        let kinds: Vec<Kind> = names.into_iter().map(|n| self.registry.resolve(n)).collect();
        GraphPattern::block(kinds)
    }

    /// Register a production matching the named kind, marking that kind as
    /// non-terminal. Payloads come from the default initializer.
    pub fn add(&mut self, pattern: &str, replacement: GraphPattern)
    where
        T: Default,
    {
        self.add_with_initializer(pattern, replacement, default_initializer());
    }

    /// Like `add`, with an explicit payload factory for the replacement nodes.
    pub fn add_with_initializer(
        &mut self,
        pattern: &str,
        replacement: GraphPattern,
        initializer: Initializer<T>,
    ) {
        let kind = self.registry.resolve(pattern);
        self.non_terminals.insert(kind);
        self.productions
            .push(Production::new(kind, replacement, initializer));
    }

    /// Register a production without touching the non-terminal set. This is
    /// how rules over terminal kinds enter the grammar.
    pub fn add_production(&mut self, production: Production<T>) {
        self.productions.push(production);
    }

    pub fn mark_non_terminal(&mut self, kind: Kind) {
        self.non_terminals.insert(kind);
    }

    pub fn productions(&self) -> &[Production<T>] {
        &self.productions
    }

    pub fn non_terminals(&self) -> &HashSet<Kind> {
        &self.non_terminals
    }

    pub fn start(&self) -> &Graph<T> {
        &self.start
    }

    /// True iff no node of a non-terminal kind remains in `graph`.
    pub fn is_closed(&self, graph: &Graph<T>) -> bool {
        !graph.contains_any(&self.non_terminals)
    }

    /// Clone the start graph and expand it for at most `max_iterations`
    /// production applications.
    pub fn sample(&self, max_iterations: usize, sampler: &mut dyn Sampler) -> Result<Graph<T>>
    where
        T: Clone,
    {
        let mut graph = self.start.clone();
        self.expand(&mut graph, max_iterations, sampler)?;
        Ok(graph)
    }

    /// Expand `graph` in place by repeatedly firing matching productions.
    ///
    /// Each iteration collects the productions that match the current graph,
    /// then narrows to those whose pattern kind is non-terminal, unless that
    /// would leave nothing to pick. The narrowing is what drives expansion
    /// toward a closed graph: terminal-kind rules only fire once no
    /// non-terminal rewrite is available. Stops at the fixpoint (no match) or
    /// when the budget is exhausted.
    pub fn expand(
        &self,
        graph: &mut Graph<T>,
        max_iterations: usize,
        sampler: &mut dyn Sampler,
    ) -> Result<()> {
        for iteration in 0..max_iterations {
            let mut valid: Vec<usize> = (0..self.productions.len())
                .filter(|&i| self.productions[i].has_match(graph))
                .collect();

            if !self.non_terminals.is_empty() {
                let non_terminal: Vec<usize> = valid
                    .iter()
                    .copied()
                    .filter(|&i| self.non_terminals.contains(&self.productions[i].pattern()))
                    .collect();
                // Never narrow down to an empty candidate set
                if !non_terminal.is_empty() {
                    valid = non_terminal;
                }
            }

            if valid.is_empty() {
                debug!("expansion reached fixpoint after {} iterations", iteration);
                return Ok(());
            }

            let chosen = valid[sampler.choice(valid.len())];
            self.productions[chosen].apply(graph, sampler)?;
        }

        debug!("expansion stopped: budget of {} iterations exhausted", max_iterations);
        Ok(())
    }
}

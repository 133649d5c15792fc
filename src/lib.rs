//! Graph-grammar synthesis of candidate pipelines with NSGA-II Pareto
//! selection.
//!
//! Two subsystems cooperate with an external generational search loop:
//!
//! - [`grammar`]: probabilistic graph grammar that synthesizes candidate
//!   pipeline DAGs from production rules, one independently owned graph per
//!   sampling pass.
//! - [`selection`]: multi-objective survivor selection over the population's
//!   score vectors: non-dominated sorting, crowding distance, and
//!   fittest-subset extraction.
//!
//! Fitness evaluation, bounded execution, persistence, and the generational
//! loop itself are the caller's responsibility; failed evaluations enter the
//! selector as the [`selection::FAILURE_SENTINEL`] and are never treated as
//! legitimate wins.

pub mod config;
pub mod error;
pub mod grammar;
pub mod selection;

pub use config::{ConfigManager, SamplingConfig, SearchConfig, SelectionConfig};
pub use error::{PipegenError, Result};
pub use grammar::{
    default_initializer, FirstSampler, Graph, GraphGrammar, GraphPattern, Initializer, Kind,
    KindRegistry, Node, NodeId, Production, Sampler, UniformSampler,
};
pub use selection::{OptimizationDirection, ParetoSelector, FAILURE_SENTINEL};

pub mod grammar;
pub mod graph;
pub mod pattern;
pub mod production;
pub mod registry;
pub mod sampler;

pub use grammar::GraphGrammar;
pub use graph::{BuildOrder, Graph, Node, NodeId};
pub use pattern::{default_initializer, GraphPattern, Initializer};
pub use production::Production;
pub use registry::{Kind, KindRegistry};
pub use sampler::{FirstSampler, Sampler, UniformSampler};

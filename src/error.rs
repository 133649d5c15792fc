use crate::grammar::Kind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipegenError {
    #[error("Graph contains a cycle: topological order is undefined")]
    CycleDetected,

    #[error("Graph is empty: nothing to traverse")]
    EmptyGraph,

    #[error("Invalid node id {0}: node was removed or never existed")]
    InvalidNodeId(usize),

    #[error("Pattern has no kinds to instantiate")]
    EmptyPattern,

    #[error("No node of kind {0:?} matches the production pattern")]
    NoMatch(Kind),

    #[error("Front is empty: crowding distance is undefined")]
    EmptyFront,

    #[error("Score vector has arity {actual}, expected {expected}")]
    ObjectiveArityMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipegenError>;

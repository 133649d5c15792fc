use super::traits::ConfigSection;
use crate::error::PipegenError;
use serde::{Deserialize, Serialize};

/// Knobs for one grammar sampling pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Upper bound on production applications per sampled graph.
    pub max_iterations: usize,
    /// Seed for the uniform sampler; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            seed: None,
        }
    }
}

impl ConfigSection for SamplingConfig {
    fn section_name() -> &'static str {
        "sampling"
    }

    fn validate(&self) -> Result<(), PipegenError> {
        if self.max_iterations == 0 {
            return Err(PipegenError::Configuration(
                "Max iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

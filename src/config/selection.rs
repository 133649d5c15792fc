use super::traits::ConfigSection;
use crate::error::PipegenError;
use crate::selection::OptimizationDirection;
use serde::{Deserialize, Serialize};

/// Knobs for Pareto survivor selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Direction per objective dimension.
    pub directions: Vec<OptimizationDirection>,
    /// Fraction of the population that survives each generation, in (0, 1].
    pub selection_fraction: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            directions: vec![
                OptimizationDirection::Maximize,
                OptimizationDirection::Maximize,
            ],
            selection_fraction: 0.5,
        }
    }
}

impl ConfigSection for SelectionConfig {
    fn section_name() -> &'static str {
        "selection"
    }

    fn validate(&self) -> Result<(), PipegenError> {
        if self.directions.is_empty() {
            return Err(PipegenError::Configuration(
                "At least one objective direction is required".to_string(),
            ));
        }
        if self.selection_fraction <= 0.0 || self.selection_fraction > 1.0 {
            return Err(PipegenError::Configuration(
                "Selection fraction must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

use crate::config::SelectionConfig;
use crate::error::{PipegenError, Result};
use crate::selection::pareto::{
    crowding_distance, dominates, fast_non_dominated_sort, feature_scale, OptimizationDirection,
};
use log::debug;
use std::cmp::Ordering;

/// Dominance predicate the selector ranks with. The default is strict Pareto
/// dominance under the configured directions; the outer search controller can
/// substitute its own, as long as it stays a valid strict partial order.
pub type DominancePredicate = Box<dyn Fn(&[f64], &[f64]) -> bool + Send + Sync>;

/// NSGA-II style survivor selection over a population of score vectors.
///
/// Consumes the population read-only: candidates are addressed by index and
/// every output is expressed in those indices. Elitism first (dominance
/// rank), diversity second (crowding distance).
pub struct ParetoSelector {
    directions: Vec<OptimizationDirection>,
    selection_fraction: f64,
    dominance: DominancePredicate,
}

impl ParetoSelector {
    /// One direction per objective dimension.
    pub fn new(directions: Vec<OptimizationDirection>, selection_fraction: f64) -> Result<Self> {
        if directions.is_empty() {
            return Err(PipegenError::Configuration(
                "At least one objective direction is required".to_string(),
            ));
        }
        if !(selection_fraction > 0.0 && selection_fraction <= 1.0) {
            return Err(PipegenError::Configuration(format!(
                "Selection fraction must be in (0, 1], got {}",
                selection_fraction
            )));
        }

        let dirs = directions.clone();
        Ok(Self {
            directions,
            selection_fraction,
            dominance: Box::new(move |a, b| dominates(a, b, &dirs)),
        })
    }

    /// Broadcast a single direction to all `arity` objective dimensions.
    pub fn uniform(
        direction: OptimizationDirection,
        arity: usize,
        selection_fraction: f64,
    ) -> Result<Self> {
        Self::new(vec![direction; arity], selection_fraction)
    }

    pub fn from_config(config: &SelectionConfig) -> Result<Self> {
        Self::new(config.directions.clone(), config.selection_fraction)
    }

    /// Replace the dominance predicate.
    pub fn with_dominance<F>(mut self, dominance: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> bool + Send + Sync + 'static,
    {
        self.dominance = Box::new(dominance);
        self
    }

    pub fn directions(&self) -> &[OptimizationDirection] {
        &self.directions
    }

    pub fn selection_fraction(&self) -> f64 {
        self.selection_fraction
    }

    /// Partition the population into Pareto fronts, best first.
    pub fn non_dominated_sort(&self, scores: &[Vec<f64>]) -> Vec<Vec<usize>> {
        fast_non_dominated_sort(scores, &self.dominance)
    }

    /// Crowding distances over one front, computed on scaled scores. Returns
    /// one distance per population index.
    pub fn crowding_distances(&self, scores: &[Vec<f64>], front: &[usize]) -> Result<Vec<f64>> {
        self.check_arity(scores)?;
        crowding_distance(&feature_scale(scores), front)
    }

    /// Select the fittest `floor(selection_fraction * n)` candidate indices.
    ///
    /// Whole fronts are taken while they fit; the front that would overflow
    /// the target is split by descending crowding distance. The result is a
    /// superset of front 0 whenever the target is large enough to hold it.
    pub fn select_fittest(&self, scores: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.check_arity(scores)?;

        let n = scores.len();
        let k = (self.selection_fraction * n as f64).floor() as usize;
        if k == 0 {
            return Ok(Vec::new());
        }

        let fronts = self.non_dominated_sort(scores);
        let scaled = feature_scale(scores);
        let mut selected: Vec<usize> = Vec::with_capacity(k);

        for front in &fronts {
            if selected.len() + front.len() <= k {
                selected.extend_from_slice(front);
                if selected.len() == k {
                    break;
                }
                continue;
            }

            // Fill the remainder with the most isolated members of this front
            let distances = crowding_distance(&scaled, front)?;
            let mut remainder = front.clone();
            remainder.sort_by(|&a, &b| {
                distances[b]
                    .partial_cmp(&distances[a])
                    .unwrap_or(Ordering::Equal)
            });
            remainder.truncate(k - selected.len());
            selected.extend(remainder);
            break;
        }

        debug!(
            "selected {} of {} candidates across {} fronts (target {})",
            selected.len(),
            n,
            fronts.len(),
            k
        );

        Ok(selected)
    }

    /// Default ranking consumed by the outer generational loop: a candidate's
    /// rank is the negated index of its front, so higher is always better.
    /// Ties within a front are intentionally left unresolved here.
    pub fn rank(&self, scores: &[Vec<f64>]) -> Result<Vec<f64>> {
        self.check_arity(scores)?;

        let mut ranks = vec![0.0; scores.len()];
        for (front_index, front) in self.non_dominated_sort(scores).iter().enumerate() {
            for &idx in front {
                ranks[idx] = -(front_index as f64);
            }
        }
        Ok(ranks)
    }

    fn check_arity(&self, scores: &[Vec<f64>]) -> Result<()> {
        let expected = self.directions.len();
        for score in scores {
            if score.len() != expected {
                return Err(PipegenError::ObjectiveArityMismatch {
                    expected,
                    actual: score.len(),
                });
            }
        }
        Ok(())
    }
}

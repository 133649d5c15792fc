//! Pareto primitives for multi-objective selection.
//! Implements NSGA-II style fast non-dominated sorting, sentinel-aware
//! feature scaling, and crowding distance.

use crate::error::{PipegenError, Result};
use serde::{Deserialize, Serialize};

/// Sentinel marking an objective that could not be computed for a candidate
/// (failed or invalid pipeline). Never treated as a legitimate best value.
pub const FAILURE_SENTINEL: f64 = f64::NEG_INFINITY;

pub fn is_failure(value: f64) -> bool {
    value == FAILURE_SENTINEL
}

/// Defines whether an objective should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

/// Check if score vector A Pareto-dominates score vector B.
///
/// A dominates B if A is no worse than B in every objective (respecting each
/// objective's direction) and strictly better in at least one. The failure
/// sentinel is the per-dimension worst value under either direction: a vector
/// carrying it never dominates anything, and a failed objective loses to any
/// real value even when the objective is minimized.
pub fn dominates(
    a_scores: &[f64],
    b_scores: &[f64],
    directions: &[OptimizationDirection],
) -> bool {
    if a_scores.len() != b_scores.len() || a_scores.len() != directions.len() {
        return false;
    }

    if a_scores.iter().copied().any(is_failure) {
        return false;
    }

    let mut at_least_one_better = false;

    for i in 0..a_scores.len() {
        let a_val = a_scores[i];
        let b_val = b_scores[i];

        let (a_better, b_better) = if is_failure(b_val) {
            // A failed objective is the dimension's worst regardless of
            // direction; under Minimize the raw comparison would let it win
            (true, false)
        } else {
            match directions[i] {
                OptimizationDirection::Maximize => (a_val > b_val, b_val > a_val),
                OptimizationDirection::Minimize => (a_val < b_val, b_val < a_val),
            }
        };

        if b_better {
            // B is better in this objective, so A does not dominate B
            return false;
        }

        if a_better {
            at_least_one_better = true;
        }
    }

    at_least_one_better
}

/// Fast non-dominated sorting (NSGA-II algorithm).
///
/// Partitions candidate indices into fronts: front 0 holds the indices
/// dominated by nobody, front k the indices dominated only by earlier fronts.
/// Every index appears in exactly one front. `dominance` is the strict
/// partial order the sort is built on. O(m * n^2) in population size n.
pub fn fast_non_dominated_sort<F>(scores: &[Vec<f64>], dominance: F) -> Vec<Vec<usize>>
where
    F: Fn(&[f64], &[f64]) -> bool,
{
    let n = scores.len();

    // For each candidate: how many dominate it, and which ones it dominates
    let mut domination_count = vec![0usize; n];
    let mut dominated: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut fronts: Vec<Vec<usize>> = Vec::new();

    let mut first_front = Vec::new();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }

            if dominance(&scores[i], &scores[j]) {
                dominated[i].push(j);
            } else if dominance(&scores[j], &scores[i]) {
                domination_count[i] += 1;
            }
        }

        if domination_count[i] == 0 {
            first_front.push(i);
        }
    }

    if first_front.is_empty() {
        return fronts;
    }
    fronts.push(first_front);

    // Peel subsequent fronts
    let mut front_index = 0;
    while front_index < fronts.len() {
        let mut next_front = Vec::new();

        for &i in &fronts[front_index] {
            for &j in &dominated[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next_front.push(j);
                }
            }
        }

        if !next_front.is_empty() {
            fronts.push(next_front);
        }
        front_index += 1;
    }

    fronts
}

/// Min-max normalize every objective dimension to [0, 1], skipping failure
/// sentinels.
///
/// Per dimension, in priority order:
/// 1. a single candidate in total gets 1;
/// 2. all values are the sentinel: everyone keeps the sentinel;
/// 3. max == min among valid values: candidates at the shared maximum get 1,
///    everyone else keeps or gets the sentinel (a degenerate dimension
///    carries no spread information);
/// 4. otherwise `(v - min) / (max - min)`.
pub fn feature_scale(scores: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = scores.len();
    if n == 0 {
        return Vec::new();
    }
    let num_objectives = scores[0].len();
    let mut scaled: Vec<Vec<f64>> = scores.to_vec();

    for dim in 0..num_objectives {
        if n == 1 {
            scaled[0][dim] = 1.0;
            continue;
        }

        let valid: Vec<f64> = scores
            .iter()
            .map(|s| s[dim])
            .filter(|&v| !is_failure(v))
            .collect();

        if valid.is_empty() {
            continue;
        }

        let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
        let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            for i in 0..n {
                scaled[i][dim] = if scores[i][dim] == max {
                    1.0
                } else {
                    FAILURE_SENTINEL
                };
            }
        } else {
            for i in 0..n {
                if !is_failure(scores[i][dim]) {
                    scaled[i][dim] = (scores[i][dim] - min) / (max - min);
                }
            }
        }
    }

    scaled
}

/// Calculate crowding distance for the candidates of one front.
///
/// Works on scaled scores. Per objective dimension the front is sorted by
/// value; the two boundary candidates get infinite distance and each interior
/// candidate accumulates `(next - previous) / range`, where `range` is the
/// within-front spread of that dimension (1 if zero). Distances land at the
/// candidate's true index, not its sorted position.
///
/// Returns one distance per population index; candidates outside the front
/// stay at 0. An empty front is a contract violation.
pub fn crowding_distance(scaled: &[Vec<f64>], front: &[usize]) -> Result<Vec<f64>> {
    if front.is_empty() {
        return Err(PipegenError::EmptyFront);
    }

    let mut distances = vec![0.0; scaled.len()];
    let front_size = front.len();

    if front_size <= 2 {
        // Boundary candidates have infinite crowding distance
        for &idx in front {
            distances[idx] = f64::INFINITY;
        }
        return Ok(distances);
    }

    let num_objectives = scaled[front[0]].len();

    for dim in 0..num_objectives {
        let mut sorted: Vec<usize> = front.to_vec();
        sorted.sort_by(|&a, &b| {
            scaled[a][dim]
                .partial_cmp(&scaled[b][dim])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[sorted[0]] = f64::INFINITY;
        distances[sorted[front_size - 1]] = f64::INFINITY;

        let min_val = scaled[sorted[0]][dim];
        let max_val = scaled[sorted[front_size - 1]][dim];
        let mut range = max_val - min_val;
        if range == 0.0 || !range.is_finite() {
            // Degenerate or sentinel-polluted dimension contributes no spread
            range = 1.0;
        }

        for position in 1..(front_size - 1) {
            let gap = scaled[sorted[position + 1]][dim] - scaled[sorted[position - 1]][dim];
            if gap.is_finite() {
                distances[sorted[position]] += gap / range;
            }
        }
    }

    Ok(distances)
}

/// Crowded comparison operator: rank first, diversity second.
/// Returns true if candidate A should be preferred over candidate B.
pub fn crowded_comparison(
    a_rank: usize,
    a_crowding: f64,
    b_rank: usize,
    b_crowding: f64,
) -> bool {
    if a_rank != b_rank {
        // Prefer the better (lower) Pareto front
        return a_rank < b_rank;
    }

    // Same front: prefer the more isolated candidate
    a_crowding > b_crowding
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directions(n: usize) -> Vec<OptimizationDirection> {
        vec![OptimizationDirection::Maximize; n]
    }

    #[test]
    fn test_dominance_maximize() {
        let dirs = directions(2);

        // A is better in both objectives
        assert!(dominates(&[10.0, 20.0], &[5.0, 10.0], &dirs));

        // A is better in one, equal in other
        assert!(dominates(&[10.0, 20.0], &[10.0, 10.0], &dirs));

        // A is better in one, worse in other - no dominance
        assert!(!dominates(&[10.0, 5.0], &[5.0, 10.0], &dirs));

        // Equal in both - no dominance
        assert!(!dominates(&[10.0, 20.0], &[10.0, 20.0], &dirs));
    }

    #[test]
    fn test_dominance_mixed_directions() {
        let dirs = vec![
            OptimizationDirection::Maximize,
            OptimizationDirection::Minimize,
        ];

        assert!(dominates(&[10.0, 5.0], &[5.0, 10.0], &dirs));
        assert!(!dominates(&[10.0, 15.0], &[5.0, 10.0], &dirs));
    }

    #[test]
    fn test_failed_candidate_never_dominates() {
        let dirs = vec![
            OptimizationDirection::Maximize,
            OptimizationDirection::Minimize,
        ];

        // Sentinel would "win" the minimized objective if treated as a value
        assert!(!dominates(&[5.0, FAILURE_SENTINEL], &[5.0, 10.0], &dirs));
        // A valid vector still dominates a failed one
        assert!(dominates(
            &[5.0, 1.0],
            &[FAILURE_SENTINEL, FAILURE_SENTINEL],
            &dirs
        ));
    }

    #[test]
    fn test_failed_objective_loses_under_minimize() {
        let dirs = vec![OptimizationDirection::Minimize];

        // Raw comparison would read the sentinel as the best minimized value
        assert!(dominates(&[1.0], &[FAILURE_SENTINEL], &dirs));
        assert!(!dominates(&[FAILURE_SENTINEL], &[1.0], &dirs));

        // Partial failure loses the failed dimension, not the whole vector
        let dirs = vec![
            OptimizationDirection::Minimize,
            OptimizationDirection::Minimize,
        ];
        assert!(!dominates(&[2.0, 5.0], &[1.0, FAILURE_SENTINEL], &dirs));
        assert!(dominates(&[1.0, 5.0], &[2.0, FAILURE_SENTINEL], &dirs));
    }

    #[test]
    fn test_fast_non_dominated_sort_partitions_population() {
        let dirs = directions(2);
        let scores = vec![
            vec![1.0, 5.0], // Front 0
            vec![3.0, 3.0], // Front 0
            vec![5.0, 1.0], // Front 0
            vec![2.0, 2.0], // Front 1
            vec![1.0, 1.0], // Front 2
        ];

        let fronts = fast_non_dominated_sort(&scores, |a, b| dominates(a, b, &dirs));

        assert_eq!(fronts.len(), 3);
        assert_eq!(fronts[0], vec![0, 1, 2]);
        assert_eq!(fronts[1], vec![3]);
        assert_eq!(fronts[2], vec![4]);

        let mut all: Vec<usize> = fronts.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_feature_scale_general_case() {
        let scores = vec![vec![0.0, 10.0], vec![5.0, 20.0], vec![10.0, 30.0]];
        let scaled = feature_scale(&scores);

        assert_eq!(scaled[0], vec![0.0, 0.0]);
        assert_eq!(scaled[1], vec![0.5, 0.5]);
        assert_eq!(scaled[2], vec![1.0, 1.0]);

        // Idempotent on already-scaled, non-degenerate data
        assert_eq!(feature_scale(&scaled), scaled);
    }

    #[test]
    fn test_feature_scale_single_candidate() {
        let scaled = feature_scale(&[vec![42.0, FAILURE_SENTINEL]]);
        assert_eq!(scaled, vec![vec![1.0, 1.0]]);
    }

    #[test]
    fn test_feature_scale_sentinel_handling() {
        // Dimension 0: all sentinel. Dimension 1: degenerate among valid.
        let scores = vec![
            vec![FAILURE_SENTINEL, 3.0],
            vec![FAILURE_SENTINEL, 3.0],
            vec![FAILURE_SENTINEL, FAILURE_SENTINEL],
        ];
        let scaled = feature_scale(&scores);

        for row in &scaled {
            assert!(is_failure(row[0]));
        }
        assert_eq!(scaled[0][1], 1.0);
        assert_eq!(scaled[1][1], 1.0);
        assert!(is_failure(scaled[2][1]));
    }

    #[test]
    fn test_crowding_distance_boundaries_are_infinite() {
        let scores = vec![
            vec![1.0, 5.0],
            vec![2.0, 4.0],
            vec![3.0, 3.0],
            vec![4.0, 2.0],
            vec![5.0, 1.0],
        ];
        let scaled = feature_scale(&scores);
        let front = vec![0, 1, 2, 3, 4];

        let distances = crowding_distance(&scaled, &front).unwrap();

        assert!(distances[0].is_infinite());
        assert!(distances[4].is_infinite());
        for &idx in &front[1..4] {
            assert!(distances[idx].is_finite());
            assert!(distances[idx] > 0.0);
        }
    }

    #[test]
    fn test_crowding_distance_small_front_all_infinite() {
        let scaled = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let distances = crowding_distance(&scaled, &[0, 1]).unwrap();
        assert!(distances[0].is_infinite());
        assert!(distances[1].is_infinite());
    }

    #[test]
    fn test_crowding_distance_empty_front_is_an_error() {
        assert!(matches!(
            crowding_distance(&[vec![1.0]], &[]),
            Err(PipegenError::EmptyFront)
        ));
    }

    #[test]
    fn test_crowding_distance_targets_true_indices() {
        // Front members are a non-contiguous subset of the population; the
        // accumulated distances must land on those indices, not on 0..len.
        let scores = vec![
            vec![9.0, 9.0], // not in front
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
        ];
        let scaled = feature_scale(&scores);
        let front = vec![1, 2, 3];

        let distances = crowding_distance(&scaled, &front).unwrap();

        assert_eq!(distances[0], 0.0);
        assert!(distances[1].is_infinite());
        assert!(distances[2].is_finite() && distances[2] > 0.0);
        assert!(distances[3].is_infinite());
    }

    #[test]
    fn test_crowded_comparison() {
        // Lower rank wins
        assert!(crowded_comparison(0, 0.1, 1, 10.0));
        assert!(!crowded_comparison(2, 10.0, 1, 0.1));
        // Same rank: higher crowding wins
        assert!(crowded_comparison(1, 2.0, 1, 1.0));
        assert!(!crowded_comparison(1, 1.0, 1, 2.0));
    }
}

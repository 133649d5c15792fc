pub mod pareto;
pub mod selector;

pub use pareto::{
    crowded_comparison, crowding_distance, dominates, fast_non_dominated_sort, feature_scale,
    is_failure, OptimizationDirection, FAILURE_SENTINEL,
};
pub use selector::{DominancePredicate, ParetoSelector};

//! Route search: leg cost evaluation and the exact visiting-order optimizer.

pub mod brute_force;
pub mod evaluator;
pub mod permutation;

pub use self::brute_force::RouteOptimizer;
pub use self::evaluator::RouteCostEvaluator;

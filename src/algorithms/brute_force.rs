use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::cmp::Ordering;
use std::iter;
use std::time::Instant;

use crate::algorithms::evaluator::RouteCostEvaluator;
use crate::algorithms::permutation::{factorial, nth_permutation};
use crate::config::OptimizerConfig;
use crate::error::OptimizeError;
use crate::models::{Address, Distance, OptimizationResult, Route, TripRequest};
use crate::oracle::DistanceOracle;
use crate::utils::CancellationToken;

/// Scored ordering, identified by its lexicographic rank
#[derive(Debug, Clone, Copy)]
struct Candidate {
    rank: usize,
    distance: Distance,
}

impl Candidate {
    fn worst() -> Self {
        Self {
            rank: usize::MAX,
            distance: Distance::INFINITY,
        }
    }

    /// Lower cost wins, ties go to the lower rank
    fn better(self, other: Self) -> Self {
        match self
            .distance
            .total_cmp(&other.distance)
            .then(self.rank.cmp(&other.rank))
        {
            Ordering::Greater => other,
            _ => self,
        }
    }
}

/// Exact visiting-order optimizer with fixed start and end
///
/// Every ordering of the stops is scored on a bounded worker pool; leg costs are
/// shared between orderings through a single-flight cache that lives for one
/// call. The winner is the cheapest ordering, and among equally cheap ones the
/// first in lexicographic order of the input positions, independent of worker
/// count.
pub struct RouteOptimizer<O> {
    oracle: O,
    config: OptimizerConfig,
    pool: ThreadPool,
}

impl<O: DistanceOracle> RouteOptimizer<O> {
    /// Creates an optimizer with the default configuration
    pub fn new(oracle: O) -> Result<Self, OptimizeError> {
        Self::with_config(oracle, OptimizerConfig::default())
    }

    pub fn with_config(oracle: O, config: OptimizerConfig) -> Result<Self, OptimizeError> {
        config
            .validate()
            .map_err(|error| OptimizeError::InvalidInput(error.to_string()))?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("route-worker-{}", index))
            .build()
            .map_err(|error| OptimizeError::WorkerPool(error.to_string()))?;

        Ok(Self {
            oracle,
            config,
            pool,
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Finds the cheapest route from `start` through every stop to `end`
    pub fn optimize(
        &self,
        start: O::Location,
        end: O::Location,
        stops: &[O::Location],
    ) -> Result<OptimizationResult<O::Location>, OptimizeError> {
        self.optimize_with_cancel(start, end, stops, &CancellationToken::new())
    }

    /// Same as [`optimize`](Self::optimize), aborting with `Cancelled` once `cancel` fires
    pub fn optimize_with_cancel(
        &self,
        start: O::Location,
        end: O::Location,
        stops: &[O::Location],
        cancel: &CancellationToken,
    ) -> Result<OptimizationResult<O::Location>, OptimizeError> {
        if stops.len() > self.config.max_stops {
            tracing::warn!(
                "Rejecting {} stops, ceiling is {}",
                stops.len(),
                self.config.max_stops
            );
            return Err(OptimizeError::InvalidInput(format!(
                "{} stops exceed the maximum of {}",
                stops.len(),
                self.config.max_stops
            )));
        }

        let cancel = cancel.child_with_timeout(self.config.timeout());
        if cancel.is_cancelled() {
            return Err(OptimizeError::Cancelled);
        }

        let evaluator =
            RouteCostEvaluator::new(&self.oracle, self.config.mode).with_cancellation(cancel.clone());
        let started = Instant::now();

        if stops.is_empty() {
            let route = Route::new(start, Vec::new(), end);
            let total_distance = evaluator.evaluate(&route)?;
            tracing::info!("Direct route, distance {:.2}", total_distance);
            return Ok(OptimizationResult::new(route, total_distance));
        }

        let k = stops.len();
        let orderings = factorial(k).ok_or_else(|| {
            OptimizeError::InvalidInput(format!("{} stops cannot be enumerated", k))
        })?;
        tracing::info!(
            "Searching {} orderings of {} stops on {} workers",
            orderings,
            k,
            self.config.workers
        );

        let best = self.pool.install(|| {
            (0..orderings)
                .into_par_iter()
                .map_init(
                    || Vec::with_capacity(k),
                    |order, rank| -> Result<Candidate, OptimizeError> {
                        nth_permutation(k, rank, order);
                        let sequence = iter::once(&start)
                            .chain(order.iter().map(|&position| &stops[position]))
                            .chain(iter::once(&end));
                        let distance = evaluator.evaluate_sequence(sequence)?;
                        Ok(Candidate { rank, distance })
                    },
                )
                .try_reduce(Candidate::worst, |a, b| Ok(a.better(b)))
        })?;

        // a search that raced a cancellation must not hand back its best-so-far
        if cancel.is_cancelled() {
            return Err(OptimizeError::Cancelled);
        }

        let mut order = Vec::with_capacity(k);
        nth_permutation(k, best.rank, &mut order);
        let route = Route::new(
            start,
            order.iter().map(|&position| stops[position].clone()).collect(),
            end,
        );

        tracing::info!(
            "Best ordering {:?} with distance {:.2} found in {:.2?}",
            order,
            best.distance,
            started.elapsed()
        );
        tracing::debug!(
            "Issued {} oracle queries for {} orderings",
            evaluator.queries(),
            orderings
        );

        Ok(OptimizationResult::new(route, best.distance))
    }
}

impl<O: DistanceOracle<Location = Address>> RouteOptimizer<O> {
    /// Optimizes a trip request collected by the input layer
    pub fn plan(
        &self,
        request: &TripRequest,
        cancel: &CancellationToken,
    ) -> Result<OptimizationResult<Address>, OptimizeError> {
        let (start, end, stops) = request.endpoints()?;
        self.optimize_with_cancel(start, end, &stops, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DropOff;
    use crate::oracle::MatrixOracle;

    #[test]
    fn test_candidate_ordering() {
        let cheap = Candidate {
            rank: 4,
            distance: 10.0,
        };
        let tied_earlier = Candidate {
            rank: 1,
            distance: 10.0,
        };
        let expensive = Candidate {
            rank: 0,
            distance: 11.0,
        };

        assert_eq!(cheap.better(expensive).rank, 4);
        assert_eq!(cheap.better(tied_earlier).rank, 1);
        assert_eq!(Candidate::worst().better(expensive).rank, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = OptimizerConfig {
            workers: 0,
            ..OptimizerConfig::default()
        };

        assert!(matches!(
            RouteOptimizer::with_config(MatrixOracle::<&str>::new(), config),
            Err(OptimizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_plan_uses_last_drop_off_as_end() {
        let oracle: MatrixOracle<Address> = [
            ("Office", "1 Oak St", 3.0),
            ("Office", "9 Elm St", 1.0),
            ("1 Oak St", "9 Elm St", 2.0),
            ("9 Elm St", "1 Oak St", 2.0),
            ("1 Oak St", "5 Pine St", 4.0),
            ("9 Elm St", "5 Pine St", 9.0),
        ]
        .into_iter()
        .map(|(a, b, d)| (a.to_string(), b.to_string(), d))
        .collect();
        let optimizer = RouteOptimizer::new(oracle).unwrap();

        let mut request = TripRequest::new("Office");
        request.add_drop_off(DropOff::named("Ann", "1 Oak St"));
        request.add_drop_off(DropOff::named("Bob", "9 Elm St"));
        request.add_drop_off(DropOff::named("Cid", "5 Pine St"));

        let result = optimizer
            .plan(&request, &CancellationToken::new())
            .unwrap();
        assert_eq!(
            result.route.locations(),
            &["Office", "9 Elm St", "1 Oak St", "5 Pine St"]
        );
        assert_eq!(result.total_distance, 7.0);
    }
}

use crate::error::OptimizeError;
use crate::models::{Distance, Route};
use crate::oracle::{checked_distance, DistanceOracle, LegCache, TravelMode};
use crate::utils::CancellationToken;

/// Sums directed leg costs along a route
///
/// Every leg goes through a [`LegCache`] owned by the evaluator, so an evaluator
/// should not outlive the optimization request it was created for. A failing leg
/// fails the whole evaluation; it is never counted as zero.
pub struct RouteCostEvaluator<'a, O: DistanceOracle> {
    oracle: &'a O,
    mode: TravelMode,
    cache: LegCache<O::Location>,
    cancel: CancellationToken,
}

impl<'a, O: DistanceOracle> RouteCostEvaluator<'a, O> {
    pub fn new(oracle: &'a O, mode: TravelMode) -> Self {
        Self {
            oracle,
            mode,
            cache: LegCache::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cost of a single directed leg
    pub fn leg(&self, origin: &O::Location, destination: &O::Location) -> Result<Distance, OptimizeError> {
        if self.cancel.is_cancelled() {
            return Err(OptimizeError::Cancelled);
        }

        let distance = self.cache.get_or_query(origin, destination, || {
            tracing::trace!("Querying leg {:?} -> {:?}", origin, destination);
            self.oracle
                .distance(origin, destination, self.mode)
                .and_then(|value| checked_distance(origin, destination, value))
        })?;

        Ok(distance)
    }

    /// Total cost of a route
    pub fn evaluate(&self, route: &Route<O::Location>) -> Result<Distance, OptimizeError> {
        self.evaluate_sequence(route.locations())
    }

    /// Total cost of visiting `locations` in order; fewer than two locations cost nothing
    pub fn evaluate_sequence<'b, I>(&self, locations: I) -> Result<Distance, OptimizeError>
    where
        I: IntoIterator<Item = &'b O::Location>,
        O::Location: 'b,
    {
        let mut locations = locations.into_iter();
        let Some(mut previous) = locations.next() else {
            return Ok(0.0);
        };

        let mut total = 0.0;
        for current in locations {
            total += self.leg(previous, current)?;
            previous = current;
        }

        Ok(total)
    }

    /// Oracle queries issued so far
    pub fn queries(&self) -> usize {
        self.cache.queries()
    }
}

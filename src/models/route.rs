// Route models for representing visiting orders

use serde::Serialize;

use crate::error::OptimizeError;
use crate::models::Distance;

/// An ordered visiting sequence whose first and last entries are the fixed endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route<L> {
    locations: Vec<L>,
}

impl<L> Route<L> {
    /// Builds `[start] + stops + [end]`
    pub fn new(start: L, stops: Vec<L>, end: L) -> Self {
        let mut locations = Vec::with_capacity(stops.len() + 2);
        locations.push(start);
        locations.extend(stops);
        locations.push(end);

        Self { locations }
    }

    /// Wraps an existing sequence, rejecting anything shorter than two locations
    pub fn from_locations(locations: Vec<L>) -> Result<Self, OptimizeError> {
        if locations.len() < 2 {
            return Err(OptimizeError::InvalidInput(format!(
                "a route needs a start and an end, got {} location(s)",
                locations.len()
            )));
        }

        Ok(Self { locations })
    }

    pub fn start(&self) -> &L {
        &self.locations[0]
    }

    pub fn end(&self) -> &L {
        &self.locations[self.locations.len() - 1]
    }

    /// Intermediate stops in visiting order
    pub fn stops(&self) -> &[L] {
        &self.locations[1..self.locations.len() - 1]
    }

    pub fn locations(&self) -> &[L] {
        &self.locations
    }

    /// Consecutive `(origin, destination)` pairs
    pub fn legs(&self) -> impl Iterator<Item = (&L, &L)> + '_ {
        self.locations.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false, a route holds at least its two endpoints
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Best route found by one optimization request together with its total cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult<L> {
    pub route: Route<L>,
    pub total_distance: Distance,
}

impl<L> OptimizationResult<L> {
    pub fn new(route: Route<L>, total_distance: Distance) -> Self {
        Self {
            route,
            total_distance,
        }
    }
}

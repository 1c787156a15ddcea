// Great-circle distance between resolved coordinates

use crate::error::OracleError;
use crate::models::{Coordinate, Distance};
use crate::oracle::{DistanceOracle, TravelMode};

/// Straight-line distance in meters over the earth's surface
///
/// Symmetric by construction; useful when no road data is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineOracle;

impl HaversineOracle {
    pub fn new() -> Self {
        Self
    }
}

impl DistanceOracle for HaversineOracle {
    type Location = Coordinate;

    fn distance(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        _mode: TravelMode,
    ) -> Result<Distance, OracleError> {
        if !origin.is_valid() || !destination.is_valid() {
            return Err(OracleError::no_route(origin, destination));
        }
        Ok(origin.haversine_to(destination))
    }
}

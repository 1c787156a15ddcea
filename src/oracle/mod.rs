//! Distance oracles: point-to-point travel cost between two locations.
//!
//! The optimizer only sees the [`DistanceOracle`] trait. Adapters here cover an
//! explicit cost table, great-circle distance, a road network graph, and an
//! address-to-coordinate bridge over any of those.

mod cache;
mod geocoded;
mod haversine;
mod matrix;
mod road_network;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::OracleError;
use crate::models::Distance;

pub use self::cache::LegCache;
pub use self::geocoded::GeocodedOracle;
pub use self::haversine::HaversineOracle;
pub use self::matrix::MatrixOracle;
pub use self::road_network::RoadNetworkOracle;

/// Travel mode passed to every distance query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
}

/// Answers directed distance queries
///
/// Costs are not assumed symmetric: `distance(a, b)` and `distance(b, a)` are
/// independent queries.
pub trait DistanceOracle: Send + Sync {
    /// Stable, comparable location identifier
    type Location: Clone + Eq + Hash + Debug + Send + Sync;

    /// Travel cost from `origin` to `destination`
    fn distance(
        &self,
        origin: &Self::Location,
        destination: &Self::Location,
        mode: TravelMode,
    ) -> Result<Distance, OracleError>;
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for &T {
    type Location = T::Location;

    fn distance(
        &self,
        origin: &Self::Location,
        destination: &Self::Location,
        mode: TravelMode,
    ) -> Result<Distance, OracleError> {
        (**self).distance(origin, destination, mode)
    }
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for Box<T> {
    type Location = T::Location;

    fn distance(
        &self,
        origin: &Self::Location,
        destination: &Self::Location,
        mode: TravelMode,
    ) -> Result<Distance, OracleError> {
        (**self).distance(origin, destination, mode)
    }
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for Arc<T> {
    type Location = T::Location;

    fn distance(
        &self,
        origin: &Self::Location,
        destination: &Self::Location,
        mode: TravelMode,
    ) -> Result<Distance, OracleError> {
        (**self).distance(origin, destination, mode)
    }
}

/// Rejects negative and non-finite costs
pub(crate) fn checked_distance<L: Debug>(
    origin: &L,
    destination: &L,
    value: Distance,
) -> Result<Distance, OracleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(OracleError::InvalidDistance {
            origin: format!("{:?}", origin),
            destination: format!("{:?}", destination),
            value,
        })
    }
}

//! Address services consumed around the optimizer: geocoding for the map and
//! autocomplete for the input layer.

mod gazetteer;

use crate::error::GeocodeError;
use crate::models::Coordinate;

pub use self::gazetteer::Gazetteer;

/// Resolves a free-text address to a coordinate
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// Autocomplete candidates for a partially typed address
pub trait AddressSuggester {
    /// Candidate addresses, best first; empty for a blank query
    fn suggest(&self, partial_query: &str) -> Vec<String>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        (**self).geocode(address)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for std::sync::Arc<T> {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        (**self).geocode(address)
    }
}

// Coordinate model for resolved locations

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::models::Distance;

/// A resolved WGS84 position
///
/// Equality and hashing compare the exact bit patterns of both components so that
/// a coordinate can key the leg cache. `-0.0` is normalized to `0.0` on construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate from latitude and longitude in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude + 0.0,
            longitude: longitude + 0.0,
        }
    }

    /// Great-circle distance in meters
    pub fn haversine_to(&self, other: &Coordinate) -> Distance {
        self.to_point().haversine_distance(&other.to_point())
    }

    /// Planar distance in degrees, used for snapping to the nearest road vertex
    pub fn planar_distance_to(&self, other: &Coordinate) -> f64 {
        ((self.latitude - other.latitude).powi(2) + (self.longitude - other.longitude).powi(2))
            .sqrt()
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

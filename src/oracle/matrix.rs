// Explicit table of directed leg costs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::hash::Hash;
use std::path::Path;

use crate::error::{OracleError, Result};
use crate::models::{Address, Distance};
use crate::oracle::{checked_distance, DistanceOracle, TravelMode};

/// Directed cost table
///
/// A pair that is not listed has no route, except that a location is always
/// zero distance from itself.
#[derive(Debug, Clone)]
pub struct MatrixOracle<L> {
    legs: HashMap<(L, L), Distance>,
}

// JSON layout of a cost table, tuple keys cannot be map keys in JSON
#[derive(Serialize, Deserialize)]
struct LegTable {
    legs: Vec<LegRecord>,
}

#[derive(Serialize, Deserialize)]
struct LegRecord {
    origin: Address,
    destination: Address,
    distance: Distance,
}

impl<L: Eq + Hash> MatrixOracle<L> {
    pub fn new() -> Self {
        Self {
            legs: HashMap::new(),
        }
    }

    /// Sets the cost from `origin` to `destination` only; the reverse leg is untouched
    pub fn insert(&mut self, origin: L, destination: L, distance: Distance) {
        self.legs.insert((origin, destination), distance);
    }

    pub fn get(&self, origin: &L, destination: &L) -> Option<Distance>
    where
        L: Clone,
    {
        self.legs
            .get(&(origin.clone(), destination.clone()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

impl<L: Eq + Hash> Default for MatrixOracle<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Eq + Hash> FromIterator<(L, L, Distance)> for MatrixOracle<L> {
    fn from_iter<I: IntoIterator<Item = (L, L, Distance)>>(iter: I) -> Self {
        let mut oracle = Self::new();
        for (origin, destination, distance) in iter {
            oracle.insert(origin, destination, distance);
        }
        oracle
    }
}

impl MatrixOracle<Address> {
    /// Parses `{"legs": [{"origin": .., "destination": .., "distance": ..}]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let table: LegTable = serde_json::from_str(json)?;
        Ok(table
            .legs
            .into_iter()
            .map(|leg| (leg.origin, leg.destination, leg.distance))
            .collect())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let oracle = Self::from_json(&json)?;
        tracing::debug!(
            "Loaded {} legs from {}",
            oracle.len(),
            path.as_ref().display()
        );
        Ok(oracle)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut legs: Vec<LegRecord> = self
            .legs
            .iter()
            .map(|((origin, destination), distance)| LegRecord {
                origin: origin.clone(),
                destination: destination.clone(),
                distance: *distance,
            })
            .collect();
        legs.sort_by(|a, b| (&a.origin, &a.destination).cmp(&(&b.origin, &b.destination)));

        Ok(serde_json::to_string_pretty(&LegTable { legs })?)
    }
}

impl<L> DistanceOracle for MatrixOracle<L>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
{
    type Location = L;

    fn distance(
        &self,
        origin: &L,
        destination: &L,
        _mode: TravelMode,
    ) -> std::result::Result<Distance, OracleError> {
        match self.get(origin, destination) {
            Some(distance) => checked_distance(origin, destination, distance),
            None if origin == destination => Ok(0.0),
            None => Err(OracleError::no_route(origin, destination)),
        }
    }
}

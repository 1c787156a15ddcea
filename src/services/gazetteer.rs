// In-memory place index used for geocoding and address suggestions

use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{GeocodeError, Result};
use crate::models::Coordinate;
use crate::services::{AddressSuggester, Geocoder};

/// Default number of suggestions returned for a query
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// How well a known address matches a query, better matches first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum MatchTier {
    Exact,
    Prefix,
    WordPrefix,
    Substring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Place {
    address: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct PlaceFile {
    places: Vec<Place>,
}

/// Known addresses with their coordinates
///
/// Lookups ignore case and surrounding whitespace. Suggestions keep insertion
/// order within a match tier.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    places: Vec<(String, Coordinate)>,
    index: HashMap<String, usize>,
    limit: usize,
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

impl Gazetteer {
    pub fn new() -> Self {
        Self {
            places: Vec::new(),
            index: HashMap::new(),
            limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Adds or replaces a place
    pub fn insert<S: Into<String>>(&mut self, address: S, coordinate: Coordinate) {
        let address = address.into();
        let key = normalize(&address);
        match self.index.get(&key) {
            Some(&position) => self.places[position] = (address, coordinate),
            None => {
                self.index.insert(key, self.places.len());
                self.places.push((address, coordinate));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Parses `{"places": [{"address": .., "latitude": .., "longitude": ..}]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PlaceFile = serde_json::from_str(json)?;
        let mut gazetteer = Self::new();
        for place in file.places {
            gazetteer.insert(place.address, Coordinate::new(place.latitude, place.longitude));
        }
        Ok(gazetteer)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let gazetteer = Self::from_json(&fs::read_to_string(path.as_ref())?)?;
        tracing::debug!(
            "Loaded {} places from {}",
            gazetteer.len(),
            path.as_ref().display()
        );
        Ok(gazetteer)
    }

    fn match_tier(candidate: &str, query: &str) -> Option<MatchTier> {
        if candidate == query {
            Some(MatchTier::Exact)
        } else if candidate.starts_with(query) {
            Some(MatchTier::Prefix)
        } else if candidate
            .split(|c: char| c.is_whitespace() || c == ',')
            .any(|word| !word.is_empty() && word.starts_with(query))
        {
            Some(MatchTier::WordPrefix)
        } else if candidate.contains(query) {
            Some(MatchTier::Substring)
        } else {
            None
        }
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for Gazetteer {
    fn geocode(&self, address: &str) -> std::result::Result<Coordinate, GeocodeError> {
        self.index
            .get(&normalize(address))
            .map(|&position| self.places[position].1)
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}

impl AddressSuggester for Gazetteer {
    fn suggest(&self, partial_query: &str) -> Vec<String> {
        let query = normalize(partial_query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut ranked = PriorityQueue::new();
        for (position, (address, _)) in self.places.iter().enumerate() {
            if let Some(tier) = Self::match_tier(&normalize(address), &query) {
                ranked.push(position, Reverse((tier, position)));
            }
        }

        let mut suggestions = Vec::with_capacity(self.limit.min(ranked.len()));
        while suggestions.len() < self.limit {
            match ranked.pop() {
                Some((position, _)) => suggestions.push(self.places[position].0.clone()),
                None => break,
            }
        }
        suggestions
    }
}

// Synthetic oracles shared by the integration tests
#![allow(dead_code)]

use drop_route::{DistanceOracle, MatrixOracle, OracleError, TravelMode};
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// Wraps a cost table and records how often each ordered pair was asked for
pub struct CountingOracle {
    inner: MatrixOracle<String>,
    calls: Mutex<HashMap<(String, String), usize>>,
    failing_leg: Option<(String, String, OracleError)>,
    delay: Duration,
}

impl CountingOracle {
    pub fn new(inner: MatrixOracle<String>) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
            failing_leg: None,
            delay: Duration::ZERO,
        }
    }

    pub fn failing_on(mut self, origin: &str, destination: &str, error: OracleError) -> Self {
        self.failing_leg = Some((origin.to_string(), destination.to_string(), error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> HashMap<(String, String), usize> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl DistanceOracle for CountingOracle {
    type Location = String;

    fn distance(
        &self,
        origin: &String,
        destination: &String,
        mode: TravelMode,
    ) -> Result<f64, OracleError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry((origin.clone(), destination.clone()))
            .or_insert(0) += 1;

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        if let Some((from, to, error)) = &self.failing_leg {
            if from == origin && to == destination {
                return Err(error.clone());
            }
        }
        self.inner.distance(origin, destination, mode)
    }
}

/// Cost table from `(origin, destination, distance)` triples
pub fn matrix(legs: &[(&str, &str, f64)]) -> MatrixOracle<String> {
    legs.iter()
        .map(|(a, b, d)| (a.to_string(), b.to_string(), *d))
        .collect()
}

/// Deterministic asymmetric costs over every ordered pair of `names`
pub fn dense_matrix(names: &[String], seed: u64) -> MatrixOracle<String> {
    let mut oracle = MatrixOracle::new();
    for (i, a) in names.iter().enumerate() {
        for (j, b) in names.iter().enumerate() {
            if i != j {
                let mixed = (i as u64 * 7919 + j as u64 * 104_729 + seed * 31).wrapping_mul(2_654_435_761);
                oracle.insert(a.clone(), b.clone(), (mixed % 1000) as f64 + 1.0);
            }
        }
    }
    oracle
}

pub fn names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}

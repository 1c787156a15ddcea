//! Optimizer settings.
//!
//! Loaded from JSON and overridden by command line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::oracle::TravelMode;

/// Largest stop count the exact search will ever accept, 10! orderings
pub const HARD_STOP_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Ceiling on intermediate stops
    pub max_stops: usize,

    /// Bound on concurrently outstanding oracle queries
    pub workers: usize,

    /// Optional deadline for one optimize() call
    pub timeout_ms: Option<u64>,

    pub mode: TravelMode,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_stops: 8,
            workers: 4,
            timeout_ms: None,
            mode: TravelMode::Driving,
        }
    }
}

impl OptimizerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_stops == 0 || self.max_stops > HARD_STOP_LIMIT {
            return Err(Error::Config(format!(
                "max_stops must be between 1 and {}, got {}",
                HARD_STOP_LIMIT, self.max_stops
            )));
        }
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// Error types shared by the oracle adapters, the optimizer and the glue around them

/// Failure of a single distance query
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    /// Transient network or service failure
    #[error("distance service unavailable: {0}")]
    Unavailable(String),

    /// The service refused the query; callers may back off and retry
    #[error("distance service rate limited: {0}")]
    RateLimited(String),

    /// There is no viable path for this leg
    #[error("no route found from {origin} to {destination}")]
    NoRouteFound { origin: String, destination: String },

    /// The service answered with a negative or non-finite cost
    #[error("invalid distance {value} from {origin} to {destination}")]
    InvalidDistance {
        origin: String,
        destination: String,
        value: f64,
    },
}

impl OracleError {
    pub(crate) fn no_route<L: std::fmt::Debug>(origin: &L, destination: &L) -> Self {
        OracleError::NoRouteFound {
            origin: format!("{:?}", origin),
            destination: format!("{:?}", destination),
        }
    }
}

/// Failure to resolve an address to a coordinate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocodeError {
    #[error("address not found: {0}")]
    NotFound(String),

    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),
}

impl From<GeocodeError> for OracleError {
    fn from(error: GeocodeError) -> Self {
        match error {
            GeocodeError::NotFound(address) => OracleError::NoRouteFound {
                origin: address,
                destination: String::from("<unresolved>"),
            },
            GeocodeError::Unavailable(reason) => OracleError::Unavailable(reason),
        }
    }
}

/// Failure of one optimize() call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizeError {
    /// A leg could not be priced; no partial answer is produced
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Stop count above the ceiling, or a missing start/end
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller aborted or the deadline passed before completion
    #[error("optimization cancelled")]
    Cancelled,

    #[error("cannot build worker pool: {0}")]
    WorkerPool(String),
}

impl OptimizeError {
    /// True when the failure came from the distance oracle
    pub fn is_oracle_failure(&self) -> bool {
        matches!(self, OptimizeError::Oracle(_))
    }
}

/// Crate-wide error for loading inputs and producing outputs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("parse error in {source_name} line {line}: {reason}")]
    Parse {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Optimize(#[from] OptimizeError),

    #[error("map rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_error_converts_into_optimize_error() {
        let error: OptimizeError = OracleError::RateLimited("quota".to_string()).into();
        assert!(error.is_oracle_failure());
        assert!(!OptimizeError::Cancelled.is_oracle_failure());
    }

    #[test]
    fn geocode_not_found_becomes_no_route() {
        let error: OracleError = GeocodeError::NotFound("Nowhere 1".to_string()).into();
        assert!(matches!(error, OracleError::NoRouteFound { ref origin, .. } if origin == "Nowhere 1"));
    }

    #[test]
    fn no_route_message_names_both_ends() {
        let error = OracleError::no_route(&"A", &"B");
        assert_eq!(error.to_string(), "no route found from \"A\" to \"B\"");
    }
}

//! # drop_route
//!
//! Finds the visiting order for a start location, a set of drop-off points and a
//! fixed end that minimizes total travel distance, by exact search over every
//! ordering. Distances come from an injected [`DistanceOracle`]; the best route
//! can be turned into a directions deep link or an SVG map.

// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod oracle;
pub mod render;
pub mod services;
pub mod utils;

// Re-exports for convenience
pub use algorithms::{RouteCostEvaluator, RouteOptimizer};
pub use config::OptimizerConfig;
pub use error::{Error, GeocodeError, OptimizeError, OracleError};
pub use models::{Coordinate, DropOff, OptimizationResult, Route, TripRequest};
pub use oracle::{DistanceOracle, MatrixOracle, TravelMode};
pub use utils::CancellationToken;

// Models module - exports all model types

mod drop_off;
mod location;
mod route;

// Re-export model types
pub use self::drop_off::{DropOff, TripRequest};
pub use self::location::Coordinate;
pub use self::route::{OptimizationResult, Route};

// Common type aliases for improved code readability
pub type Address = String;
pub type Distance = f64;

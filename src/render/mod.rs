//! Presentation adapters consuming an optimized route.

pub mod deep_link;
pub mod map;

pub use self::deep_link::build_link;
pub use self::map::{marker_labels, resolve_coordinates, MapRenderer};

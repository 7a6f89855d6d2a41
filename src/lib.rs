//! route-pins core
//!
//! Encoded polyline codec plus bookkeeping for the markers a route leaves on
//! a map display.

pub mod geo;
pub mod polyline;
pub mod traits;
pub mod markers;
pub mod surface;
pub mod directions;
pub mod session;

pub use geo::GeoPoint;
pub use markers::{MarkerError, MarkerHandle, MarkerSetManager, MarkerState};
pub use polyline::{Polyline, PolylineError};

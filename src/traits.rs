//! Seams to the collaborators outside this crate.
//!
//! The map widget and the routing service both live elsewhere. Hosts
//! implement these for their own display and provider.

use crate::directions::{DirectionsError, RouteRequest, RouteSummary};
use crate::geo::GeoPoint;
use crate::markers::MarkerHandle;

/// The display a marker set is drawn on.
///
/// Calls arrive only on state transitions: `attach` for a marker that was
/// detached (or new), `detach` for one that was attached.
pub trait DisplaySurface {
    /// Show `marker` at `position`.
    fn attach(&mut self, marker: MarkerHandle, position: GeoPoint);

    /// Remove `marker` from view. The manager may attach it again later.
    fn detach(&mut self, marker: MarkerHandle);

    /// Move `marker`, whether or not it is currently attached.
    fn set_position(&mut self, marker: MarkerHandle, position: GeoPoint);

    /// `marker` was deleted and its handle will never be used again.
    /// Always preceded by `detach` if the marker was attached.
    fn remove(&mut self, marker: MarkerHandle) {
        let _ = marker;
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn attach(&mut self, marker: MarkerHandle, position: GeoPoint) {
        (**self).attach(marker, position)
    }

    fn detach(&mut self, marker: MarkerHandle) {
        (**self).detach(marker)
    }

    fn set_position(&mut self, marker: MarkerHandle, position: GeoPoint) {
        (**self).set_position(marker, position)
    }

    fn remove(&mut self, marker: MarkerHandle) {
        (**self).remove(marker)
    }
}

/// Supplies routes between two points.
pub trait RouteProvider {
    fn route(&self, request: &RouteRequest) -> Result<RouteSummary, DirectionsError>;
}

//! One map session: a route's waypoints shown as markers.
//!
//! The session owns its marker set outright; hosts keep one per map and pass
//! it to whatever handles route results and button events.

use thiserror::Error;

use crate::directions::{DirectionsError, RouteRequest, RouteSummary};
use crate::markers::{MarkerError, MarkerHandle, MarkerSetManager};
use crate::polyline::{self, DEFAULT_PRECISION, PolylineError};
use crate::traits::{DisplaySurface, RouteProvider};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Place a marker on every `marker_stride`-th decoded waypoint.
    pub marker_stride: usize,
    /// Precision of the provider's encoded polylines.
    pub precision: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            marker_stride: 2,
            precision: DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("marker stride must be at least 1")]
    InvalidStride,
    #[error(transparent)]
    Polyline(#[from] PolylineError),
    #[error(transparent)]
    Directions(#[from] DirectionsError),
    #[error(transparent)]
    Marker(#[from] MarkerError),
}

/// Result of showing a fetched route.
#[derive(Debug, Clone)]
pub struct DisplayedRoute {
    pub summary: RouteSummary,
    pub markers: Vec<MarkerHandle>,
}

#[derive(Debug)]
pub struct MapSession<S: DisplaySurface> {
    config: SessionConfig,
    markers: MarkerSetManager<S>,
}

impl<S: DisplaySurface> MapSession<S> {
    pub fn new(surface: S, config: SessionConfig) -> Result<Self, SessionError> {
        if config.marker_stride == 0 {
            return Err(SessionError::InvalidStride);
        }
        Ok(Self {
            config,
            markers: MarkerSetManager::new(surface),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn markers(&self) -> &MarkerSetManager<S> {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut MarkerSetManager<S> {
        &mut self.markers
    }

    /// Decodes `encoded` and marks every `marker_stride`-th waypoint.
    ///
    /// Existing markers are hidden first and then reused in order; any left
    /// over past the new route stay hidden. A malformed polyline leaves the
    /// marker set untouched.
    pub fn show_route(&mut self, encoded: &str) -> Result<Vec<MarkerHandle>, SessionError> {
        let waypoints = polyline::decode(encoded, self.config.precision).inspect_err(|err| {
            tracing::warn!(error = %err, "route polyline rejected");
        })?;

        self.markers.hide_all();

        let placed = waypoints
            .iter()
            .step_by(self.config.marker_stride)
            .enumerate()
            .map(|(slot, point)| self.markers.replace_at(slot, *point))
            .collect::<Vec<_>>();

        tracing::debug!(
            waypoints = waypoints.len(),
            placed = placed.len(),
            tracked = self.markers.len(),
            "route markers placed"
        );
        Ok(placed)
    }

    /// Requests a route from `provider` and shows its overview polyline.
    pub fn request_route<P: RouteProvider>(
        &mut self,
        provider: &P,
        request: &RouteRequest,
    ) -> Result<DisplayedRoute, SessionError> {
        let summary = provider.route(request)?;
        let markers = self.show_route(&summary.overview_polyline)?;
        Ok(DisplayedRoute { summary, markers })
    }

    pub fn show_markers(&mut self) {
        self.markers.show_all();
    }

    pub fn hide_markers(&mut self) {
        self.markers.hide_all();
    }

    pub fn delete_markers(&mut self) {
        self.markers.delete_all();
    }

    pub fn into_markers(self) -> MarkerSetManager<S> {
        self.markers
    }
}

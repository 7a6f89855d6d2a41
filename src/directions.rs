//! OSRM HTTP adapter for route directions.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;
use crate::traits::RouteProvider;

pub const BASE_URL_ENV: &str = "ROUTE_PINS_OSRM_URL";
pub const TIMEOUT_ENV: &str = "ROUTE_PINS_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl DirectionsConfig {
    /// Defaults overridden by `ROUTE_PINS_OSRM_URL` and `ROUTE_PINS_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`DirectionsConfig::from_env`], reading variables through `lookup`.
    /// An unparsable timeout falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = lookup(BASE_URL_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.base_url);
        let timeout_secs = lookup(TIMEOUT_ENV)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
}

impl TravelMode {
    /// OSRM profile name.
    pub fn profile(self) -> &'static str {
        match self {
            TravelMode::Driving => "car",
            TravelMode::Walking => "foot",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub mode: TravelMode,
}

impl Default for RouteRequest {
    fn default() -> Self {
        Self {
            origin: GeoPoint::new(33.9854893, -5.1813223),
            destination: GeoPoint::new(33.8810713, -5.5730396),
            mode: TravelMode::Driving,
        }
    }
}

/// The parts of a route result this crate consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Encoded polyline (precision 5) of the whole route.
    pub overview_polyline: String,
    pub distance_m: f64,
    pub duration_s: f64,
    /// Maneuver location of every step, in travel order.
    pub step_locations: Vec<GeoPoint>,
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("directions provider returned HTTP {0}")]
    Status(u16),
    #[error("no route found ({code}): {message}")]
    NoRoute { code: String, message: String },
}

#[derive(Debug, Clone)]
pub struct OsrmDirections {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl OsrmDirections {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn route_url(&self, request: &RouteRequest) -> String {
        let coords = [request.origin, request.destination]
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline&steps=true",
            self.config.base_url.trim_end_matches('/'),
            request.mode.profile(),
            coords
        )
    }
}

impl RouteProvider for OsrmDirections {
    fn route(&self, request: &RouteRequest) -> Result<RouteSummary, DirectionsError> {
        let url = self.route_url(request);
        tracing::debug!(%url, mode = ?request.mode, "requesting route");

        let response = self.client.get(&url).send().inspect_err(|err| {
            tracing::warn!(%url, error = %err, "directions request failed");
        })?;

        let status = response.status();
        if !status.is_success() {
            // OSRM reports NoRoute and friends as 400 with a JSON body.
            return Err(match response.json::<OsrmRouteResponse>() {
                Ok(body) => body.into_no_route(),
                Err(_) => DirectionsError::Status(status.as_u16()),
            });
        }

        let body = response.json::<OsrmRouteResponse>()?;
        if body.code != "Ok" {
            return Err(body.into_no_route());
        }

        let route = body.routes.into_iter().next().ok_or_else(|| DirectionsError::NoRoute {
            code: "NoRoute".to_string(),
            message: "response contained no routes".to_string(),
        })?;

        let step_locations = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|step| GeoPoint::new(step.maneuver.location[1], step.maneuver.location[0]))
            .collect::<Vec<_>>();

        tracing::debug!(
            distance_m = route.distance,
            duration_s = route.duration,
            steps = step_locations.len(),
            "route received"
        );

        Ok(RouteSummary {
            overview_polyline: route.geometry,
            distance_m: route.distance,
            duration_s: route.duration,
            step_locations,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

impl OsrmRouteResponse {
    fn into_no_route(self) -> DirectionsError {
        DirectionsError::NoRoute {
            code: self.code,
            message: self.message.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    /// `[lng, lat]`
    location: [f64; 2],
}

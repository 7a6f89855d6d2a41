//! Test fixtures for route-pins.
//!
//! Provides:
//! - Known encoded polylines and their decoded points
//! - A display surface that records every call it receives

#![allow(dead_code)]

pub mod routes;

pub use routes::*;

use route_pins::{GeoPoint, MarkerHandle};
use route_pins::traits::DisplaySurface;

/// One call made on a display surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Attach(MarkerHandle, GeoPoint),
    Detach(MarkerHandle),
    Move(MarkerHandle, GeoPoint),
    Remove(MarkerHandle),
}

/// Surface that logs calls in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attaches(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Attach(..)))
            .count()
    }

    pub fn detaches(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Detach(..)))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DisplaySurface for RecordingSurface {
    fn attach(&mut self, marker: MarkerHandle, position: GeoPoint) {
        self.calls.push(SurfaceCall::Attach(marker, position));
    }

    fn detach(&mut self, marker: MarkerHandle) {
        self.calls.push(SurfaceCall::Detach(marker));
    }

    fn set_position(&mut self, marker: MarkerHandle, position: GeoPoint) {
        self.calls.push(SurfaceCall::Move(marker, position));
    }

    fn remove(&mut self, marker: MarkerHandle) {
        self.calls.push(SurfaceCall::Remove(marker));
    }
}

/// Asserts two point lists match axis by axis within `tolerance`.
pub fn assert_points_close(actual: &[GeoPoint], expected: &[GeoPoint], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "point counts differ");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            a.approx_eq(e, tolerance),
            "point {} differs: got {}, expected {}",
            i,
            a,
            e
        );
    }
}

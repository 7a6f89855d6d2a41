//! In-memory display surface.

use std::collections::HashMap;

use crate::geo::GeoPoint;
use crate::markers::MarkerHandle;
use crate::traits::DisplaySurface;

/// A surface with no widget behind it.
///
/// Keeps the set of visible markers and the last position sent for every
/// marker that has not been removed. Useful for hosts that render elsewhere
/// and for tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    positions: HashMap<MarkerHandle, GeoPoint>,
    visible: HashMap<MarkerHandle, GeoPoint>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, marker: MarkerHandle) -> bool {
        self.visible.contains_key(&marker)
    }

    pub fn position_of(&self, marker: MarkerHandle) -> Option<GeoPoint> {
        self.positions.get(&marker).copied()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Markers the surface still holds, shown or not.
    pub fn tracked_count(&self) -> usize {
        self.positions.len()
    }

    /// Visible markers ordered by handle.
    pub fn visible(&self) -> Vec<(MarkerHandle, GeoPoint)> {
        let mut visible: Vec<_> = self.visible.iter().map(|(handle, point)| (*handle, *point)).collect();
        visible.sort_by_key(|(handle, _)| *handle);
        visible
    }
}

impl DisplaySurface for HeadlessSurface {
    fn attach(&mut self, marker: MarkerHandle, position: GeoPoint) {
        self.positions.insert(marker, position);
        self.visible.insert(marker, position);
    }

    fn detach(&mut self, marker: MarkerHandle) {
        self.visible.remove(&marker);
    }

    fn set_position(&mut self, marker: MarkerHandle, position: GeoPoint) {
        self.positions.insert(marker, position);
        if let Some(shown) = self.visible.get_mut(&marker) {
            *shown = position;
        }
    }

    fn remove(&mut self, marker: MarkerHandle) {
        self.positions.remove(&marker);
        self.visible.remove(&marker);
    }
}

//! Marker set bookkeeping.
//!
//! A [`MarkerSetManager`] owns every marker a session has placed on its
//! display surface, in insertion order, and switches them on and off in bulk.
//! It is single-writer: hosts that share one across threads serialise access
//! themselves.

use std::fmt;

use thiserror::Error;

use crate::geo::GeoPoint;
use crate::traits::DisplaySurface;

/// Identity of a placed marker.
///
/// Handles are invalidated by [`MarkerSetManager::delete_all`]; any later use
/// fails with [`MarkerError::StaleHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle {
    index: usize,
    generation: u64,
}

impl MarkerHandle {
    /// Position of the marker in insertion order.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker #{} (gen {})", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Attached,
    Detached,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    handle: MarkerHandle,
    position: GeoPoint,
    state: MarkerState,
}

impl Marker {
    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn state(&self) -> MarkerState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.state == MarkerState::Attached
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("{0} is no longer tracked")]
    StaleHandle(MarkerHandle),
}

#[derive(Debug)]
pub struct MarkerSetManager<S: DisplaySurface> {
    surface: S,
    markers: Vec<Marker>,
    generation: u64,
}

impl<S: DisplaySurface> MarkerSetManager<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            markers: Vec::new(),
            generation: 0,
        }
    }

    /// Appends a marker at `position` and shows it immediately.
    pub fn add(&mut self, position: GeoPoint) -> MarkerHandle {
        let handle = MarkerHandle {
            index: self.markers.len(),
            generation: self.generation,
        };
        self.surface.attach(handle, position);
        self.markers.push(Marker {
            handle,
            position,
            state: MarkerState::Attached,
        });
        tracing::trace!(%handle, %position, "marker added");
        handle
    }

    /// Moves the marker at `index` and reattaches it, or appends a new one
    /// when `index` is past the end.
    pub fn replace_at(&mut self, index: usize, position: GeoPoint) -> MarkerHandle {
        if index >= self.markers.len() {
            return self.add(position);
        }

        let marker = &mut self.markers[index];
        marker.position = position;
        self.surface.set_position(marker.handle, position);
        if marker.state == MarkerState::Detached {
            marker.state = MarkerState::Attached;
            self.surface.attach(marker.handle, position);
        }
        tracing::trace!(handle = %marker.handle, %position, "marker replaced");
        marker.handle
    }

    /// Attaches every tracked marker.
    pub fn show_all(&mut self) {
        for marker in &mut self.markers {
            if marker.state == MarkerState::Detached {
                marker.state = MarkerState::Attached;
                self.surface.attach(marker.handle, marker.position);
            }
        }
    }

    /// Detaches every tracked marker but keeps it in the set.
    pub fn hide_all(&mut self) {
        for marker in &mut self.markers {
            if marker.state == MarkerState::Attached {
                marker.state = MarkerState::Detached;
                self.surface.detach(marker.handle);
            }
        }
    }

    /// Detaches and forgets every marker. All outstanding handles go stale.
    pub fn delete_all(&mut self) {
        self.hide_all();
        let removed = self.markers.len();
        for marker in self.markers.drain(..) {
            self.surface.remove(marker.handle);
        }
        self.generation += 1;
        tracing::debug!(removed, generation = self.generation, "markers deleted");
    }

    pub fn get(&self, handle: MarkerHandle) -> Result<&Marker, MarkerError> {
        self.markers
            .get(handle.index)
            .filter(|marker| marker.handle == handle)
            .ok_or(MarkerError::StaleHandle(handle))
    }

    fn get_mut(&mut self, handle: MarkerHandle) -> Result<&mut Marker, MarkerError> {
        self.markers
            .get_mut(handle.index)
            .filter(|marker| marker.handle == handle)
            .ok_or(MarkerError::StaleHandle(handle))
    }

    pub fn position(&self, handle: MarkerHandle) -> Result<GeoPoint, MarkerError> {
        self.get(handle).map(Marker::position)
    }

    pub fn state(&self, handle: MarkerHandle) -> Result<MarkerState, MarkerError> {
        self.get(handle).map(Marker::state)
    }

    /// Attaches a single marker.
    pub fn show(&mut self, handle: MarkerHandle) -> Result<(), MarkerError> {
        let marker = self.get_mut(handle)?;
        if marker.state == MarkerState::Detached {
            marker.state = MarkerState::Attached;
            let position = marker.position;
            self.surface.attach(handle, position);
        }
        Ok(())
    }

    /// Detaches a single marker.
    pub fn hide(&mut self, handle: MarkerHandle) -> Result<(), MarkerError> {
        let marker = self.get_mut(handle)?;
        if marker.state == MarkerState::Attached {
            marker.state = MarkerState::Detached;
            self.surface.detach(handle);
        }
        Ok(())
    }

    /// Moves a single marker without changing whether it is shown.
    pub fn set_position(&mut self, handle: MarkerHandle, position: GeoPoint) -> Result<(), MarkerError> {
        let marker = self.get_mut(handle)?;
        marker.position = position;
        self.surface.set_position(handle, position);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn attached_count(&self) -> usize {
        self.markers.iter().filter(|marker| marker.is_attached()).count()
    }

    /// Markers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

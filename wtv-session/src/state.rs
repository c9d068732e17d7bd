//! The mutable interaction stores.
//!
//! Each store has exactly one writer in the tick protocol: clicks and
//! resets write the selection, pan/zoom events write the viewport.

use serde::{Deserialize, Serialize};
use wtv_core::LatLon;

/// Station ids picked on the map, in click order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    ids: Vec<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `station_id` unless it is already selected.
    ///
    /// Returns whether the selection changed.
    pub fn on_marker_clicked(&mut self, station_id: &str) -> bool {
        if self.contains(station_id) {
            return false;
        }
        self.ids.push(station_id.to_string());
        true
    }

    /// Clear the selection, whatever it holds.
    pub fn on_reset_pressed(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.ids.iter().any(|id| id == station_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Map center and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: f64,
}

/// A pan/zoom report; absent fields mean "unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportUpdate {
    pub center: Option<LatLon>,
    pub zoom: Option<f64>,
}

/// Merge a viewport event into the previous viewport.
///
/// Fields missing from `update` come from `previous`, or from `default`
/// when there is no previous viewport yet.
pub fn on_viewport_event(
    update: &ViewportUpdate,
    previous: Option<&Viewport>,
    default: &Viewport,
) -> Viewport {
    let base = previous.unwrap_or(default);
    Viewport {
        center: update.center.unwrap_or(base.center),
        zoom: update.zoom.unwrap_or(base.zoom),
    }
}

/// Last viewport reported by the user, if any.
///
/// Only [`ViewportState::apply`] writes it; re-renders caused by other
/// stores read it back unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ViewportState {
    current: Option<Viewport>,
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, update: &ViewportUpdate, default: &Viewport) -> Viewport {
        let next = on_viewport_event(update, self.current.as_ref(), default);
        self.current = Some(next);
        next
    }

    pub fn current(&self) -> Option<&Viewport> {
        self.current.as_ref()
    }

    /// The viewport to draw with: the persisted one, else `default`.
    pub fn resolve(&self, default: &Viewport) -> Viewport {
        self.current.unwrap_or(*default)
    }
}

//! Pure derivations over the source tables.
//!
//! - [`frequency`]: per-station threshold-crossing frequencies joined to
//!   station positions, and the HIGH/LOW bucket split
//! - [`markers`]: the declarative map marker set for a selection
//! - [`series`]: per-station time series charts for a case window
//!
//! Nothing here holds state; every function returns a fresh value computed
//! only from its arguments.

pub mod frequency;
pub mod markers;
pub mod series;

pub use frequency::{aggregate, FrequencyBucket, FrequencyRecord};
pub use markers::{project_markers, Layer, Marker, MarkerSet};
pub use series::{project_panel, project_series, ChartBody, ChartPanel, SeriesChart};

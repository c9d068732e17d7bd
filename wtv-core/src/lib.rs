//! Core types for the wind timeseries viewer.
//!
//! Holds the immutable domain tables (stations, observations), the fixed
//! case window registry, the viewer configuration, and the object store
//! collaborator used to fetch the two source tables at startup.

pub mod case_window;
pub mod config;
pub mod error;
pub mod object_store;
pub mod observation;
pub mod station;
pub mod table;

pub use case_window::{CaseWindow, CaseWindowRegistry};
pub use config::ExplorerConfig;
pub use error::{ConfigError, FetchError};
pub use observation::ObservationRow;
pub use station::{LatLon, Station};
pub use table::TableStore;

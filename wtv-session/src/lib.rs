//! Interactive session engine for the wind timeseries viewer.
//!
//! This crate provides:
//! - `state`: the selection and viewport stores
//! - `event`: interaction events reported by a renderer
//! - `session`: the tick protocol that applies one event and re-derives views
//! - `renderer`: the view sink interface and a JSON-lines implementation

pub mod event;
pub mod renderer;
pub mod session;
pub mod state;

pub use event::{Interaction, ParseError};
pub use renderer::{JsonRenderer, ViewRenderer};
pub use session::{MapView, Session, Snapshot, TickOutcome};
pub use state::{SelectionState, Viewport, ViewportState, ViewportUpdate};

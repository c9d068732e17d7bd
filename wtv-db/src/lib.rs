//! In-memory SQLite ingest layer for the wind timeseries viewer.
//!
//! The two source tables arrive as CSV text. This crate parses them into
//! an in-memory SQLite database, dropping malformed rows one at a time,
//! and then materialises the immutable [`wtv_core::TableStore`] that the
//! derivations read for the rest of the session.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in a
//!   single-threaded session
//! - Header-addressed CSV columns, names taken from [`ColumnConfig`]
//! - Typed query methods returning serializable structs
//!
//! # Usage
//!
//! ```rust
//! use wtv_core::config::ColumnConfig;
//! use wtv_db::Database;
//!
//! let columns = ColumnConfig::default();
//! let db = Database::new().unwrap();
//! db.load_stations("HEAD:ID,LATD,LOND\n47401,45.41,141.68\n", &columns).unwrap();
//! db.load_observations(
//!     "ID,VALIDTIME,ft,ObsGustSpd1h,wt_operation,arc_gust_pred\n\
//!      47401,2025-02-13 00:00,1,26.1,24.0,27.3\n",
//!     &columns,
//! )
//! .unwrap();
//!
//! let tables = db.table_store().unwrap();
//! assert_eq!(tables.stations().len(), 1);
//! assert_eq!(tables.observations().len(), 1);
//! ```
//!
//! [`ColumnConfig`]: wtv_core::config::ColumnConfig

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;
use wtv_core::TableStore;

/// In-memory SQLite database holding the station and observation tables.
///
/// Cheaply cloneable (via `Rc`); every clone shares one connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Materialise both tables, in load order, as an immutable [`TableStore`].
    pub fn table_store(&self) -> anyhow::Result<TableStore> {
        let stations = self.query_stations()?;
        let observations = self.query_observations()?;
        log::info!(
            "[WTV] db: Table store ready with {} stations and {} observations",
            stations.len(),
            observations.len()
        );
        Ok(TableStore::new(stations, observations))
    }
}

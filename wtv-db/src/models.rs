//! Result structs returned by the loaders and summary queries.

use serde::Serialize;

/// Outcome of loading one CSV table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Rows inserted (or replacing an earlier row with the same key)
    pub loaded: u32,
    /// Malformed rows that were dropped
    pub skipped: u32,
}

/// Number of observation rows held for a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRowCount {
    pub station_id: String,
    pub rows: i64,
}

/// Earliest and latest observation timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub first: String,
    pub last: String,
}

//! SQL schema for the in-memory database.

/// Returns the full SQL schema as a single batch string.
///
/// - `stations` - one row per station id (last loaded row wins)
/// - `observations` - time-stamped signal values; `row_id` preserves load order
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS stations (
        station_id TEXT PRIMARY KEY,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL
    );

    CREATE TABLE IF NOT EXISTS observations (
        row_id INTEGER PRIMARY KEY,
        station_id TEXT NOT NULL,
        valid_time TEXT NOT NULL,
        forecast_hour INTEGER NOT NULL,
        observed_gust REAL NOT NULL,
        model_a_pred REAL NOT NULL,
        model_b_pred REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_obs_station ON observations(station_id);
    CREATE INDEX IF NOT EXISTS idx_obs_time ON observations(valid_time);
    "#
}

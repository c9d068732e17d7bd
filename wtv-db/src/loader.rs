//! CSV loading for the station and observation tables.
//!
//! Both tables carry a header row; columns are located by the names in
//! [`ColumnConfig`], so extra columns and any column order are accepted.
//! A missing required header fails the whole load. A row whose required
//! fields do not parse is dropped on its own and counted as skipped.
//!
//! # CSV Formats
//!
//! - **Stations**: `HEAD:ID,...,LATD,LOND,...`
//! - **Observations**: `ID,VALIDTIME,ft,ObsGustSpd1h,wt_operation,arc_gust_pred,...`

use crate::models::LoadSummary;
use crate::Database;
use anyhow::Context;
use csv::StringRecord;
use rusqlite::params;
use std::collections::HashSet;
use wtv_core::config::ColumnConfig;

impl Database {
    /// Load the station location table from a CSV string.
    ///
    /// Rows with an empty id or non-numeric coordinates are skipped. When
    /// the same id appears more than once, the last row wins.
    ///
    /// # Example CSV
    /// ```text
    /// HEAD:ID,LATD,LOND
    /// 47401,45.41,141.68
    /// ```
    pub fn load_stations(
        &self,
        csv_data: &str,
        columns: &ColumnConfig,
    ) -> anyhow::Result<LoadSummary> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = rdr.headers()?.clone();
        let id_idx = column_index(&headers, &columns.location_id)?;
        let lat_idx = column_index(&headers, &columns.latitude)?;
        let lon_idx = column_index(&headers, &columns.longitude)?;

        let tx = conn.unchecked_transaction()?;
        let mut summary = LoadSummary::default();
        let mut seen = HashSet::new();
        let mut duplicates = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO stations (station_id, latitude, longitude)
                 VALUES (?1, ?2, ?3)",
            )?;
            for result in rdr.records() {
                let r = result?;
                let station_id = field(&r, id_idx);
                let latitude = parse_finite(field(&r, lat_idx));
                let longitude = parse_finite(field(&r, lon_idx));

                let (Some(lat), Some(lon)) = (latitude, longitude) else {
                    log::debug!("[WTV] loader: Skipping station row {:?}", r);
                    summary.skipped += 1;
                    continue;
                };
                if station_id.is_empty() {
                    summary.skipped += 1;
                    continue;
                }
                if !seen.insert(station_id.to_string()) {
                    duplicates += 1;
                }

                stmt.execute(params![station_id, lat, lon])?;
                summary.loaded += 1;
            }
        }
        tx.commit()?;

        if duplicates > 0 {
            log::warn!(
                "[WTV] loader: {} duplicate station ids, last row kept for each",
                duplicates
            );
        }
        log::info!(
            "[WTV] loader: Loaded {} stations, skipped {} malformed",
            summary.loaded,
            summary.skipped
        );
        Ok(summary)
    }

    /// Load the observation table from a CSV string.
    ///
    /// A row is malformed, and skipped, when its station id or timestamp is
    /// empty, its forecast hour is not an integer, or any of the three
    /// signal values is not a finite number.
    ///
    /// # Example CSV
    /// ```text
    /// ID,VALIDTIME,ft,ObsGustSpd1h,wt_operation,arc_gust_pred
    /// 47401,2025-02-13 00:00,1,26.1,24.0,27.3
    /// 47401,2025-02-13 01:00,2,---,23.5,25.0
    /// ```
    pub fn load_observations(
        &self,
        csv_data: &str,
        columns: &ColumnConfig,
    ) -> anyhow::Result<LoadSummary> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = rdr.headers()?.clone();
        let id_idx = column_index(&headers, &columns.station_id)?;
        let time_idx = column_index(&headers, &columns.valid_time)?;
        let hour_idx = column_index(&headers, &columns.forecast_hour)?;
        let obs_idx = column_index(&headers, &columns.observed_gust)?;
        let a_idx = column_index(&headers, &columns.model_a_pred)?;
        let b_idx = column_index(&headers, &columns.model_b_pred)?;

        let tx = conn.unchecked_transaction()?;
        let mut summary = LoadSummary::default();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO observations
                 (station_id, valid_time, forecast_hour, observed_gust, model_a_pred, model_b_pred)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for result in rdr.records() {
                let r = result?;
                let station_id = field(&r, id_idx);
                let valid_time = field(&r, time_idx);
                if station_id.is_empty() || valid_time.is_empty() {
                    summary.skipped += 1;
                    continue;
                }

                let parsed = (
                    parse_hour(field(&r, hour_idx)),
                    parse_finite(field(&r, obs_idx)),
                    parse_finite(field(&r, a_idx)),
                    parse_finite(field(&r, b_idx)),
                );
                let (Some(hour), Some(observed), Some(model_a), Some(model_b)) = parsed else {
                    log::debug!("[WTV] loader: Skipping malformed observation {:?}", r);
                    summary.skipped += 1;
                    continue;
                };

                stmt.execute(params![station_id, valid_time, hour, observed, model_a, model_b])?;
                summary.loaded += 1;
            }
        }
        tx.commit()?;

        if summary.skipped > 0 {
            log::warn!(
                "[WTV] loader: Skipped {} malformed observation rows",
                summary.skipped
            );
        }
        log::info!("[WTV] loader: Loaded {} observations", summary.loaded);
        Ok(summary)
    }
}

fn column_index(headers: &StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .with_context(|| format!("missing required column '{}'", name))
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Forecast hours may be written as `3` or `3.0`.
fn parse_hour(s: &str) -> Option<i32> {
    if let Ok(h) = s.parse::<i32>() {
        return Some(h);
    }
    let v = parse_finite(s)?;
    if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

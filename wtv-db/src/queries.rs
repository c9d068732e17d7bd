//! Typed query methods over the loaded tables.

use crate::models::{StationRowCount, TimeRange};
use crate::Database;
use wtv_core::{ObservationRow, Station};

impl Database {
    /// All stations in load order.
    pub fn query_stations(&self) -> anyhow::Result<Vec<Station>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT station_id, latitude, longitude FROM stations
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Station::new(
                    row.get::<_, String>(0)?,
                    row.get(1)?,
                    row.get(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[WTV] query: query_stations returned {} records", rows.len());
        Ok(rows)
    }

    /// All observation rows in load order.
    pub fn query_observations(&self) -> anyhow::Result<Vec<ObservationRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT station_id, valid_time, forecast_hour, observed_gust, model_a_pred, model_b_pred
             FROM observations
             ORDER BY row_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ObservationRow {
                    station_id: row.get(0)?,
                    valid_time: row.get(1)?,
                    forecast_hour: row.get(2)?,
                    observed_gust: row.get(3)?,
                    model_a_pred: row.get(4)?,
                    model_b_pred: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[WTV] query: query_observations returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    pub fn query_observation_count(&self) -> anyhow::Result<i64> {
        let conn = self.conn.borrow();
        let count = conn.query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Earliest and latest observation timestamp, or `None` when empty.
    pub fn query_valid_time_range(&self) -> anyhow::Result<Option<TimeRange>> {
        let conn = self.conn.borrow();
        let (first, last): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(valid_time), MAX(valid_time) FROM observations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let range = first.zip(last).map(|(first, last)| TimeRange { first, last });
        Ok(range)
    }

    /// Observation row count per station, ordered by station id.
    pub fn query_rows_per_station(&self) -> anyhow::Result<Vec<StationRowCount>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT station_id, COUNT(*) FROM observations
             GROUP BY station_id
             ORDER BY station_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StationRowCount {
                    station_id: row.get(0)?,
                    rows: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use wtv_core::config::ColumnConfig;

    fn sample_db() -> Database {
        let db = Database::new().unwrap();
        let columns = ColumnConfig::default();
        db.load_stations(
            "\
HEAD:ID,LATD,LOND
47407,43.76,142.37
47401,45.41,141.68
",
            &columns,
        )
        .unwrap();
        db.load_observations(
            "\
ID,VALIDTIME,ft,ObsGustSpd1h,wt_operation,arc_gust_pred
47401,2025-02-13 02:00,1,26.1,24.0,27.3
47401,2025-02-13 01:00,2,22.0,23.5,25.0
47407,2025-02-14 00:00,1,10.0,11.0,9.5
",
            &columns,
        )
        .unwrap();
        db
    }

    #[test]
    fn query_stations_in_load_order() {
        let db = sample_db();
        let stations = db.query_stations().unwrap();
        let ids: Vec<&str> = stations.iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["47407", "47401"]);
    }

    #[test]
    fn query_observations_in_load_order() {
        let db = sample_db();
        let rows = db.query_observations().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].valid_time, "2025-02-13 02:00");
        assert_eq!(rows[1].valid_time, "2025-02-13 01:00");
        assert!((rows[0].model_b_pred - 27.3).abs() < 1e-9);
    }

    #[test]
    fn query_valid_time_range() {
        let db = sample_db();
        let range = db.query_valid_time_range().unwrap().unwrap();
        assert_eq!(range.first, "2025-02-13 01:00");
        assert_eq!(range.last, "2025-02-14 00:00");
    }

    #[test]
    fn query_valid_time_range_empty() {
        let db = Database::new().unwrap();
        assert!(db.query_valid_time_range().unwrap().is_none());
    }

    #[test]
    fn query_rows_per_station() {
        let db = sample_db();
        let counts = db.query_rows_per_station().unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].station_id, "47401");
        assert_eq!(counts[0].rows, 2);
        assert_eq!(counts[1].rows, 1);
        assert_eq!(db.query_observation_count().unwrap(), 3);
    }

    #[test]
    fn table_store_matches_queries() {
        let db = sample_db();
        let tables = db.table_store().unwrap();
        assert_eq!(tables.stations(), db.query_stations().unwrap().as_slice());
        assert_eq!(tables.observations(), db.query_observations().unwrap().as_slice());
    }
}

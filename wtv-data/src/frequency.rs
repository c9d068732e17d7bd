//! Threshold-crossing frequency per station.
//!
//! For each station with at least one observation row, the frequency of a
//! signal is `count(value >= threshold) / count(rows)`. Stations without
//! rows get no record at all. Records are joined to the location table;
//! a station with no location cannot be plotted and is dropped.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use wtv_core::observation::Signal;
use wtv_core::{LatLon, ObservationRow, Station};

/// Crossing frequencies for one plottable station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRecord {
    pub station_id: String,
    pub obs_freq: f64,
    pub model_a_freq: f64,
    pub model_b_freq: f64,
    #[serde(flatten)]
    pub position: LatLon,
}

impl FrequencyRecord {
    pub fn bucket(&self, bucket_threshold: f64) -> FrequencyBucket {
        FrequencyBucket::classify(self.obs_freq, bucket_threshold)
    }
}

/// Map styling class of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FrequencyBucket {
    Low,
    High,
}

impl FrequencyBucket {
    /// Draw order on the map.
    pub const ORDER: [FrequencyBucket; 2] = [FrequencyBucket::Low, FrequencyBucket::High];

    /// HIGH when `obs_freq >= threshold` (inclusive).
    pub fn classify(obs_freq: f64, threshold: f64) -> Self {
        if obs_freq >= threshold {
            FrequencyBucket::High
        } else {
            FrequencyBucket::Low
        }
    }

    pub fn legend_name(&self) -> &'static str {
        match self {
            FrequencyBucket::Low => "Low Frequency",
            FrequencyBucket::High => "High Frequency",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct CrossingCounts {
    rows: u32,
    observed: u32,
    model_a: u32,
    model_b: u32,
}

impl CrossingCounts {
    fn add(&mut self, row: &ObservationRow, threshold: f64) {
        self.rows += 1;
        for signal in Signal::ALL {
            if row.value(signal) >= threshold {
                match signal {
                    Signal::Observed => self.observed += 1,
                    Signal::ModelA => self.model_a += 1,
                    Signal::ModelB => self.model_b += 1,
                }
            }
        }
    }

    /// Only called for groups that saw at least one row.
    fn ratio(&self, crossings: u32) -> f64 {
        f64::from(crossings) / f64::from(self.rows)
    }
}

/// Aggregate crossing frequencies and join them to station positions.
///
/// Records come out ordered by station id. An empty observation table
/// yields an empty result.
pub fn aggregate(
    observations: &[ObservationRow],
    stations: &[Station],
    threshold: f64,
) -> Vec<FrequencyRecord> {
    let mut groups: BTreeMap<&str, CrossingCounts> = BTreeMap::new();
    for row in observations {
        groups
            .entry(row.station_id.as_str())
            .or_default()
            .add(row, threshold);
    }

    // Later rows overwrite earlier ones: last duplicate wins
    let mut positions: HashMap<&str, LatLon> = HashMap::with_capacity(stations.len());
    for s in stations {
        positions.insert(s.station_id.as_str(), s.position);
    }

    let mut orphans = 0usize;
    let mut records = Vec::with_capacity(groups.len());
    for (station_id, counts) in groups {
        let Some(position) = positions.get(station_id) else {
            log::warn!(
                "[WTV] frequency: Station {} has {} observations but no location, not mapped",
                station_id,
                counts.rows
            );
            orphans += 1;
            continue;
        };
        records.push(FrequencyRecord {
            station_id: station_id.to_string(),
            obs_freq: counts.ratio(counts.observed),
            model_a_freq: counts.ratio(counts.model_a),
            model_b_freq: counts.ratio(counts.model_b),
            position: *position,
        });
    }

    log::info!(
        "[WTV] frequency: Aggregated {} stations (threshold {}), {} without location",
        records.len(),
        threshold,
        orphans
    );
    records
}

/// Split records into (LOW, HIGH), each keeping the input order.
pub fn partition(
    records: &[FrequencyRecord],
    bucket_threshold: f64,
) -> (Vec<&FrequencyRecord>, Vec<&FrequencyRecord>) {
    records
        .iter()
        .partition(|r| r.bucket(bucket_threshold) == FrequencyBucket::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, time: &str, obs: f64, a: f64, b: f64) -> ObservationRow {
        ObservationRow {
            station_id: id.to_string(),
            valid_time: time.to_string(),
            forecast_hour: 1,
            observed_gust: obs,
            model_a_pred: a,
            model_b_pred: b,
        }
    }

    fn stations() -> Vec<Station> {
        vec![
            Station::new("X", 35.0, 139.0),
            Station::new("Y", 34.0, 135.0),
        ]
    }

    #[test]
    fn three_of_ten_rows_crossing_is_point_three() {
        let mut rows = Vec::new();
        for i in 0..10 {
            let obs = if i < 3 { 25.0 + i as f64 } else { 10.0 };
            rows.push(row("X", &format!("2025-02-13 {:02}:00", i), obs, 0.0, 30.0));
        }
        let records = aggregate(&rows, &stations(), 25.0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].obs_freq, 0.3);
        assert_eq!(records[0].model_a_freq, 0.0);
        assert_eq!(records[0].model_b_freq, 1.0);
        assert_eq!(records[0].position, LatLon::new(35.0, 139.0));
    }

    #[test]
    fn threshold_is_inclusive() {
        let rows = vec![row("X", "t1", 25.0, 24.999, 25.0)];
        let records = aggregate(&rows, &stations(), 25.0);
        assert_eq!(records[0].obs_freq, 1.0);
        assert_eq!(records[0].model_a_freq, 0.0);
    }

    #[test]
    fn empty_observations_give_empty_result() {
        assert!(aggregate(&[], &stations(), 25.0).is_empty());
    }

    #[test]
    fn stations_without_rows_get_no_record() {
        let rows = vec![row("X", "t1", 30.0, 0.0, 0.0)];
        let records = aggregate(&rows, &stations(), 25.0);
        assert!(records.iter().all(|r| r.station_id != "Y"));
    }

    #[test]
    fn orphan_station_is_dropped_without_failing_others() {
        let rows = vec![
            row("X", "t1", 30.0, 0.0, 0.0),
            row("ORPHAN", "t1", 30.0, 0.0, 0.0),
            row("Y", "t1", 1.0, 0.0, 0.0),
        ];
        let records = aggregate(&rows, &stations(), 25.0);
        let ids: Vec<&str> = records.iter().map(|r| r.station_id.as_str()).collect();
        assert_eq!(ids, vec!["X", "Y"]);
    }

    #[test]
    fn duplicate_location_last_wins() {
        let mut locs = stations();
        locs.push(Station::new("X", 10.0, 100.0));
        let rows = vec![row("X", "t1", 30.0, 0.0, 0.0)];
        let records = aggregate(&rows, &locs, 25.0);
        assert_eq!(records[0].position, LatLon::new(10.0, 100.0));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let rows: Vec<ObservationRow> = (0..50)
            .map(|i| {
                let id = if i % 3 == 0 { "X" } else { "Y" };
                row(id, "t", (i as f64) * 0.7, (i as f64) * 0.5, 26.0 - i as f64 * 0.1)
            })
            .collect();
        let first = aggregate(&rows, &stations(), 25.0);
        let second = aggregate(&rows, &stations(), 25.0);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.station_id, b.station_id);
            assert_eq!(a.obs_freq.to_bits(), b.obs_freq.to_bits());
            assert_eq!(a.model_a_freq.to_bits(), b.model_a_freq.to_bits());
            assert_eq!(a.model_b_freq.to_bits(), b.model_b_freq.to_bits());
        }
    }

    #[test]
    fn bucket_boundary_is_inclusive() {
        assert_eq!(FrequencyBucket::classify(0.004, 0.004), FrequencyBucket::High);
        assert_eq!(FrequencyBucket::classify(0.0039, 0.004), FrequencyBucket::Low);
        assert_eq!(FrequencyBucket::classify(0.0, 0.004), FrequencyBucket::Low);
    }

    #[test]
    fn partition_keeps_record_order() {
        let mk = |id: &str, f: f64| FrequencyRecord {
            station_id: id.to_string(),
            obs_freq: f,
            model_a_freq: 0.0,
            model_b_freq: 0.0,
            position: LatLon::default(),
        };
        let records = vec![mk("A", 0.01), mk("B", 0.0), mk("C", 0.004), mk("D", 0.001)];
        let (low, high) = partition(&records, 0.004);
        let low_ids: Vec<&str> = low.iter().map(|r| r.station_id.as_str()).collect();
        let high_ids: Vec<&str> = high.iter().map(|r| r.station_id.as_str()).collect();
        assert_eq!(low_ids, vec!["B", "D"]);
        assert_eq!(high_ids, vec!["A", "C"]);
    }
}

//! Viewer configuration.
//!
//! Every field has a default matching the stock viewer, so an empty JSON
//! object (or no file at all) is a valid configuration. Threshold constants
//! live here rather than in the derivation code so they can be overridden
//! without a rebuild.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration loaded once at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub thresholds: Thresholds,
    pub map: MapStyle,
    pub chart: ChartStyle,
    pub columns: ColumnConfig,
    pub source: SourceConfig,
}

/// Numeric thresholds used by the derivations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A signal value at or above this counts as a crossing (m/s)
    pub crossing: f64,
    /// Stations with `obs_freq` at or above this are HIGH
    pub bucket: f64,
    /// Inclusive forecast hour range kept by the series filter
    pub forecast_hour_min: i32,
    pub forecast_hour_max: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            crossing: 25.0,
            bucket: 0.004,
            forecast_hour_min: 0,
            forecast_hour_max: 23,
        }
    }
}

/// Map marker styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub high_color: String,
    pub low_color: String,
    pub selected_opacity: f64,
    pub dimmed_opacity: f64,
    pub marker_size: u32,
    pub default_zoom: f64,
    pub basemap: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            high_color: "red".to_string(),
            low_color: "blue".to_string(),
            selected_opacity: 1.0,
            dimmed_opacity: 0.4,
            marker_size: 8,
            default_zoom: 7.0,
            basemap: "carto-positron".to_string(),
        }
    }
}

/// Line styling for one chart trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStyle {
    pub label: String,
    pub color: String,
    pub dash: LineDash,
}

impl TraceStyle {
    fn new(label: &str, color: &str, dash: LineDash) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            dash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Solid,
    Dash,
    Dot,
}

/// Time series chart styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Horizontal reference lines drawn across each chart (m/s)
    pub reference_levels: Vec<f64>,
    pub reference_color: String,
    pub observed: TraceStyle,
    pub model_a: TraceStyle,
    pub model_b: TraceStyle,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub height: u32,
    pub width: u32,
    /// Shown instead of charts while nothing is selected
    pub empty_selection_message: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            reference_levels: vec![20.0, 25.0],
            reference_color: "green".to_string(),
            observed: TraceStyle::new("Obs", "black", LineDash::Solid),
            model_a: TraceStyle::new("WT", "red", LineDash::Dash),
            model_b: TraceStyle::new("ARC", "blue", LineDash::Dot),
            x_axis_title: "Time".to_string(),
            y_axis_title: "Wind Speed (m/s)".to_string(),
            height: 400,
            width: 900,
            empty_selection_message: "Select a station on the map".to_string(),
        }
    }
}

/// CSV header names of the two source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub location_id: String,
    pub latitude: String,
    pub longitude: String,
    pub station_id: String,
    pub valid_time: String,
    pub forecast_hour: String,
    pub observed_gust: String,
    pub model_a_pred: String,
    pub model_b_pred: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            location_id: "HEAD:ID".to_string(),
            latitude: "LATD".to_string(),
            longitude: "LOND".to_string(),
            station_id: "ID".to_string(),
            valid_time: "VALIDTIME".to_string(),
            forecast_hour: "ft".to_string(),
            observed_gust: "ObsGustSpd1h".to_string(),
            model_a_pred: "wt_operation".to_string(),
            model_b_pred: "arc_gust_pred".to_string(),
        }
    }
}

/// Where the two source tables live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub bucket: String,
    pub locations_key: String,
    pub observations_key: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            bucket: "windtopo-visualization".to_string(),
            locations_key: "ARC.JP_pacific.tbl".to_string(),
            observations_key: "2024_2025_MSM_WT_ARC_small.csv".to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: ExplorerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => {
                let json = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.display().to_string(),
                    source,
                })?;
                log::info!("[WTV] config: Loading {}", p.display());
                Self::from_json(&json)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let t = &self.thresholds;
        if !t.crossing.is_finite() {
            return Err(invalid("thresholds.crossing", "must be finite"));
        }
        if !(0.0..=1.0).contains(&t.bucket) {
            return Err(invalid("thresholds.bucket", "must lie in [0, 1]"));
        }
        if t.forecast_hour_min > t.forecast_hour_max {
            return Err(invalid(
                "thresholds.forecast_hour_min",
                "must not exceed forecast_hour_max",
            ));
        }
        for (field, value) in [
            ("map.selected_opacity", self.map.selected_opacity),
            ("map.dimmed_opacity", self.map.dimmed_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must lie in [0, 1]"));
            }
        }
        if !self.map.default_zoom.is_finite() {
            return Err(invalid("map.default_zoom", "must be finite"));
        }
        if self.chart.reference_levels.iter().any(|l| !l.is_finite()) {
            return Err(invalid("chart.reference_levels", "must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

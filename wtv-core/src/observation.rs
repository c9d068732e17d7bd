use serde::{Deserialize, Serialize};

/// One row of the observation table.
///
/// `valid_time` is kept as the source string; the source format is ISO-like
/// (`YYYY-MM-DD HH:MM`) so lexical order is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub station_id: String,
    pub valid_time: String,
    /// Forecast lead time in hours
    pub forecast_hour: i32,
    /// Observed 1-hour gust speed (m/s)
    pub observed_gust: f64,
    /// Model A prediction (m/s)
    pub model_a_pred: f64,
    /// Model B prediction (m/s)
    pub model_b_pred: f64,
}

/// Which of the three signal columns to read from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Observed,
    ModelA,
    ModelB,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Observed, Signal::ModelA, Signal::ModelB];
}

impl ObservationRow {
    pub fn value(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Observed => self.observed_gust,
            Signal::ModelA => self.model_a_pred,
            Signal::ModelB => self.model_b_pred,
        }
    }

    /// Whether the row's forecast hour lies in `[min, max]`.
    pub fn in_forecast_hours(&self, min: i32, max: i32) -> bool {
        (min..=max).contains(&self.forecast_hour)
    }
}

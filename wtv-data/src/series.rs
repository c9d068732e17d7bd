//! Per-station time series projection for the active case window.
//!
//! For each selected station, rows are kept when they belong to the
//! station, fall inside the case window and have a forecast hour in the
//! configured range. The kept rows are stably sorted by timestamp. A
//! station with no kept rows gets a placeholder chart; that is a normal
//! outcome, not an error.

use serde::Serialize;
use wtv_core::config::{ChartStyle, LineDash, Thresholds, TraceStyle};
use wtv_core::{CaseWindow, ObservationRow};

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub label: String,
    pub color: String,
    pub dash: LineDash,
    pub values: Vec<f64>,
}

impl Trace {
    fn new(style: &TraceStyle, values: Vec<f64>) -> Self {
        Self {
            label: style.label.clone(),
            color: style.color.clone(),
            dash: style.dash,
            values,
        }
    }
}

/// A horizontal line at `level` spanning `from..=to` on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub level: f64,
    pub from: String,
    pub to: String,
    pub color: String,
}

/// Three aligned series over one timestamp axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub timestamps: Vec<String>,
    pub observed: Trace,
    pub model_a: Trace,
    pub model_b: Trace,
    pub reference_lines: Vec<ReferenceLine>,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    /// No rows for the station in the window; only the title is shown
    Placeholder,
    Series(SeriesData),
}

/// Chart description for one selected station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesChart {
    pub station_id: String,
    pub title: String,
    pub height: u32,
    pub width: u32,
    pub body: ChartBody,
}

impl SeriesChart {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, ChartBody::Placeholder)
    }

    pub fn series(&self) -> Option<&SeriesData> {
        match &self.body {
            ChartBody::Series(data) => Some(data),
            ChartBody::Placeholder => None,
        }
    }
}

/// Everything the chart area shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartPanel {
    /// Nothing selected yet
    Prompt { message: String },
    Charts { charts: Vec<SeriesChart> },
}

impl ChartPanel {
    pub fn charts(&self) -> &[SeriesChart] {
        match self {
            ChartPanel::Charts { charts } => charts,
            ChartPanel::Prompt { .. } => &[],
        }
    }
}

/// One chart per selected station, in selection order.
pub fn project_series(
    selection: &[String],
    case: &CaseWindow,
    observations: &[ObservationRow],
    thresholds: &Thresholds,
    style: &ChartStyle,
) -> Vec<SeriesChart> {
    selection
        .iter()
        .map(|station_id| {
            let mut rows: Vec<&ObservationRow> = observations
                .iter()
                .filter(|r| {
                    r.station_id == *station_id
                        && case.contains(&r.valid_time)
                        && r.in_forecast_hours(
                            thresholds.forecast_hour_min,
                            thresholds.forecast_hour_max,
                        )
                })
                .collect();
            rows.sort_by(|a, b| a.valid_time.cmp(&b.valid_time));
            build_chart(station_id, case, &rows, style)
        })
        .collect()
}

/// The chart panel for the current selection, or a prompt when empty.
pub fn project_panel(
    selection: &[String],
    case: &CaseWindow,
    observations: &[ObservationRow],
    thresholds: &Thresholds,
    style: &ChartStyle,
) -> ChartPanel {
    if selection.is_empty() {
        return ChartPanel::Prompt {
            message: style.empty_selection_message.clone(),
        };
    }
    ChartPanel::Charts {
        charts: project_series(selection, case, observations, thresholds, style),
    }
}

fn build_chart(
    station_id: &str,
    case: &CaseWindow,
    rows: &[&ObservationRow],
    style: &ChartStyle,
) -> SeriesChart {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        log::debug!(
            "[WTV] series: No rows for {} during {}",
            station_id,
            case.label
        );
        return SeriesChart {
            station_id: station_id.to_string(),
            title: format!("No data for {} during {}", station_id, case.label),
            height: style.height,
            width: style.width,
            body: ChartBody::Placeholder,
        };
    };

    // Sorted ascending, so the ends are the min and max timestamps
    let from = first.valid_time.clone();
    let to = last.valid_time.clone();
    let reference_lines = style
        .reference_levels
        .iter()
        .map(|&level| ReferenceLine {
            level,
            from: from.clone(),
            to: to.clone(),
            color: style.reference_color.clone(),
        })
        .collect();

    let data = SeriesData {
        timestamps: rows.iter().map(|r| r.valid_time.clone()).collect(),
        observed: Trace::new(&style.observed, rows.iter().map(|r| r.observed_gust).collect()),
        model_a: Trace::new(&style.model_a, rows.iter().map(|r| r.model_a_pred).collect()),
        model_b: Trace::new(&style.model_b, rows.iter().map(|r| r.model_b_pred).collect()),
        reference_lines,
        x_axis_title: style.x_axis_title.clone(),
        y_axis_title: style.y_axis_title.clone(),
    };

    SeriesChart {
        station_id: station_id.to_string(),
        title: station_id.to_string(),
        height: style.height,
        width: style.width,
        body: ChartBody::Series(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(id: &str, time: &str, ft: i32, obs: f64) -> ObservationRow {
        ObservationRow {
            station_id: id.to_string(),
            valid_time: time.to_string(),
            forecast_hour: ft,
            observed_gust: obs,
            model_a_pred: obs + 1.0,
            model_b_pred: obs - 1.0,
        }
    }

    fn case2() -> CaseWindow {
        CaseWindow::new(
            "Case 2: 2025/02/13 - 2025/02/15",
            NaiveDate::from_ymd_opt(2025, 2, 13).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(),
        )
    }

    fn sample_rows() -> Vec<ObservationRow> {
        vec![
            row("X", "2025-02-14 06:00", 3, 18.0),
            row("X", "2025-02-12 23:00", 3, 30.0),
            row("X", "2025-02-13 03:00", 30, 28.0),
            row("Y", "2025-02-13 04:00", 1, 11.0),
            row("X", "2025-02-13 01:00", 1, 22.0),
            row("X", "2025-02-16 00:00", 2, 26.0),
            row("X", "2025-02-14 06:00", 4, 19.0),
        ]
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filters_window_station_and_hours_then_sorts() {
        let charts = project_series(
            &ids(&["X"]),
            &case2(),
            &sample_rows(),
            &Thresholds::default(),
            &ChartStyle::default(),
        );
        assert_eq!(charts.len(), 1);
        let data = charts[0].series().unwrap();
        assert_eq!(
            data.timestamps,
            vec!["2025-02-13 01:00", "2025-02-14 06:00", "2025-02-14 06:00"]
        );
        assert_eq!(data.observed.values, vec![22.0, 18.0, 19.0], "ties keep row order");
        assert_eq!(data.model_a.values, vec![23.0, 19.0, 20.0]);
        assert_eq!(data.model_b.values, vec![21.0, 17.0, 18.0]);
        assert_eq!(charts[0].title, "X");
    }

    #[test]
    fn reference_lines_span_observed_range() {
        let charts = project_series(
            &ids(&["X"]),
            &case2(),
            &sample_rows(),
            &Thresholds::default(),
            &ChartStyle::default(),
        );
        let lines = &charts[0].series().unwrap().reference_lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].level, 20.0);
        assert_eq!(lines[1].level, 25.0);
        for line in lines {
            assert_eq!(line.from, "2025-02-13 01:00");
            assert_eq!(line.to, "2025-02-14 06:00");
        }
    }

    #[test]
    fn empty_window_yields_placeholder_per_station() {
        let charts = project_series(
            &ids(&["X", "NOPE", "Y"]),
            &case2(),
            &sample_rows(),
            &Thresholds::default(),
            &ChartStyle::default(),
        );
        assert_eq!(charts.len(), 3);
        assert!(!charts[0].is_placeholder());
        assert!(charts[1].is_placeholder());
        assert!(charts[1].series().is_none());
        assert_eq!(
            charts[1].title,
            "No data for NOPE during Case 2: 2025/02/13 - 2025/02/15"
        );
        assert!(!charts[2].is_placeholder());
    }

    #[test]
    fn charts_follow_selection_order() {
        let charts = project_series(
            &ids(&["Y", "X"]),
            &case2(),
            &sample_rows(),
            &Thresholds::default(),
            &ChartStyle::default(),
        );
        let order: Vec<&str> = charts.iter().map(|c| c.station_id.as_str()).collect();
        assert_eq!(order, vec!["Y", "X"]);
    }

    #[test]
    fn forecast_hour_range_is_configurable() {
        let thresholds = Thresholds {
            forecast_hour_max: 2,
            ..Thresholds::default()
        };
        let charts = project_series(
            &ids(&["X"]),
            &case2(),
            &sample_rows(),
            &thresholds,
            &ChartStyle::default(),
        );
        assert_eq!(charts[0].series().unwrap().timestamps, vec!["2025-02-13 01:00"]);
    }

    #[test]
    fn projection_is_idempotent_and_pure() {
        let rows = sample_rows();
        let before = rows.clone();
        let selection = ids(&["X", "Y"]);
        let (thresholds, style) = (Thresholds::default(), ChartStyle::default());
        let a = project_series(&selection, &case2(), &rows, &thresholds, &style);
        let b = project_series(&selection, &case2(), &rows, &thresholds, &style);
        assert_eq!(a, b);
        assert_eq!(rows, before);
    }

    #[test]
    fn empty_selection_yields_prompt() {
        let panel = project_panel(
            &[],
            &case2(),
            &sample_rows(),
            &Thresholds::default(),
            &ChartStyle::default(),
        );
        assert_eq!(
            panel,
            ChartPanel::Prompt {
                message: "Select a station on the map".to_string()
            }
        );
        assert!(panel.charts().is_empty());
    }

    #[test]
    fn placeholder_serializes_without_series() {
        let charts = project_series(
            &ids(&["NOPE"]),
            &case2(),
            &sample_rows(),
            &Thresholds::default(),
            &ChartStyle::default(),
        );
        let json = serde_json::to_value(&charts[0]).unwrap();
        assert_eq!(json["body"]["kind"], "placeholder");
        assert!(json["body"].get("timestamps").is_none());
    }
}

//! Fixed, named date windows used to focus the time series charts.
//!
//! The registry is configuration: it is loaded once from CSV
//! (`label,start,end`) and never changes during a session.

use crate::error::{ConfigError, ConfigResult};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::HashSet;

/// Embedded default registry.
pub static CASE_WINDOWS_CSV: &str = include_str!("../../fixtures/case_windows.csv");

/// Date format used in the registry CSV and for timestamp comparison.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A named, inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseWindow {
    pub label: String,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(skip)]
    start_key: String,
    #[serde(skip)]
    end_key: String,
}

impl CaseWindow {
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label: label.into(),
            start,
            end,
            start_key: start.format(DATE_FORMAT).to_string(),
            end_key: end.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Lower bound as it is compared against observation timestamps.
    pub fn start_key(&self) -> &str {
        &self.start_key
    }

    /// Upper bound as it is compared against observation timestamps.
    pub fn end_key(&self) -> &str {
        &self.end_key
    }

    /// Lexical `start <= timestamp <= end` test.
    ///
    /// A timestamp carrying a time of day sorts after its bare date, so on
    /// the end day only a bare `YYYY-MM-DD` timestamp is inside the window.
    pub fn contains(&self, timestamp: &str) -> bool {
        self.start_key.as_str() <= timestamp && timestamp <= self.end_key.as_str()
    }
}

/// The ordered set of case windows offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseWindowRegistry {
    windows: Vec<CaseWindow>,
}

impl CaseWindowRegistry {
    /// Build a registry, validating label uniqueness and date order.
    pub fn new(windows: Vec<CaseWindow>) -> ConfigResult<Self> {
        if windows.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        let mut seen = HashSet::new();
        for w in &windows {
            if w.end < w.start {
                return Err(ConfigError::InvertedWindow {
                    label: w.label.clone(),
                });
            }
            if !seen.insert(w.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(w.label.clone()));
            }
        }
        Ok(Self { windows })
    }

    /// Parse a registry from CSV with headers `label,start,end`.
    ///
    /// # Example CSV
    /// ```text
    /// label,start,end
    /// Case 2: 2025/02/13 - 2025/02/15,2025-02-13,2025-02-15
    /// ```
    pub fn parse_csv(csv_data: &str) -> ConfigResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut windows = Vec::new();
        for result in rdr.records() {
            let r = result?;
            let label = r.get(0).unwrap_or("").to_string();
            let start = parse_bound(&label, r.get(1).unwrap_or(""))?;
            let end = parse_bound(&label, r.get(2).unwrap_or(""))?;
            windows.push(CaseWindow::new(label, start, end));
        }
        log::info!("[WTV] config: Loaded {} case windows", windows.len());
        Self::new(windows)
    }

    /// The registry shipped with the viewer.
    pub fn embedded() -> ConfigResult<Self> {
        Self::parse_csv(CASE_WINDOWS_CSV)
    }

    /// Default selection: the first window.
    pub fn first(&self) -> &CaseWindow {
        // Construction guarantees at least one window
        &self.windows[0]
    }

    pub fn get(&self, label: &str) -> Option<&CaseWindow> {
        self.windows.iter().find(|w| w.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaseWindow> {
        self.windows.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.windows.iter().map(|w| w.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

fn parse_bound(label: &str, value: &str) -> ConfigResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ConfigError::DateParse {
        label: label.to_string(),
        value: value.to_string(),
    })
}

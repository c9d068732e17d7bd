//! The tick protocol.
//!
//! One interaction produces one tick: the event mutates exactly one store,
//! a [`Snapshot`] of every store is taken once, and each view the event
//! invalidates is derived from that snapshot. Ticks never overlap and
//! never coalesce, so a click followed by a reset is two ticks.

use crate::event::Interaction;
use crate::renderer::ViewRenderer;
use crate::state::{SelectionState, Viewport, ViewportState};
use serde::Serialize;
use std::io;
use wtv_core::{CaseWindow, CaseWindowRegistry, ExplorerConfig, TableStore};
use wtv_data::{aggregate, project_markers, project_panel, ChartPanel, FrequencyRecord, MarkerSet};

/// Post-update values of every store, captured once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub selection: Vec<String>,
    pub viewport: Viewport,
    pub case: CaseWindow,
}

/// The map as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub markers: MarkerSet,
    pub viewport: Viewport,
}

/// Views re-derived by one tick; `None` means unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TickOutcome {
    pub map: Option<MapView>,
    pub charts: Option<ChartPanel>,
}

impl TickOutcome {
    pub fn is_empty(&self) -> bool {
        self.map.is_none() && self.charts.is_none()
    }

    /// Push the re-derived views to a renderer.
    pub fn deliver<R: ViewRenderer>(&self, renderer: &mut R) -> io::Result<()> {
        if let Some(map) = &self.map {
            renderer.render_map(&map.markers, &map.viewport)?;
        }
        if let Some(panel) = &self.charts {
            renderer.render_charts(panel)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Invalidation {
    map: bool,
    charts: bool,
}

/// One interactive session over immutable tables.
#[derive(Debug)]
pub struct Session {
    tables: TableStore,
    records: Vec<FrequencyRecord>,
    registry: CaseWindowRegistry,
    config: ExplorerConfig,
    default_viewport: Viewport,
    selection: SelectionState,
    viewport: ViewportState,
    active_case: CaseWindow,
    ticks: u64,
}

impl Session {
    /// Start a session. Frequencies are aggregated here, once.
    pub fn new(tables: TableStore, registry: CaseWindowRegistry, config: ExplorerConfig) -> Self {
        let records = aggregate(
            tables.observations(),
            tables.stations(),
            config.thresholds.crossing,
        );
        let default_viewport = Viewport {
            center: tables.centroid().unwrap_or_default(),
            zoom: config.map.default_zoom,
        };
        let active_case = registry.first().clone();
        log::info!(
            "[WTV] session: Started with {} mapped stations, case '{}'",
            records.len(),
            active_case.label
        );
        Self {
            tables,
            records,
            registry,
            config,
            default_viewport,
            selection: SelectionState::new(),
            viewport: ViewportState::new(),
            active_case,
            ticks: 0,
        }
    }

    pub fn records(&self) -> &[FrequencyRecord] {
        &self.records
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn default_viewport(&self) -> &Viewport {
        &self.default_viewport
    }

    pub fn active_case(&self) -> &CaseWindow {
        &self.active_case
    }

    pub fn registry(&self) -> &CaseWindowRegistry {
        &self.registry
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            selection: self.selection.ids().to_vec(),
            viewport: self.viewport.resolve(&self.default_viewport),
            case: self.active_case.clone(),
        }
    }

    /// Derive every view from the current state.
    pub fn render_all(&self) -> TickOutcome {
        self.derive(
            &self.snapshot(),
            Invalidation {
                map: true,
                charts: true,
            },
        )
    }

    /// Apply one interaction and derive the views it invalidates.
    pub fn apply(&mut self, interaction: Interaction) -> TickOutcome {
        self.ticks += 1;
        log::debug!("[WTV] session: tick {} {:?}", self.ticks, interaction);

        let invalidation = match interaction {
            Interaction::MarkerClicked { station_id } => {
                if !self.records.iter().any(|r| r.station_id == station_id) {
                    log::warn!(
                        "[WTV] session: Clicked station {} is not on the map",
                        station_id
                    );
                }
                self.selection.on_marker_clicked(&station_id);
                Invalidation {
                    map: true,
                    charts: true,
                }
            }
            Interaction::ResetClicked => {
                self.selection.on_reset_pressed();
                Invalidation {
                    map: true,
                    charts: true,
                }
            }
            Interaction::CaseWindowChanged { label } => match self.registry.get(&label) {
                Some(case) => {
                    self.active_case = case.clone();
                    Invalidation {
                        map: false,
                        charts: true,
                    }
                }
                None => {
                    log::warn!("[WTV] session: Unknown case window '{}', ignored", label);
                    Invalidation::default()
                }
            },
            // The map already shows the new viewport; only persist it
            Interaction::ViewportChanged(update) => {
                self.viewport.apply(&update, &self.default_viewport);
                Invalidation::default()
            }
        };

        let snapshot = self.snapshot();
        self.derive(&snapshot, invalidation)
    }

    /// Apply one interaction and hand the result to `renderer`.
    pub fn dispatch<R: ViewRenderer>(
        &mut self,
        interaction: Interaction,
        renderer: &mut R,
    ) -> io::Result<TickOutcome> {
        let outcome = self.apply(interaction);
        outcome.deliver(renderer)?;
        Ok(outcome)
    }

    fn derive(&self, snapshot: &Snapshot, invalidation: Invalidation) -> TickOutcome {
        let map = invalidation.map.then(|| MapView {
            markers: project_markers(
                &self.records,
                &snapshot.selection,
                self.config.thresholds.bucket,
                &self.config.map,
            ),
            viewport: snapshot.viewport,
        });
        let charts = invalidation.charts.then(|| {
            project_panel(
                &snapshot.selection,
                &snapshot.case,
                self.tables.observations(),
                &self.config.thresholds,
                &self.config.chart,
            )
        });
        TickOutcome { map, charts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::JsonRenderer;
    use crate::state::ViewportUpdate;
    use wtv_core::{LatLon, ObservationRow, Station};

    fn row(id: &str, time: &str, obs: f64) -> ObservationRow {
        ObservationRow {
            station_id: id.to_string(),
            valid_time: time.to_string(),
            forecast_hour: 1,
            observed_gust: obs,
            model_a_pred: obs,
            model_b_pred: obs,
        }
    }

    fn session() -> Session {
        let stations = vec![
            Station::new("A", 30.0, 130.0),
            Station::new("B", 32.0, 134.0),
        ];
        let observations = vec![
            row("A", "2025-01-30 00:00", 26.0),
            row("A", "2025-01-29 12:00", 10.0),
            row("B", "2025-02-14 00:00", 5.0),
            row("B", "2025-01-30 06:00", 7.0),
        ];
        let tables = TableStore::new(stations, observations);
        let registry = CaseWindowRegistry::embedded().unwrap();
        Session::new(tables, registry, ExplorerConfig::default())
    }

    fn click(id: &str) -> Interaction {
        Interaction::MarkerClicked {
            station_id: id.to_string(),
        }
    }

    #[test]
    fn initial_view_has_markers_and_prompt() {
        let s = session();
        let outcome = s.render_all();
        let map = outcome.map.unwrap();
        assert_eq!(map.markers.len(), 2);
        assert_eq!(map.viewport.center, LatLon::new(31.0, 132.0));
        assert_eq!(map.viewport.zoom, 7.0);
        assert!(matches!(outcome.charts, Some(ChartPanel::Prompt { .. })));
    }

    #[test]
    fn click_rerenders_map_and_charts_from_post_update_state() {
        let mut s = session();
        let outcome = s.apply(click("A"));
        let map = outcome.map.unwrap();
        assert!(map.markers.find("A").unwrap().selected);
        let panel = outcome.charts.unwrap();
        assert_eq!(panel.charts().len(), 1);
        assert_eq!(panel.charts()[0].station_id, "A");
        let data = panel.charts()[0].series().unwrap();
        assert_eq!(data.timestamps, vec!["2025-01-29 12:00", "2025-01-30 00:00"]);
    }

    #[test]
    fn selection_change_keeps_persisted_viewport() {
        let mut s = session();
        s.apply(Interaction::ViewportChanged(ViewportUpdate {
            center: Some(LatLon::new(33.3, 133.3)),
            zoom: Some(9.25),
        }));
        let before = *s.viewport().current().unwrap();

        let outcome = s.apply(click("B"));
        assert_eq!(*s.viewport().current().unwrap(), before);
        assert_eq!(outcome.map.unwrap().viewport, before);

        s.apply(Interaction::CaseWindowChanged {
            label: "Case 2: 2025/02/13 - 2025/02/15".to_string(),
        });
        s.apply(Interaction::ResetClicked);
        let after = *s.viewport().current().unwrap();
        assert_eq!(after.center.lat.to_bits(), before.center.lat.to_bits());
        assert_eq!(after.center.lon.to_bits(), before.center.lon.to_bits());
        assert_eq!(after.zoom.to_bits(), before.zoom.to_bits());
    }

    #[test]
    fn viewport_event_rerenders_nothing() {
        let mut s = session();
        let outcome = s.apply(Interaction::ViewportChanged(ViewportUpdate {
            center: None,
            zoom: Some(5.0),
        }));
        assert!(outcome.is_empty());
        assert_eq!(s.viewport().current().unwrap().center, LatLon::new(31.0, 132.0));
    }

    #[test]
    fn click_then_reset_are_two_ticks() {
        let mut s = session();
        s.apply(click("A"));
        assert_eq!(s.selection().len(), 1);
        let outcome = s.apply(Interaction::ResetClicked);
        assert!(s.selection().is_empty());
        assert!(matches!(outcome.charts, Some(ChartPanel::Prompt { .. })));
        assert!(outcome.map.unwrap().markers.markers.iter().all(|m| !m.selected));
        assert_eq!(s.ticks(), 2);
    }

    #[test]
    fn case_change_rerenders_charts_only() {
        let mut s = session();
        s.apply(click("B"));
        let outcome = s.apply(Interaction::CaseWindowChanged {
            label: "Case 2: 2025/02/13 - 2025/02/15".to_string(),
        });
        assert!(outcome.map.is_none());
        let panel = outcome.charts.unwrap();
        let data = panel.charts()[0].series().unwrap();
        assert_eq!(data.timestamps, vec!["2025-02-14 00:00"]);
        assert_eq!(s.active_case().label, "Case 2: 2025/02/13 - 2025/02/15");
    }

    #[test]
    fn unknown_case_is_ignored() {
        let mut s = session();
        let outcome = s.apply(Interaction::CaseWindowChanged {
            label: "Case 42".to_string(),
        });
        assert!(outcome.is_empty());
        assert_eq!(s.active_case().label, "Case 1: 2025/01/29 - 2025/02/02");
    }

    #[test]
    fn station_without_window_rows_gets_placeholder() {
        let mut s = session();
        s.apply(Interaction::CaseWindowChanged {
            label: "Case 5: 2025/03/25 - 2025/03/28".to_string(),
        });
        let outcome = s.apply(click("A"));
        let panel = outcome.charts.unwrap();
        assert!(panel.charts()[0].is_placeholder());
    }

    #[test]
    fn dispatch_writes_to_renderer() {
        let mut s = session();
        let mut renderer = JsonRenderer::new(Vec::new());
        s.dispatch(click("A"), &mut renderer).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn empty_tables_still_run() {
        let tables = TableStore::default();
        let registry = CaseWindowRegistry::embedded().unwrap();
        let mut s = Session::new(tables, registry, ExplorerConfig::default());
        assert!(s.records().is_empty());
        let outcome = s.apply(click("A"));
        assert!(outcome.map.unwrap().markers.is_empty());
        assert!(outcome.charts.unwrap().charts()[0].is_placeholder());
        assert_eq!(s.default_viewport().center, LatLon::default());
    }
}

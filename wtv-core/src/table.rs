//! The two immutable source tables, shared read-only by every derivation.

use crate::observation::ObservationRow;
use crate::station::{LatLon, Station};
use std::rc::Rc;

/// Station locations and observation rows, loaded once before the
/// interactive loop starts.
///
/// Cloning is cheap (via `Rc`) and every clone sees the same rows.
#[derive(Debug, Clone)]
pub struct TableStore {
    stations: Rc<[Station]>,
    observations: Rc<[ObservationRow]>,
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl TableStore {
    pub fn new(stations: Vec<Station>, observations: Vec<ObservationRow>) -> Self {
        Self {
            stations: stations.into(),
            observations: observations.into(),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn observations(&self) -> &[ObservationRow] {
        &self.observations
    }

    /// Mean position of all stations in the location table.
    pub fn centroid(&self) -> Option<LatLon> {
        LatLon::centroid(self.stations.iter().map(|s| &s.position))
    }
}

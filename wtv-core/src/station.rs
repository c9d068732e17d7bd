use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Mean latitude and longitude of a set of positions.
    ///
    /// Returns `None` for an empty input.
    pub fn centroid<'a, I>(positions: I) -> Option<LatLon>
    where
        I: IntoIterator<Item = &'a LatLon>,
    {
        let mut count = 0usize;
        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        for p in positions {
            count += 1;
            lat_sum += p.lat;
            lon_sum += p.lon;
        }
        if count == 0 {
            return None;
        }
        Some(LatLon {
            lat: lat_sum / count as f64,
            lon: lon_sum / count as f64,
        })
    }
}

/// An observation station from the location table.
///
/// Identity is `station_id`; the location table is expected to hold each
/// id once, and on duplicates the last row loaded wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub position: LatLon,
}

impl Station {
    pub fn new(station_id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            station_id: station_id.into(),
            position: LatLon::new(lat, lon),
        }
    }
}

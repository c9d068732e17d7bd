//! Map marker projection.

use crate::frequency::{FrequencyBucket, FrequencyRecord};
use serde::Serialize;
use wtv_core::config::MapStyle;

/// One clickable station marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Station id; returned verbatim by the renderer on click
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub bucket: FrequencyBucket,
    pub color: String,
    pub opacity: f64,
    pub size: u32,
    pub selected: bool,
}

/// Legend entry for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub bucket: FrequencyBucket,
    pub name: String,
    pub color: String,
}

/// Declarative description of every marker on the map.
///
/// Markers are ordered LOW bucket first, then HIGH, each in frequency
/// record order, so click targets keep their positions between renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MarkerSet {
    pub markers: Vec<Marker>,
    /// One entry per bucket, in draw order
    pub layers: Vec<Layer>,
    pub basemap: String,
}

impl MarkerSet {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn find(&self, label: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.label == label)
    }

    /// Markers of one bucket, in draw order.
    pub fn layer(&self, bucket: FrequencyBucket) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |m| m.bucket == bucket)
    }
}

/// Build the marker set for the current selection.
pub fn project_markers(
    records: &[FrequencyRecord],
    selection: &[String],
    bucket_threshold: f64,
    style: &MapStyle,
) -> MarkerSet {
    let mut markers = Vec::with_capacity(records.len());
    let mut layers = Vec::with_capacity(FrequencyBucket::ORDER.len());
    for bucket in FrequencyBucket::ORDER {
        let color = match bucket {
            FrequencyBucket::Low => &style.low_color,
            FrequencyBucket::High => &style.high_color,
        };
        layers.push(Layer {
            bucket,
            name: bucket.legend_name().to_string(),
            color: color.clone(),
        });
        for record in records.iter().filter(|r| r.bucket(bucket_threshold) == bucket) {
            let selected = selection.iter().any(|id| *id == record.station_id);
            markers.push(Marker {
                label: record.station_id.clone(),
                lat: record.position.lat,
                lon: record.position.lon,
                bucket,
                color: color.clone(),
                opacity: if selected {
                    style.selected_opacity
                } else {
                    style.dimmed_opacity
                },
                size: style.marker_size,
                selected,
            });
        }
    }
    MarkerSet {
        markers,
        layers,
        basemap: style.basemap.clone(),
    }
}

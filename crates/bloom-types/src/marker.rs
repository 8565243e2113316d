//! Map marker derived from flow outputs.
//!
//! The flow executor never constructs markers; the presentation layer derives
//! one from a flow output plus coordinates it chooses itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flow::{BloomDetection, BloomForecast};

/// A pin on the bloom map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique marker id.
    pub id: Uuid,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Display name, usually the queried location.
    pub name: String,
    /// Status line shown in the marker popup.
    pub status: String,
    /// Icon key understood by the map renderer.
    pub icon: MarkerIcon,
}

/// Icon variants the map renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    /// A detected or monitored bloom.
    Flower,
    /// A forecast pin.
    Leaf,
    /// A citizen-submitted report.
    Report,
}

impl Marker {
    /// Derive a marker from a detection result at caller-chosen coordinates.
    pub fn from_detection(
        detection: &BloomDetection,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lat,
            lng,
            name: name.into(),
            status: detection.bloom_status.clone(),
            icon: MarkerIcon::Flower,
        }
    }

    /// Derive a marker from a forecast result at caller-chosen coordinates.
    pub fn from_forecast(
        forecast: &BloomForecast,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lat,
            lng,
            name: name.into(),
            status: forecast.forecast.clone(),
            icon: MarkerIcon::Leaf,
        }
    }
}

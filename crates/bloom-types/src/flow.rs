//! Typed input and output contracts for the built-in flows.
//!
//! Wire field names are camelCase to match the schema definitions in
//! `bloom-flows`; the structs here serialize to exactly the shape the
//! input/output schemas validate.

use serde::{Deserialize, Serialize};

/// Name of the bloom detection/monitoring flow.
pub const BLOOM_DETECTION_FLOW: &str = "bloom-detection";

/// Name of the bloom forecast flow.
pub const BLOOM_FORECAST_FLOW: &str = "bloom-forecast";

/// Request for either built-in flow: a location plus an inclusive date range.
///
/// Dates are ISO-8601 (`YYYY-MM-DD`) strings. Ordering of the range is not
/// checked here or by input validation; the backend is handed whatever range
/// the caller supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloomQuery {
    /// Geographic location, e.g. "California, USA".
    pub location: String,
    /// Start of the query period (YYYY-MM-DD).
    pub start_date: String,
    /// End of the query period (YYYY-MM-DD).
    pub end_date: String,
}

impl BloomQuery {
    /// Create a new query.
    pub fn new(
        location: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// Result of the `bloom-detection` flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloomDetection {
    /// Current bloom status for the location and period, free text.
    pub bloom_status: String,
    /// Model-reported confidence. Intended domain is [0, 1] but only the
    /// basic numeric type is enforced at the boundary.
    pub confidence_level: f64,
    /// Satellite data sources the model reports using, in the order it
    /// listed them. May be empty.
    pub satellite_data_used: Vec<String>,
}

/// Result of the `bloom-forecast` flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloomForecast {
    /// Narrative description of the predicted bloom events.
    pub forecast: String,
}

//! Serializable analysis report types.
//!
//! `AnalysisSummary` is the schema persisted by `analyze --save` and read
//! back by the band comparison tool.

use serde::{Deserialize, Serialize};

/// One frequency band's share of total spectral energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRow {
    pub band: String,
    pub lo_hz: f64,
    pub hi_hz: f64,
    pub energy: f64,
    pub pct: f64,
}

/// Full analysis report for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub file: String,
    pub sample_rate: u32,
    pub duration_sec: f64,
    pub estimated_fundamental_hz: Option<f64>,
    pub bands: Vec<BandRow>,
    pub total_power: f64,
    /// Configured overtones band edges, low then high.
    pub air_band_hz: [f64; 2],
    /// Print precision the report was generated with.
    pub decimals: u32,
}

impl AnalysisSummary {
    /// Parse from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

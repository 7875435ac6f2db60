//! Parameter schema for the brightening engine.
//!
//! All callers (CLI, tests) use the same `BrightenParams` struct. Presets
//! load from sparse JSON: missing keys get default values.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BrightenError;

/// Accept both `2` and `2.0` from JSON, truncate to i32.
fn as_i32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let v: serde_json::Value = Deserialize::deserialize(d)?;
    match &v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(|i| i as i32)
            .or_else(|| n.as_f64().map(|f| f as i32))
            .ok_or_else(|| serde::de::Error::custom(format!("cannot convert {n} to i32"))),
        _ => Err(serde::de::Error::custom(format!("expected number, got {v}"))),
    }
}

/// Brightening parameters.
///
/// Uses `#[serde(default)]` so sparse preset JSON loads correctly —
/// missing keys get default values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrightenParams {
    /// High-pass corner frequency in Hz. Must lie below Nyquist.
    pub corner_hz: f64,

    /// Butterworth filter order (>= 1).
    #[serde(deserialize_with = "as_i32")]
    pub order: i32,

    /// Gain applied to the high-passed signal before re-adding it.
    pub blend: f64,

    /// Soft-clip drive. Higher values saturate harder.
    pub drive: f64,
}

impl Default for BrightenParams {
    fn default() -> Self {
        Self {
            corner_hz: 3000.0,
            order: 2,
            blend: 2.5,
            drive: 1.2,
        }
    }
}

impl BrightenParams {
    /// Parse from JSON string. Missing fields get default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the configuration against the sample rate it will run at.
    pub fn validate(&self, sample_rate: u32) -> Result<(), BrightenError> {
        if sample_rate == 0 {
            return Err(BrightenError::InvalidInput(
                "sample rate must be positive".into(),
            ));
        }
        let nyquist = sample_rate as f64 / 2.0;
        if !(self.corner_hz > 0.0 && self.corner_hz < nyquist) {
            return Err(BrightenError::InvalidConfiguration(format!(
                "corner frequency {} Hz must lie in (0, {}) Hz",
                self.corner_hz, nyquist
            )));
        }
        if self.order < 1 {
            return Err(BrightenError::InvalidConfiguration(format!(
                "filter order {} must be at least 1",
                self.order
            )));
        }
        if !self.blend.is_finite() || self.blend < 0.0 {
            return Err(BrightenError::InvalidConfiguration(format!(
                "blend gain {} must be non-negative",
                self.blend
            )));
        }
        if !self.drive.is_finite() || self.drive <= 0.0 {
            return Err(BrightenError::InvalidConfiguration(format!(
                "soft-clip drive {} must be positive",
                self.drive
            )));
        }
        Ok(())
    }
}

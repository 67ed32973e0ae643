// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Output handed to the plotting front end.
//!
//! A [`ProfileReport`] bundles both curves with a few summary figures and is
//! written as newline-terminated JSON.

use crate::profile::ProfileCurves;
use serde::{Deserialize, Serialize};

/// Granularity of the suggested pressure axis ceiling, in Torr.
pub const PRESSURE_AXIS_STEP_TORR: f64 = 50.0;

/// Headroom above the peak pressure before rounding, in Torr.
pub const PRESSURE_AXIS_HEADROOM_TORR: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Estimated total run time in hours.
    pub total_time_hours: f64,
    pub peak_temperature: f64,
    pub peak_pressure: f64,
    /// Suggested upper limit for the pressure axis.
    pub pressure_axis_ceiling: f64,
}

impl ProfileSummary {
    pub fn from_curves(curves: &ProfileCurves) -> Self {
        let peak_pressure = curves.pressure.max_value().unwrap_or(0.0);
        Self {
            total_time_hours: curves.temperature.end_time(),
            peak_temperature: curves.temperature.max_value().unwrap_or(0.0),
            peak_pressure,
            pressure_axis_ceiling: round_up_to_multiple(
                peak_pressure + PRESSURE_AXIS_HEADROOM_TORR,
                PRESSURE_AXIS_STEP_TORR,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub summary: ProfileSummary,
    #[serde(flatten)]
    pub curves: ProfileCurves,
}

impl ProfileReport {
    pub fn new(name: Option<String>, curves: ProfileCurves) -> Self {
        Self {
            name,
            summary: ProfileSummary::from_curves(&curves),
            curves,
        }
    }
}

fn round_up_to_multiple(value: f64, step: f64) -> f64 {
    (value / step).ceil() * step
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

/// Encode a message as a newline-delimited JSON string.
pub fn encode<T: Serialize>(msg: &T) -> Result<String, serde_json::Error> {
    let mut s = serde_json::to_string(msg)?;
    s.push('\n');
    Ok(s)
}

/// Encode a message as indented JSON with a trailing newline.
pub fn encode_pretty<T: Serialize>(msg: &T) -> Result<String, serde_json::Error> {
    let mut s = serde_json::to_string_pretty(msg)?;
    s.push('\n');
    Ok(s)
}

/// Decode a message from a JSON string (newline-trimmed).
pub fn decode<'a, T: Deserialize<'a>>(s: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(s.trim())
}

// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Heating schedule arithmetic: ramp/hold segments to a temperature curve.

use crate::curve::Curve;
use serde::{Deserialize, Serialize};

pub const DEFAULT_START_TEMPERATURE_C: f64 = 20.0;

/// Ramp rates at or below this magnitude are treated as "no ramp".
pub const DEFAULT_SLEW_EPSILON_C_PER_MIN: f64 = 0.01;

/// One step of a heating recipe: ramp to `target_celsius`, then hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatingSegment {
    #[serde(default)]
    pub hold_hours: f64,
    #[serde(default)]
    pub slew_c_per_min: f64,
    #[serde(default)]
    pub target_celsius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatingSettings {
    /// Furnace temperature at t = 0.
    #[serde(default = "default_start_temperature")]
    pub start_temperature: f64,

    #[serde(default = "default_slew_epsilon")]
    pub slew_epsilon: f64,
}

impl Default for HeatingSettings {
    fn default() -> Self {
        Self {
            start_temperature: DEFAULT_START_TEMPERATURE_C,
            slew_epsilon: DEFAULT_SLEW_EPSILON_C_PER_MIN,
        }
    }
}

fn default_start_temperature() -> f64 {
    DEFAULT_START_TEMPERATURE_C
}

fn default_slew_epsilon() -> f64 {
    DEFAULT_SLEW_EPSILON_C_PER_MIN
}

/// Temperature curve for a sequence of heating segments.
///
/// Starts at `(0, start_temperature)` and adds one point at the end of each
/// ramp and one at the end of each hold.
pub fn heating_curve(segments: &[HeatingSegment], settings: &HeatingSettings) -> Curve {
    let mut temperature = settings.start_temperature;
    let mut time = 0.0;
    let mut curve = Curve::new();
    curve.push(time, temperature);

    for segment in segments {
        if segment.slew_c_per_min.abs() > settings.slew_epsilon {
            let ramp_hours =
                ((segment.target_celsius - temperature) / segment.slew_c_per_min / 60.0).abs();
            temperature = segment.target_celsius;
            if ramp_hours > 0.0 {
                time += ramp_hours;
                curve.push(time, temperature);
            }
        }
        if segment.hold_hours > 0.0 {
            time += segment.hold_hours;
            curve.push(time, temperature);
        }
    }

    curve
}

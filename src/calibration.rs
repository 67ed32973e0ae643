// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Empirical cooling calibration and strict lookups over it.
//!
//! Each cooling phase has a table of measured furnace temperatures at
//! quarter-hour intervals, starting from a very high temperature and ending
//! below 0 C. The final point is a distant asymptotic bound, not a
//! measurement. Lookups are piecewise linear in both directions and fail
//! with [`ProfileError::OutOfDomain`] rather than extrapolate.

use crate::curve::interpolate;
use crate::error::{ProfileError, Quantity};
use serde::{Deserialize, Serialize};

/// Cooling regime, each with its own calibration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Forced-gas cooling.
    Active,
    /// Radiative cooling with no forced gas flow.
    Passive,
}

/// A single measured point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub time_hours: f64,
    pub temp_celsius: f64,
}

const TIME_HOURS: [f64; 82] = [
    -3.00, 0.00, 0.25, 0.50, 0.75, 1.00, 1.25, 1.50, 1.75, //
    2.00, 2.25, 2.50, 2.75, 3.00, 3.25, 3.50, 3.75, //
    4.00, 4.25, 4.50, 4.75, 5.00, 5.25, 5.50, 5.75, //
    6.00, 6.25, 6.50, 6.75, 7.00, 7.25, 7.50, 7.75, //
    8.00, 8.25, 8.50, 8.75, 9.00, 9.25, 9.50, 9.75, //
    10.00, 10.25, 10.50, 10.75, 11.00, 11.25, 11.50, 11.75, //
    12.00, 12.25, 12.50, 12.75, 13.00, 13.25, 13.50, 13.75, //
    14.00, 14.25, 14.50, 14.75, 15.00, 15.25, 15.50, 15.75, //
    16.00, 16.25, 16.50, 16.75, 17.00, 17.25, 17.50, 17.75, //
    18.00, 18.25, 18.50, 18.75, 19.00, 19.25, 19.50, 19.75, //
    29.75,
];

const PASSIVE_TEMPS_C: [f64; 82] = [
    2575.86, 1254.27, 1148.17, 1059.39, 990.93, 934.85, 886.91, 843.75, 804.71, //
    769.45, 737.02, 707.51, 680.11, 653.80, 628.35, 604.37, 581.58, //
    560.06, 539.63, 519.88, 501.35, 483.70, 466.90, 450.64, 434.38, //
    418.40, 403.07, 388.16, 374.16, 360.83, 347.94, 335.52, 323.63, //
    312.14, 301.10, 290.49, 280.28, 270.75, 261.12, 251.42, 242.13, //
    233.25, 224.51, 216.12, 208.35, 200.94, 193.60, 186.33, 179.81, //
    173.68, 167.37, 161.60, 154.98, 149.40, 144.00, 138.71, 133.62, //
    128.71, 123.97, 119.40, 114.99, 110.73, 106.62, 102.66, 98.84, //
    95.15, 91.59, 88.16, 84.85, 81.65, 78.57, 75.60, 72.73, //
    69.96, 67.29, 64.71, 62.23, 59.78, 57.34, 54.91, 52.47, //
    -30.33,
];

const ACTIVE_TEMPS_C: [f64; 82] = [
    2324.7, 1380.0, 1270.7, 1172.9, 1084.9, 1004.9, 931.4, 862.7, 797.1, //
    733.0, 668.6, 602.3, 532.5, 457.4, 375.4, 284.9, 184.1, //
    71.4, 61.2, 52.9, 46.3, 41.1, 36.9, 33.5, 30.8, //
    28.6, 26.9, 25.5, 24.4, 23.5, 22.8, 22.3, 21.8, //
    21.3, 20.8, 20.3, 19.8, 19.3, 18.8, 18.3, 17.8, //
    17.3, 16.8, 16.3, 15.8, 15.3, 14.8, 14.3, 13.8, //
    13.3, 12.8, 12.3, 11.8, 11.3, 10.8, 10.3, 9.8, //
    9.3, 8.8, 8.3, 7.8, 7.3, 6.8, 6.3, 5.8, //
    5.3, 4.8, 4.3, 3.8, 3.3, 2.8, 2.3, 1.8, //
    1.3, 0.8, 0.3, -0.2, -0.7, -1.2, -1.7, -2.2, //
    -22.2,
];

/// One phase's calibration, stored in both lookup orders.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable {
    phase: Phase,
    /// Ascending.
    times: Vec<f64>,
    /// Descending, paired with `times`.
    temps: Vec<f64>,
    /// Ascending; `temps` reversed.
    temps_ascending: Vec<f64>,
    /// `times` reversed, paired with `temps_ascending`.
    times_by_temp: Vec<f64>,
}

impl CalibrationTable {
    /// Build a table from points ordered by time.
    ///
    /// Time must strictly increase and temperature strictly decrease, so that
    /// both lookup directions are single-valued.
    pub fn new(phase: Phase, points: &[CalibrationPoint]) -> Result<Self, ProfileError> {
        if points.len() < 2 {
            return Err(ProfileError::InvalidCalibration(format!(
                "{phase:?} table needs at least 2 points, got {}",
                points.len()
            )));
        }
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].time_hours <= pair[0].time_hours {
                return Err(ProfileError::InvalidCalibration(format!(
                    "{phase:?} table times must strictly increase (point {})",
                    i + 1
                )));
            }
            if pair[1].temp_celsius >= pair[0].temp_celsius {
                return Err(ProfileError::InvalidCalibration(format!(
                    "{phase:?} table temperatures must strictly decrease (point {})",
                    i + 1
                )));
            }
        }

        Ok(Self::from_ordered(
            phase,
            points.iter().map(|p| p.time_hours).collect(),
            points.iter().map(|p| p.temp_celsius).collect(),
        ))
    }

    fn from_ordered(phase: Phase, times: Vec<f64>, temps: Vec<f64>) -> Self {
        let temps_ascending = temps.iter().rev().copied().collect();
        let times_by_temp = times.iter().rev().copied().collect();
        Self {
            phase,
            times,
            temps,
            temps_ascending,
            times_by_temp,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// `(earliest, latest)` calibrated time.
    pub fn time_range(&self) -> (f64, f64) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    /// `(coldest, hottest)` calibrated temperature.
    pub fn temperature_range(&self) -> (f64, f64) {
        (
            self.temps_ascending[0],
            self.temps_ascending[self.temps_ascending.len() - 1],
        )
    }

    fn temperature_at_time(&self, time: f64) -> Result<f64, ProfileError> {
        interpolate(&self.times, &self.temps, time).ok_or_else(|| {
            let (min, max) = self.time_range();
            ProfileError::OutOfDomain {
                quantity: Quantity::Time,
                value: time,
                min,
                max,
            }
        })
    }

    fn time_at_temperature(&self, temp: f64) -> Result<f64, ProfileError> {
        interpolate(&self.temps_ascending, &self.times_by_temp, temp).ok_or_else(|| {
            let (min, max) = self.temperature_range();
            ProfileError::OutOfDomain {
                quantity: Quantity::Temperature,
                value: temp,
                min,
                max,
            }
        })
    }
}

/// Calibration tables for both cooling phases.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationDataset {
    active: CalibrationTable,
    passive: CalibrationTable,
}

impl CalibrationDataset {
    pub fn new(active: CalibrationTable, passive: CalibrationTable) -> Result<Self, ProfileError> {
        if active.phase() != Phase::Active || passive.phase() != Phase::Passive {
            return Err(ProfileError::InvalidCalibration(
                "tables must be labelled active and passive respectively".to_string(),
            ));
        }
        Ok(Self { active, passive })
    }

    /// The furnace's measured active and passive cooling curves.
    pub fn builtin() -> Self {
        // The embedded tables satisfy the ordering checks in `CalibrationTable::new`.
        Self {
            active: CalibrationTable::from_ordered(
                Phase::Active,
                TIME_HOURS.to_vec(),
                ACTIVE_TEMPS_C.to_vec(),
            ),
            passive: CalibrationTable::from_ordered(
                Phase::Passive,
                TIME_HOURS.to_vec(),
                PASSIVE_TEMPS_C.to_vec(),
            ),
        }
    }

    pub fn table(&self, phase: Phase) -> &CalibrationTable {
        match phase {
            Phase::Active => &self.active,
            Phase::Passive => &self.passive,
        }
    }
}

impl Default for CalibrationDataset {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Strict time/temperature lookups over a [`CalibrationDataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurveInterpolator {
    dataset: CalibrationDataset,
}

impl CurveInterpolator {
    pub fn new(dataset: CalibrationDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &CalibrationDataset {
        &self.dataset
    }

    /// Calibrated temperature `time` hours into the phase's cooling curve.
    pub fn temperature_at_time(&self, time: f64, phase: Phase) -> Result<f64, ProfileError> {
        self.dataset.table(phase).temperature_at_time(time)
    }

    /// Hours into the phase's cooling curve at which `temp` is reached.
    pub fn time_at_temperature(&self, temp: f64, phase: Phase) -> Result<f64, ProfileError> {
        self.dataset.table(phase).time_at_temperature(temp)
    }
}

impl Default for CurveInterpolator {
    fn default() -> Self {
        Self::new(CalibrationDataset::builtin())
    }
}

// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Error type shared by the calibration, cooling and pressure modules.

use std::fmt;

/// Which axis a failed lookup was keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Elapsed time in hours.
    Time,
    /// Temperature in degrees Celsius.
    Temperature,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Time => write!(f, "time"),
            Quantity::Temperature => write!(f, "temperature"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    /// A calibration lookup fell outside the calibrated range. No extrapolation.
    #[error("{quantity} {value} is outside the calibrated range [{min}, {max}]")]
    OutOfDomain {
        quantity: Quantity,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A pressure change was requested before the previous one finished.
    #[error(
        "Insufficient time to adjust pressure between pressure changes \
         (requested at {requested:.3} h, previous change completes at {available:.3} h)"
    )]
    SchedulingConflict { requested: f64, available: f64 },

    /// A reverse lookup was built over a curve with no points.
    #[error("cannot build an interpolator over an empty curve")]
    EmptyCurve,

    /// A calibration table failed validation.
    #[error("invalid calibration table: {0}")]
    InvalidCalibration(String),
}

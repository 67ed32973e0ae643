// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Furnace cooldown and vacuum/backfill pressure profile calculator.
//!
//! Predicts the temperature trajectory of a furnace run (heating recipe
//! followed by a calibrated passive/active cooldown) and the pressure
//! schedule implied by its temperature-keyed switch points.

pub mod calibration;
pub mod config;
pub mod cooling;
pub mod curve;
pub mod error;
pub mod heating;
pub mod pressure;
pub mod profile;
pub mod report;

pub use calibration::{CalibrationDataset, CurveInterpolator, Phase};
pub use curve::{Curve, ReverseInterpolator};
pub use error::ProfileError;
pub use profile::{ProfileCalculator, ProfileCurves, ProfileRequest};

// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Sampled curves, piecewise-linear lookups and monotonic-prefix extraction.
//!
//! A [`Curve`] is a pair of parallel sequences: times in hours and either
//! temperatures (degrees Celsius) or pressures (Torr). Lookups are linearly
//! interpolated between adjacent samples.

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};

/// A time-ordered trajectory of temperature or pressure values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Sample times in hours.
    pub times: Vec<f64>,
    /// Sample values, same length as `times`.
    pub values: Vec<f64>,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from parallel vectors. Extra trailing entries of the
    /// longer vector are dropped.
    pub fn from_parts(mut times: Vec<f64>, mut values: Vec<f64>) -> Self {
        let len = times.len().min(values.len());
        times.truncate(len);
        values.truncate(len);
        Self { times, values }
    }

    pub fn push(&mut self, time: f64, value: f64) {
        self.times.push(time);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> Option<(f64, f64)> {
        Some((*self.times.first()?, *self.values.first()?))
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.times.last()?, *self.values.last()?))
    }

    /// Iterate `(time, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Time of the final sample, or 0 for an empty curve.
    pub fn end_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Append `other`, dropping its first sample when it lands on this
    /// curve's last time (the shared splice point).
    pub fn splice(&mut self, other: Curve) {
        let skip = match (self.last(), other.first()) {
            (Some((end, _)), Some((start, _))) => usize::from(end == start),
            _ => 0,
        };
        self.times.extend(other.times.into_iter().skip(skip));
        self.values.extend(other.values.into_iter().skip(skip));
    }
}

/// Linear interpolation of `range` over a non-decreasing `domain`.
///
/// Returns `None` when `x` lies outside `[domain[0], domain[n-1]]`. When `x`
/// matches a run of repeated domain values the first bracketing segment wins.
pub(crate) fn interpolate(domain: &[f64], range: &[f64], x: f64) -> Option<f64> {
    let (first, last) = (*domain.first()?, *domain.last()?);
    if x.is_nan() || x < first || x > last {
        return None;
    }
    if domain.len() == 1 {
        return range.first().copied();
    }

    for (i, window) in domain.windows(2).enumerate() {
        let (lo, hi) = (window[0], window[1]);
        if x >= lo && x <= hi {
            let span = hi - lo;
            if span == 0.0 {
                return Some(range[i]);
            }
            let frac = (x - lo) / span;
            return Some(range[i] + frac * (range[i + 1] - range[i]));
        }
    }

    None
}

/// Longest leading run of `values` that is monotonic in the requested
/// direction, together with the matching `times`.
///
/// The scan keeps a point only if its value is not below the last kept
/// value, and stops for good at the first point that is. For
/// `increasing = false` both inputs are reversed first, so the result is
/// always ascending in value: the tail of a falling curve, read backwards.
pub fn extract_monotonic_prefix(
    times: &[f64],
    values: &[f64],
    increasing: bool,
) -> (Vec<f64>, Vec<f64>) {
    let len = times.len().min(values.len());
    let (times, values) = (&times[..len], &values[..len]);
    let pairs: Box<dyn Iterator<Item = (f64, f64)> + '_> = if increasing {
        Box::new(times.iter().copied().zip(values.iter().copied()))
    } else {
        Box::new(times.iter().rev().copied().zip(values.iter().rev().copied()))
    };

    let mut kept_times = Vec::new();
    let mut kept_values: Vec<f64> = Vec::new();
    for (t, v) in pairs {
        if let Some(&prev) = kept_values.last() {
            if v < prev {
                break;
            }
        }
        kept_times.push(t);
        kept_values.push(v);
    }

    (kept_times, kept_values)
}

/// Temperature-to-time lookup over a sampled curve.
///
/// Unlike the calibration lookups this one clamps: temperatures below the
/// domain return the time at the lowest temperature, temperatures above it
/// return the time at the highest.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseInterpolator {
    /// Non-decreasing.
    temperatures: Vec<f64>,
    times: Vec<f64>,
}

impl ReverseInterpolator {
    /// Build over the monotonic prefix of `(times, temperatures)`.
    ///
    /// Use `increasing = true` for a heating curve read forwards and
    /// `increasing = false` for a cooldown read backwards from its end.
    pub fn build(
        times: &[f64],
        temperatures: &[f64],
        increasing: bool,
    ) -> Result<Self, ProfileError> {
        let (times, temperatures) = extract_monotonic_prefix(times, temperatures, increasing);
        if times.is_empty() {
            return Err(ProfileError::EmptyCurve);
        }
        log::debug!(
            "Reverse interpolator over {} point(s), {:.1}..{:.1} C",
            temperatures.len(),
            temperatures[0],
            temperatures[temperatures.len() - 1]
        );
        Ok(Self {
            temperatures,
            times,
        })
    }

    /// Time at which the curve passes `temperature`, clamped to the domain.
    pub fn time_at(&self, temperature: f64) -> f64 {
        if temperature < self.temperatures[0] {
            return self.time_at_domain_min();
        }
        if temperature > self.temperatures[self.temperatures.len() - 1] {
            return self.time_at_domain_max();
        }
        interpolate(&self.temperatures, &self.times, temperature)
            .unwrap_or_else(|| self.time_at_domain_max())
    }

    /// Time paired with the lowest retained temperature.
    ///
    /// For a cooldown interpolator this is the end of the whole curve.
    pub fn time_at_domain_min(&self) -> f64 {
        self.times[0]
    }

    /// Time paired with the highest retained temperature.
    ///
    /// For a heating interpolator this is the end of heating.
    pub fn time_at_domain_max(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn min_temperature(&self) -> f64 {
        self.temperatures[0]
    }

    pub fn max_temperature(&self) -> f64 {
        self.temperatures[self.temperatures.len() - 1]
    }
}

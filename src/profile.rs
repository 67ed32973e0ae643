// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Full profile computation: heating, cooldown and pressure curves from
//! already-parsed recipe records.

use crate::calibration::CurveInterpolator;
use crate::config::Config;
use crate::cooling::CoolingCurveSynthesizer;
use crate::curve::{Curve, ReverseInterpolator};
use crate::error::ProfileError;
use crate::heating::{self, HeatingSegment};
use crate::pressure::{self, SwitchPoint};
use serde::{Deserialize, Serialize};

pub const DEFAULT_END_TEMPERATURE_C: f64 = 150.0;
pub const DEFAULT_MAX_ACTIVE_COOLING_TEMPERATURE_C: f64 = 1050.0;

/// Active-cooling limits at or below this are rejected as implausible.
pub const MIN_PLAUSIBLE_ACTIVE_COOLING_TEMPERATURE_C: f64 = 50.0;

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Fallback values for [`Modifiers::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierDefaults {
    #[serde(default = "default_end_temperature")]
    pub end_temperature: f64,

    #[serde(default = "default_max_active_cooling_temperature")]
    pub max_active_cooling_temperature: f64,

    #[serde(default = "default_min_active_cooling_temperature")]
    pub min_active_cooling_temperature: f64,
}

impl Default for ModifierDefaults {
    fn default() -> Self {
        Self {
            end_temperature: DEFAULT_END_TEMPERATURE_C,
            max_active_cooling_temperature: DEFAULT_MAX_ACTIVE_COOLING_TEMPERATURE_C,
            min_active_cooling_temperature: MIN_PLAUSIBLE_ACTIVE_COOLING_TEMPERATURE_C,
        }
    }
}

fn default_end_temperature() -> f64 {
    DEFAULT_END_TEMPERATURE_C
}

fn default_max_active_cooling_temperature() -> f64 {
    DEFAULT_MAX_ACTIVE_COOLING_TEMPERATURE_C
}

fn default_min_active_cooling_temperature() -> f64 {
    MIN_PLAUSIBLE_ACTIVE_COOLING_TEMPERATURE_C
}

/// Modifier values as they appear in a recipe; either may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawModifiers {
    #[serde(default)]
    pub end_temperature: Option<f64>,
    #[serde(default)]
    pub max_active_cooling_temperature: Option<f64>,
}

/// Bounds on the composite cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub end_temperature: f64,
    pub max_active_cooling_temperature: f64,
}

impl Modifiers {
    pub fn resolve(raw: RawModifiers, defaults: &ModifierDefaults) -> Self {
        let end_temperature = raw.end_temperature.unwrap_or_else(|| {
            log::debug!(
                "No end temperature, using {:.1} C",
                defaults.end_temperature
            );
            defaults.end_temperature
        });

        let max_active_cooling_temperature = match raw.max_active_cooling_temperature {
            Some(t) if t > defaults.min_active_cooling_temperature => t,
            Some(t) => {
                log::warn!(
                    "Maximum active cooling temperature {t:.1} C is implausible, using {:.1} C",
                    defaults.max_active_cooling_temperature
                );
                defaults.max_active_cooling_temperature
            }
            None => defaults.max_active_cooling_temperature,
        };

        Self {
            end_temperature,
            max_active_cooling_temperature,
        }
    }
}

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// Recipe records for one profile, already parsed and defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub segments: Vec<HeatingSegment>,
    #[serde(default)]
    pub heating_switch_points: Vec<SwitchPoint>,
    #[serde(default)]
    pub cooling_switch_points: Vec<SwitchPoint>,
    #[serde(default)]
    pub modifiers: RawModifiers,
}

/// Temperature (C) and pressure (Torr) trajectories, both in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCurves {
    pub temperature: Curve,
    pub pressure: Curve,
}

/// Computes profiles against one calibration and configuration.
///
/// Holds no per-request state; the same calculator can serve any number of
/// requests, including from several threads.
#[derive(Debug, Clone)]
pub struct ProfileCalculator {
    interpolator: CurveInterpolator,
    config: Config,
}

impl ProfileCalculator {
    pub fn new(interpolator: CurveInterpolator, config: Config) -> Self {
        Self {
            interpolator,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn compute(&self, request: &ProfileRequest) -> Result<ProfileCurves, ProfileError> {
        let modifiers = Modifiers::resolve(request.modifiers, &self.config.modifiers);
        let temperature = self.temperature_curve(&request.segments, &modifiers)?;

        let heating = ReverseInterpolator::build(&temperature.times, &temperature.values, true)?;
        let cooling = ReverseInterpolator::build(&temperature.times, &temperature.values, false)?;
        let max_temperature = temperature.max_value().ok_or(ProfileError::EmptyCurve)?;

        let pressure = pressure::build_profile(
            self.config.pressure,
            &request.heating_switch_points,
            &request.cooling_switch_points,
            &heating,
            &cooling,
            max_temperature,
        )?;

        log::info!(
            "Profile {}: {} temperature and {} pressure point(s) over {:.2} h",
            request.name.as_deref().unwrap_or("<unnamed>"),
            temperature.len(),
            pressure.len(),
            temperature.end_time()
        );
        Ok(ProfileCurves {
            temperature,
            pressure,
        })
    }

    /// Heating followed by the composite cooldown from its final point.
    pub fn temperature_curve(
        &self,
        segments: &[HeatingSegment],
        modifiers: &Modifiers,
    ) -> Result<Curve, ProfileError> {
        let mut curve = heating::heating_curve(segments, &self.config.heating);
        let (start_time, start_temp) = curve.last().ok_or(ProfileError::EmptyCurve)?;

        let cooldown = CoolingCurveSynthesizer::new(&self.interpolator).composite_cooldown(
            start_temp,
            modifiers.end_temperature,
            start_time,
            modifiers.max_active_cooling_temperature,
        )?;
        curve.splice(cooldown);
        Ok(curve)
    }
}

impl Default for ProfileCalculator {
    fn default() -> Self {
        Self::new(CurveInterpolator::default(), Config::default())
    }
}

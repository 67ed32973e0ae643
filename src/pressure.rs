// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Vacuum/backfill pressure schedule as a step function of time.
//!
//! Switch points say "when the furnace passes this temperature, change to
//! this pressure". They are resolved to times through the heating and
//! cooling reverse interpolators and turned into constant-pressure
//! plateaus. Raising pressure above the rough-vacuum threshold is not
//! instantaneous: it takes `|dP| / slew_rate` hours, and no further change
//! may be scheduled until it completes.

use crate::curve::{Curve, ReverseInterpolator};
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};

/// Repressurization rate in Torr per hour.
pub const DEFAULT_SLEW_RATE_TORR_PER_HOUR: f64 = 300.0;

/// Pressures above this are reached at the slew rate; at or below it they
/// are treated as instantaneous.
pub const DEFAULT_TIMED_CHANGE_THRESHOLD_TORR: f64 = 20.0;

/// Initial pump-down period during which the schedule holds at 0 Torr.
pub const DEFAULT_GRACE_PERIOD_HOURS: f64 = 0.25;

/// Holds shorter than this are not emitted.
pub const DEFAULT_HOLD_EPSILON_HOURS: f64 = 0.001;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A caller-supplied pressure change keyed on furnace temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchPoint {
    pub temperature_celsius: f64,
    /// Backfill gas name, e.g. "Argon". Informational only.
    #[serde(default = "default_gas")]
    pub gas: String,
    pub pressure_torr: f64,
    #[serde(default)]
    pub front_heat: bool,
}

impl SwitchPoint {
    pub fn new(temperature_celsius: f64, pressure_torr: f64) -> Self {
        Self {
            temperature_celsius,
            gas: default_gas(),
            pressure_torr,
            front_heat: false,
        }
    }
}

fn default_gas() -> String {
    "Vacuum".to_string()
}

/// A constant-pressure interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plateau {
    pub start_time: f64,
    pub end_time: f64,
    pub pressure: f64,
}

/// Physical timing parameters for pressure changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureSettings {
    #[serde(default = "default_slew_rate")]
    pub slew_rate_torr_per_hour: f64,

    #[serde(default = "default_threshold")]
    pub timed_change_threshold_torr: f64,

    #[serde(default = "default_grace_period")]
    pub grace_period_hours: f64,

    #[serde(default = "default_hold_epsilon")]
    pub hold_epsilon_hours: f64,
}

impl Default for PressureSettings {
    fn default() -> Self {
        Self {
            slew_rate_torr_per_hour: DEFAULT_SLEW_RATE_TORR_PER_HOUR,
            timed_change_threshold_torr: DEFAULT_TIMED_CHANGE_THRESHOLD_TORR,
            grace_period_hours: DEFAULT_GRACE_PERIOD_HOURS,
            hold_epsilon_hours: DEFAULT_HOLD_EPSILON_HOURS,
        }
    }
}

fn default_slew_rate() -> f64 {
    DEFAULT_SLEW_RATE_TORR_PER_HOUR
}

fn default_threshold() -> f64 {
    DEFAULT_TIMED_CHANGE_THRESHOLD_TORR
}

fn default_grace_period() -> f64 {
    DEFAULT_GRACE_PERIOD_HOURS
}

fn default_hold_epsilon() -> f64 {
    DEFAULT_HOLD_EPSILON_HOURS
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlateauState {
    Idle,
    /// `time` is when the last requested pressure is fully reached.
    Holding { pressure: f64, time: f64 },
}

/// Accumulates plateau boundaries into a pressure curve.
///
/// One builder per profile; it is consumed by [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct PressureProfileBuilder {
    settings: PressureSettings,
    state: PlateauState,
    plateaus: Vec<Plateau>,
}

impl PressureProfileBuilder {
    pub fn new(settings: PressureSettings) -> Self {
        Self {
            settings,
            state: PlateauState::Idle,
            plateaus: Vec::new(),
        }
    }

    /// Pressure currently in effect (0 before any plateau).
    pub fn last_pressure(&self) -> f64 {
        match self.state {
            PlateauState::Idle => 0.0,
            PlateauState::Holding { pressure, .. } => pressure,
        }
    }

    /// Earliest time the next change may start (0 before any plateau).
    pub fn last_time(&self) -> f64 {
        match self.state {
            PlateauState::Idle => 0.0,
            PlateauState::Holding { time, .. } => time,
        }
    }

    /// Request `pressure` from `time` onwards.
    ///
    /// Emits a hold at the previous pressure up to `time` and schedules the
    /// change. Pressures above the threshold take time to reach unless
    /// `end_of_heating` is set. Fails with
    /// [`ProfileError::SchedulingConflict`] if `time` is before the previous
    /// change completes.
    pub fn add_plateau(
        &mut self,
        pressure: f64,
        time: f64,
        end_of_heating: bool,
    ) -> Result<(), ProfileError> {
        let last_pressure = self.last_pressure();
        let last_time = self.last_time();

        let time_to_change =
            if pressure > self.settings.timed_change_threshold_torr && !end_of_heating {
                (pressure - last_pressure).abs() / self.settings.slew_rate_torr_per_hour
            } else {
                0.0
            };

        if time < last_time {
            return Err(ProfileError::SchedulingConflict {
                requested: time,
                available: last_time,
            });
        }

        let time = time.max(last_time);
        if time - last_time > self.settings.hold_epsilon_hours {
            log::debug!("Plateau {last_pressure} Torr over [{last_time:.3}, {time:.3}] h");
            self.plateaus.push(Plateau {
                start_time: last_time,
                end_time: time,
                pressure: last_pressure,
            });
        }

        self.state = PlateauState::Holding {
            pressure,
            time: time + time_to_change,
        };
        Ok(())
    }

    /// Take `pressure` as current without spending any time or emitting a
    /// plateau. Used when the furnace already passed a switch point.
    pub fn adopt_pressure(&mut self, pressure: f64) {
        let time = self.last_time();
        self.state = PlateauState::Holding { pressure, time };
    }

    pub fn plateaus(&self) -> &[Plateau] {
        &self.plateaus
    }

    /// Pressure curve with two boundary samples per plateau.
    pub fn finish(self) -> Curve {
        let mut curve = Curve::new();
        for plateau in &self.plateaus {
            curve.push(plateau.start_time, plateau.pressure);
            curve.push(plateau.end_time, plateau.pressure);
        }
        curve
    }
}

/// Resolve heating and cooling switch points into a pressure curve.
///
/// Heating points are taken in increasing-temperature order and cooling
/// points in decreasing order. `max_temperature_reached` is the peak of the
/// temperature curve.
pub fn build_profile(
    settings: PressureSettings,
    heating_points: &[SwitchPoint],
    cooling_points: &[SwitchPoint],
    heating: &ReverseInterpolator,
    cooling: &ReverseInterpolator,
    max_temperature_reached: f64,
) -> Result<Curve, ProfileError> {
    let grace = settings.grace_period_hours;
    let end_of_heating = heating.time_at_domain_max();
    let mut builder = PressureProfileBuilder::new(settings);

    builder.add_plateau(0.0, 0.0, false)?;
    builder.add_plateau(0.0, grace, false)?;

    for point in heating_points {
        if point.temperature_celsius > max_temperature_reached {
            log::warn!(
                "Heating switch point at {:.1} C is never reached (peak {:.1} C), applying at end of heating",
                point.temperature_celsius,
                max_temperature_reached
            );
            builder.add_plateau(point.pressure_torr, end_of_heating, true)?;
            break;
        }
        let time = heating.time_at(point.temperature_celsius);
        if time < grace {
            // Folded into the seed plateau: takes effect when the grace period ends.
            builder.add_plateau(point.pressure_torr, grace, false)?;
            continue;
        }
        builder.add_plateau(point.pressure_torr, time, false)?;
    }
    builder.add_plateau(builder.last_pressure(), end_of_heating, false)?;

    for point in cooling_points {
        let temperature = point.temperature_celsius.min(max_temperature_reached);
        let time = cooling.time_at(temperature);
        if time < builder.last_time() {
            log::debug!(
                "Cooling switch point at {:.1} C already passed, adopting {} Torr",
                point.temperature_celsius,
                point.pressure_torr
            );
            builder.adopt_pressure(point.pressure_torr);
            continue;
        }
        builder.add_plateau(point.pressure_torr, time, false)?;
    }
    builder.add_plateau(builder.last_pressure(), cooling.time_at_domain_min(), false)?;

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (ReverseInterpolator, ReverseInterpolator) {
        // Heat 20 -> 1000 C over 2 h, hold 1 h, cool to 100 C by 9 h.
        let times = [0.0, 2.0, 3.0, 9.0];
        let temps = [20.0, 1000.0, 1000.0, 100.0];
        (
            ReverseInterpolator::build(&times, &temps, true).unwrap(),
            ReverseInterpolator::build(&times, &temps, false).unwrap(),
        )
    }

    #[test]
    fn test_scheduling_conflict() {
        let mut builder = PressureProfileBuilder::new(PressureSettings::default());
        builder.add_plateau(0.0, 5.0, false).unwrap();
        assert_eq!(builder.last_time(), 5.0);
        assert_eq!(
            builder.add_plateau(0.0, 3.0, false),
            Err(ProfileError::SchedulingConflict {
                requested: 3.0,
                available: 5.0,
            })
        );
    }

    #[test]
    fn test_slew_time_above_threshold() {
        let mut builder = PressureProfileBuilder::new(PressureSettings::default());
        builder.add_plateau(0.0, 1.0, false).unwrap();
        builder.add_plateau(600.0, 2.0, false).unwrap();
        assert_eq!(builder.last_pressure(), 600.0);
        assert!((builder.last_time() - 4.0).abs() < 1e-12);
        assert!(builder.add_plateau(0.0, 3.0, false).is_err());
    }

    #[test]
    fn test_no_slew_at_or_below_threshold_or_end_of_heating() {
        let mut builder = PressureProfileBuilder::new(PressureSettings::default());
        builder.add_plateau(20.0, 1.0, false).unwrap();
        assert_eq!(builder.last_time(), 1.0);
        builder.add_plateau(600.0, 2.0, true).unwrap();
        assert_eq!(builder.last_time(), 2.0);
    }

    #[test]
    fn test_short_holds_are_not_emitted() {
        let mut builder = PressureProfileBuilder::new(PressureSettings::default());
        builder.add_plateau(0.0, 0.0, false).unwrap();
        builder.add_plateau(5.0, 0.0005, false).unwrap();
        assert!(builder.plateaus().is_empty());
        builder.add_plateau(5.0, 1.0, false).unwrap();
        assert_eq!(
            builder.plateaus(),
            &[Plateau {
                start_time: 0.0005,
                end_time: 1.0,
                pressure: 5.0,
            }]
        );
    }

    #[test]
    fn test_adopt_pressure_costs_no_time() {
        let mut builder = PressureProfileBuilder::new(PressureSettings::default());
        builder.add_plateau(0.0, 2.0, false).unwrap();
        assert_eq!(builder.plateaus().len(), 1);
        builder.adopt_pressure(50.0);
        assert_eq!(builder.last_time(), 2.0);
        assert_eq!(builder.last_pressure(), 50.0);
        assert_eq!(builder.plateaus().len(), 1);
    }

    #[test]
    fn test_single_backfill_cycle() {
        let (heating, cooling) = triangle();
        let curve = build_profile(
            PressureSettings::default(),
            &[SwitchPoint::new(510.0, 30.0)],
            &[SwitchPoint::new(550.0, 0.0)],
            &heating,
            &cooling,
            1000.0,
        )
        .unwrap();

        // 510 C is reached at 1 h, 550 C again at 6 h; 30 Torr takes 0.1 h.
        assert_eq!(
            curve.times,
            vec![0.0, 0.25, 0.25, 1.0, 1.1, 3.0, 3.0, 6.0, 6.0, 9.0]
        );
        assert_eq!(
            curve.values,
            vec![0.0, 0.0, 0.0, 0.0, 30.0, 30.0, 30.0, 30.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_unreached_heating_point_applies_at_end_of_heating() {
        let (heating, cooling) = triangle();
        let curve = build_profile(
            PressureSettings::default(),
            &[SwitchPoint::new(1200.0, 500.0), SwitchPoint::new(1300.0, 0.0)],
            &[],
            &heating,
            &cooling,
            1000.0,
        )
        .unwrap();
        assert_eq!(curve.times, vec![0.0, 0.25, 0.25, 3.0, 3.0, 9.0]);
        assert_eq!(curve.values, vec![0.0, 0.0, 0.0, 0.0, 500.0, 500.0]);
    }

    #[test]
    fn test_heating_point_inside_grace_period() {
        let (heating, cooling) = triangle();
        let curve = build_profile(
            PressureSettings::default(),
            &[SwitchPoint::new(25.0, 10.0)],
            &[],
            &heating,
            &cooling,
            1000.0,
        )
        .unwrap();
        assert_eq!(curve.times, vec![0.0, 0.25, 0.25, 3.0, 3.0, 9.0]);
        assert_eq!(curve.values, vec![0.0, 0.0, 10.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_cooling_point_above_peak_is_clamped() {
        let (heating, cooling) = triangle();
        let curve = build_profile(
            PressureSettings::default(),
            &[],
            &[SwitchPoint::new(1100.0, 15.0)],
            &heating,
            &cooling,
            1000.0,
        )
        .unwrap();
        // Clamped to 1000 C, which the cooldown passes at the end of the hold.
        assert_eq!(curve.times, vec![0.0, 0.25, 0.25, 3.0, 3.0, 9.0]);
        assert_eq!(curve.values, vec![0.0, 0.0, 0.0, 0.0, 15.0, 15.0]);
    }

    #[test]
    fn test_cooling_point_already_passed_is_adopted() {
        let (heating, cooling) = triangle();
        let curve = build_profile(
            PressureSettings::default(),
            &[],
            &[SwitchPoint::new(1000.0, 760.0), SwitchPoint::new(950.0, 40.0)],
            &heating,
            &cooling,
            1000.0,
        )
        .unwrap();
        // 760 Torr is reached 2.53 h after the hold ends, long after 950 C
        // is passed at 3.33 h, so 40 Torr is taken over without a hold.
        let n = curve.len();
        assert_eq!(curve.values[n - 1], 40.0);
        assert_eq!(curve.values[n - 2], 40.0);
        assert!((curve.times[n - 2] - (3.0 + 760.0 / 300.0)).abs() < 1e-12);
        assert!(!curve.values.contains(&760.0));
        assert!(curve.times.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_conflicting_heating_points() {
        let (heating, cooling) = triangle();
        let err = build_profile(
            PressureSettings::default(),
            &[SwitchPoint::new(300.0, 760.0), SwitchPoint::new(400.0, 0.0)],
            &[],
            &heating,
            &cooling,
            1000.0,
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::SchedulingConflict { .. }));
    }
}

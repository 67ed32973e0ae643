// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Cooldown curve synthesis from the calibration tables.
//!
//! A leg is sampled in calibration time and mapped back through the table,
//! so the returned shape follows the measured curve rather than a straight
//! line between the end temperatures.

use crate::calibration::{CurveInterpolator, Phase};
use crate::curve::Curve;
use crate::error::ProfileError;

/// Number of samples in every cooling leg.
pub const SAMPLES_PER_LEG: usize = 20;

/// Builds cooling legs and composite passive-then-active cooldowns.
#[derive(Debug, Clone, Copy)]
pub struct CoolingCurveSynthesizer<'a> {
    interpolator: &'a CurveInterpolator,
}

impl<'a> CoolingCurveSynthesizer<'a> {
    pub fn new(interpolator: &'a CurveInterpolator) -> Self {
        Self { interpolator }
    }

    /// Sample one phase's cooling from `start_temp` to `end_temp`, with the
    /// first sample placed at `start_time`.
    ///
    /// Always returns [`SAMPLES_PER_LEG`] points. Fails with
    /// [`ProfileError::OutOfDomain`] if either temperature is outside the
    /// phase's calibration.
    pub fn sample_leg(
        &self,
        start_temp: f64,
        end_temp: f64,
        start_time: f64,
        phase: Phase,
    ) -> Result<Curve, ProfileError> {
        let start_hours = self.interpolator.time_at_temperature(start_temp, phase)?;
        let end_hours = self.interpolator.time_at_temperature(end_temp, phase)?;
        let step = (end_hours - start_hours) / (SAMPLES_PER_LEG - 1) as f64;

        let mut leg = Curve::new();
        for i in 0..SAMPLES_PER_LEG {
            let hours = if i == SAMPLES_PER_LEG - 1 {
                end_hours
            } else {
                start_hours + step * i as f64
            };
            let temp = self.interpolator.temperature_at_time(hours, phase)?;
            leg.push(hours - start_hours + start_time, temp);
        }

        log::debug!(
            "{phase:?} leg {start_temp:.1}->{end_temp:.1} C over {:.3} h from t={start_time:.3}",
            end_hours - start_hours
        );
        Ok(leg)
    }

    /// Full cooldown from `start_temp` to `end_temp`.
    ///
    /// Above `max_active_cooling_temp` only passive cooling is allowed; the
    /// curve cools passively down to that temperature and then actively the
    /// rest of the way. The splice sample appears once.
    pub fn composite_cooldown(
        &self,
        start_temp: f64,
        end_temp: f64,
        start_time: f64,
        max_active_cooling_temp: f64,
    ) -> Result<Curve, ProfileError> {
        if end_temp >= start_temp {
            log::warn!(
                "End temperature {end_temp:.1} C is not below {start_temp:.1} C, no cooldown"
            );
            return Ok(Curve::from_parts(vec![start_time], vec![start_temp]));
        }

        if max_active_cooling_temp >= start_temp {
            return self.sample_leg(start_temp, end_temp, start_time, Phase::Active);
        }

        // Never cool passively past the requested end temperature.
        let passive_end = max_active_cooling_temp.max(end_temp);
        let mut cooldown = self.sample_leg(start_temp, passive_end, start_time, Phase::Passive)?;
        if passive_end <= end_temp {
            return Ok(cooldown);
        }

        let (splice_time, splice_temp) = cooldown
            .last()
            .unwrap_or((start_time, passive_end));
        let active = self.sample_leg(splice_temp, end_temp, splice_time, Phase::Active)?;
        cooldown.splice(active);
        Ok(cooldown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_leg_has_fixed_sample_count() {
        let interp = CurveInterpolator::default();
        let synth = CoolingCurveSynthesizer::new(&interp);
        let leg = synth.sample_leg(1000.0, 150.0, 3.5, Phase::Active).unwrap();
        assert_eq!(leg.len(), SAMPLES_PER_LEG);
        assert_eq!(leg.times[0], 3.5);
        assert!((leg.values[0] - 1000.0).abs() < TOL);
        assert!((leg.values[SAMPLES_PER_LEG - 1] - 150.0).abs() < TOL);
    }

    #[test]
    fn test_leg_follows_calibration_not_a_line() {
        let interp = CurveInterpolator::default();
        let synth = CoolingCurveSynthesizer::new(&interp);
        let leg = synth.sample_leg(1254.27, 52.47, 0.0, Phase::Passive).unwrap();
        // Passive cooling is fast early and slow late, so the midpoint sample
        // sits well below the straight-line midpoint.
        let mid = leg.values[SAMPLES_PER_LEG / 2];
        assert!(mid < (1254.27 + 52.47) / 2.0);
        assert!(leg.times.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_leg_out_of_domain() {
        let interp = CurveInterpolator::default();
        let synth = CoolingCurveSynthesizer::new(&interp);
        assert!(matches!(
            synth.sample_leg(500.0, -25.0, 0.0, Phase::Active),
            Err(ProfileError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_composite_splices_passive_then_active() {
        let interp = CurveInterpolator::default();
        let synth = CoolingCurveSynthesizer::new(&interp);

        let passive = synth.sample_leg(900.0, 600.0, 5.0, Phase::Passive).unwrap();
        let (splice_time, splice_temp) = passive.last().unwrap();
        let active = synth
            .sample_leg(splice_temp, 150.0, splice_time, Phase::Active)
            .unwrap();
        assert_eq!(active.times[0], splice_time);

        let curve = synth.composite_cooldown(900.0, 150.0, 5.0, 600.0).unwrap();
        assert_eq!(curve.len(), 2 * SAMPLES_PER_LEG - 1);
        assert_eq!(curve.times[0], 5.0);
        assert_eq!(curve.times[SAMPLES_PER_LEG - 1], splice_time);
        assert!(curve.times.windows(2).all(|w| w[1] > w[0]));
        assert!(curve.values.windows(2).all(|w| w[1] < w[0] + TOL));
        assert!(curve.values.iter().all(|&t| t <= 900.0 + TOL && t >= 150.0 - TOL));
    }

    #[test]
    fn test_composite_active_only_below_threshold() {
        let interp = CurveInterpolator::default();
        let synth = CoolingCurveSynthesizer::new(&interp);
        let curve = synth.composite_cooldown(900.0, 150.0, 2.0, 1050.0).unwrap();
        let leg = synth.sample_leg(900.0, 150.0, 2.0, Phase::Active).unwrap();
        assert_eq!(curve, leg);
    }

    #[test]
    fn test_composite_passive_only_when_end_above_threshold() {
        let interp = CurveInterpolator::default();
        let synth = CoolingCurveSynthesizer::new(&interp);
        let curve = synth.composite_cooldown(900.0, 400.0, 0.0, 300.0).unwrap();
        assert_eq!(curve.len(), SAMPLES_PER_LEG);
        assert!((curve.values[SAMPLES_PER_LEG - 1] - 400.0).abs() < TOL);
    }

    #[test]
    fn test_composite_nothing_to_cool() {
        let interp = CurveInterpolator::default();
        let synth = CoolingCurveSynthesizer::new(&interp);
        let curve = synth.composite_cooldown(100.0, 150.0, 4.0, 1050.0).unwrap();
        assert_eq!(curve.times, vec![4.0]);
        assert_eq!(curve.values, vec![100.0]);
    }
}

//! # Solar Array Model
//!
//! Synthetic illumination model for a low-Earth-orbit solar panel.
//! Irradiance is a sharp step function of orbital phase (no eclipse
//! transition modeling) and the incidence angle sweeps sinusoidally
//! across one orbit.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// LEO orbit period in seconds (~90 min)
pub const ORBIT_PERIOD_S: f64 = 5400.0;

/// Solar constant at 1 AU in W/m²
pub const SOLAR_CONSTANT_W_M2: f64 = 1361.0;

/// Fraction of the orbit spent in sunlight
pub const ILLUMINATED_FRACTION: f64 = 0.6;

/// Solar panel construction errors
#[derive(Debug, Error)]
pub enum SolarPanelError {
    #[error("invalid solar panel parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Solar panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarPanelConfig {
    /// Theoretical maximum panel output (W); generated power is capped here
    pub max_power_w: f64,
    /// Panel conversion efficiency (0.0-1.0]
    pub efficiency: f64,
    /// Panel area in m²
    pub area_m2: f64,
}

impl Default for SolarPanelConfig {
    fn default() -> Self {
        Self {
            max_power_w: 10.0,
            efficiency: 0.2,
            area_m2: 0.1,
        }
    }
}

/// Solar array generation model
///
/// Immutable after construction. Output is purely a function of elapsed
/// time, so it supports arbitrary re-evaluation and out-of-order calls.
#[derive(Debug, Clone)]
pub struct SolarPanel {
    config: SolarPanelConfig,
}

impl SolarPanel {
    pub fn new(config: SolarPanelConfig) -> Result<Self, SolarPanelError> {
        if !config.max_power_w.is_finite() || config.max_power_w <= 0.0 {
            return Err(SolarPanelError::InvalidParameter {
                name: "max_power_w",
                value: config.max_power_w,
            });
        }
        if !config.efficiency.is_finite() || config.efficiency <= 0.0 || config.efficiency > 1.0 {
            return Err(SolarPanelError::InvalidParameter {
                name: "efficiency",
                value: config.efficiency,
            });
        }
        if !config.area_m2.is_finite() || config.area_m2 <= 0.0 {
            return Err(SolarPanelError::InvalidParameter {
                name: "area_m2",
                value: config.area_m2,
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolarPanelConfig {
        &self.config
    }

    /// Orbital phase in seconds, folded into [0, ORBIT_PERIOD_S).
    ///
    /// `rem_euclid` keeps the fold correct for negative times.
    fn orbital_phase_s(time_s: f64) -> f64 {
        time_s.rem_euclid(ORBIT_PERIOD_S)
    }

    /// Step-function irradiance: full solar constant on the illuminated
    /// arc of the orbit, zero in eclipse.
    fn irradiance_w_m2(time_s: f64) -> f64 {
        if Self::orbital_phase_s(time_s) < ILLUMINATED_FRACTION * ORBIT_PERIOD_S {
            SOLAR_CONSTANT_W_M2
        } else {
            0.0
        }
    }

    /// Sun incidence angle in radians, |π/2 · sin(2π·phase/period)|.
    ///
    /// Computed from orbital phase alone, independent of the illumination
    /// flag; in eclipse the irradiance is zero so the angle is moot.
    fn incidence_angle_rad(time_s: f64) -> f64 {
        let phase = Self::orbital_phase_s(time_s);
        (PI / 2.0 * (2.0 * PI * phase / ORBIT_PERIOD_S).sin()).abs()
    }

    /// Instantaneous generated power (W) at `time_s` seconds since the
    /// start of the simulation. Always within `[0, max_power_w]`.
    pub fn power_output(&self, time_s: f64) -> f64 {
        let irradiance = Self::irradiance_w_m2(time_s);
        let theta = Self::incidence_angle_rad(time_s);
        let power = self.config.efficiency * self.config.area_m2 * irradiance * theta.cos();
        power.clamp(0.0, self.config.max_power_w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_panel() -> SolarPanel {
        SolarPanel::new(SolarPanelConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad_eff = SolarPanelConfig {
            efficiency: 1.5,
            ..Default::default()
        };
        assert!(SolarPanel::new(bad_eff).is_err());

        let bad_area = SolarPanelConfig {
            area_m2: 0.0,
            ..Default::default()
        };
        assert!(SolarPanel::new(bad_area).is_err());

        let bad_power = SolarPanelConfig {
            max_power_w: -10.0,
            ..Default::default()
        };
        assert!(SolarPanel::new(bad_power).is_err());
    }

    #[test]
    fn test_peak_output_is_capped_at_max_power() {
        let panel = default_panel();
        // At t=0 the incidence angle is zero, so the raw output would be
        // 0.2 * 0.1 * 1361 = 27.2 W, well above the 10 W cap.
        assert_eq!(panel.power_output(0.0), 10.0);
    }

    #[test]
    fn test_eclipse_produces_zero_power() {
        let panel = default_panel();
        // Illuminated arc ends at 0.6 * 5400 = 3240 s.
        assert_eq!(panel.power_output(3240.0), 0.0);
        assert_eq!(panel.power_output(4000.0), 0.0);
        assert_eq!(panel.power_output(5399.0), 0.0);
    }

    #[test]
    fn test_grazing_incidence_yields_near_zero_power() {
        let panel = default_panel();
        // Quarter orbit: sin term peaks, incidence angle hits 90 degrees.
        assert!(panel.power_output(ORBIT_PERIOD_S / 4.0) < 1e-10);
    }

    #[test]
    fn test_periodicity_holds_for_negative_times() {
        let panel = default_panel();
        assert_eq!(
            panel.power_output(-ORBIT_PERIOD_S + 100.0),
            panel.power_output(100.0)
        );
        assert_eq!(
            panel.power_output(-3.0 * ORBIT_PERIOD_S + 500.0),
            panel.power_output(500.0)
        );
    }

    #[test]
    fn test_output_bounds_over_full_orbit() {
        let panel = default_panel();
        let max = panel.config().max_power_w;
        for i in 0..540 {
            let t = i as f64 * 10.0;
            let p = panel.power_output(t);
            assert!(p >= 0.0 && p <= max, "power {} out of bounds at t={}", p, t);
        }
    }
}

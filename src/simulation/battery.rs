//! # Battery Model
//!
//! Tracks battery state of charge (SOC) against rated capacity via a
//! pluggable estimation method. Coulomb counting is implemented; the
//! Kalman and H-infinity estimators are declared but fail fast with an
//! explicit error instead of silently leaving SOC unchanged.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Battery errors: invalid construction parameters or an estimation
/// method that has no implementation yet.
#[derive(Debug, Error)]
pub enum BatteryError {
    #[error("invalid battery parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("SOC estimation method '{0}' is not implemented")]
    UnsupportedMethod(SocMethod),
}

/// SOC estimation method
///
/// Closed enumeration of update strategies. `Coulomb` is the only
/// implemented variant; `Kalman` and `HInfinity` surface
/// [`BatteryError::UnsupportedMethod`] when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SocMethod {
    Coulomb,
    Kalman,
    HInfinity,
}

/// Battery pack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Rated design capacity (Ah)
    pub capacity_ah: f64,
    /// Nominal pack voltage (V)
    pub voltage_v: f64,
    /// Initial state of charge, 0.0-1.0
    pub soc_initial: f64,
    /// Charge efficiency (0.0-1.0]
    pub charge_eff: f64,
    /// Discharge efficiency (0.0-1.0]
    pub discharge_eff: f64,
    /// SOC estimation method
    pub method: SocMethod,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_ah: 50.0,
            voltage_v: 12.0,
            soc_initial: 0.5,
            charge_eff: 0.95,
            discharge_eff: 0.95,
            method: SocMethod::Coulomb,
        }
    }
}

/// Battery pack with mutable SOC state
///
/// Constructed once, mutated once per simulation step by
/// [`Battery::update_soc`]. SOC is clamped to [0, 1] after every update
/// regardless of method; hitting a bound is saturation (physical
/// full/empty limit), not an error.
#[derive(Debug, Clone)]
pub struct Battery {
    config: BatteryConfig,
    soc: f64,
}

impl Battery {
    pub fn new(config: BatteryConfig) -> Result<Self, BatteryError> {
        if !config.capacity_ah.is_finite() || config.capacity_ah <= 0.0 {
            return Err(BatteryError::InvalidParameter {
                name: "capacity_ah",
                value: config.capacity_ah,
            });
        }
        if !config.voltage_v.is_finite() || config.voltage_v <= 0.0 {
            return Err(BatteryError::InvalidParameter {
                name: "voltage_v",
                value: config.voltage_v,
            });
        }
        if !config.soc_initial.is_finite() || !(0.0..=1.0).contains(&config.soc_initial) {
            return Err(BatteryError::InvalidParameter {
                name: "soc_initial",
                value: config.soc_initial,
            });
        }
        if !config.charge_eff.is_finite() || config.charge_eff <= 0.0 || config.charge_eff > 1.0 {
            return Err(BatteryError::InvalidParameter {
                name: "charge_eff",
                value: config.charge_eff,
            });
        }
        if !config.discharge_eff.is_finite()
            || config.discharge_eff <= 0.0
            || config.discharge_eff > 1.0
        {
            return Err(BatteryError::InvalidParameter {
                name: "discharge_eff",
                value: config.discharge_eff,
            });
        }

        let soc = config.soc_initial;
        Ok(Self { config, soc })
    }

    pub fn config(&self) -> &BatteryConfig {
        &self.config
    }

    /// Current state of charge, 0.0-1.0
    pub fn soc(&self) -> f64 {
        self.soc
    }

    /// Apply the charge/discharge efficiency split to a raw pack current.
    ///
    /// Charging current (positive) is derated by the charge efficiency;
    /// discharging (or zero) current is inflated by the discharge
    /// efficiency, so the pack loses energy in both directions.
    pub fn effective_current_a(&self, current_a: f64) -> f64 {
        if current_a > 0.0 {
            current_a * self.config.charge_eff
        } else {
            current_a / self.config.discharge_eff
        }
    }

    /// Update SOC from the net pack current over an elapsed interval.
    ///
    /// `current_a` is the raw net current (positive = charging),
    /// `dt_s` the caller-supplied elapsed seconds since the previous
    /// update (there is no internal clock). `voltage_v` feeds the
    /// voltage-based estimators and is ignored by coulomb counting.
    ///
    /// On error the SOC is left untouched.
    pub fn update_soc(
        &mut self,
        current_a: f64,
        dt_s: f64,
        _voltage_v: Option<f64>,
    ) -> Result<(), BatteryError> {
        if !dt_s.is_finite() || dt_s < 0.0 {
            return Err(BatteryError::InvalidParameter {
                name: "dt_s",
                value: dt_s,
            });
        }

        match self.config.method {
            SocMethod::Coulomb => {
                self.update_coulomb(current_a, dt_s);
                Ok(())
            }
            method => Err(BatteryError::UnsupportedMethod(method)),
        }
    }

    /// Coulomb counting: integrate the effective current against rated
    /// capacity. The 3600 factor converts seconds to hours to match the
    /// amp-hour capacity unit.
    fn update_coulomb(&mut self, current_a: f64, dt_s: f64) {
        let effective = self.effective_current_a(current_a);
        self.soc += effective * dt_s / (self.config.capacity_ah * SECONDS_PER_HOUR);
        self.soc = self.soc.clamp(0.0, 1.0);
    }

    /// Available energy in Wh
    pub fn energy_available_wh(&self) -> f64 {
        self.soc * self.config.capacity_ah * self.config.voltage_v
    }

    /// Remaining capacity in Ah
    pub fn capacity_remaining_ah(&self) -> f64 {
        self.soc * self.config.capacity_ah
    }
}

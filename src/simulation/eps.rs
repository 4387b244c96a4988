//! # EPS Simulation Loop
//!
//! Couples the solar array, battery, and power manager over a fixed
//! time grid and produces a uniformly-sampled [`SimulationTrace`]. The
//! trace is the sole output handed to the external reporting layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

use super::battery::{Battery, BatteryError};
use super::power::PowerManager;
use super::solar::SolarPanel;

/// Simulation loop errors
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("battery update failed at t={time_s}s")]
    Battery {
        time_s: f64,
        #[source]
        source: BatteryError,
    },
}

/// One sample of the simulation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Elapsed simulation time (s)
    pub t_s: f64,
    /// Solar array output (W)
    pub power_generated_w: f64,
    /// Battery state of charge, 0.0-1.0
    pub soc: f64,
    /// Generated current at pack voltage (A)
    pub current_generated_a: f64,
    /// Constant total load current at pack voltage (A)
    pub current_load_a: f64,
    /// Per-subsystem on/off state reported by the power manager
    pub subsystem_on: BTreeMap<String, bool>,
}

/// Time-ordered, append-only sequence of trace records
pub type SimulationTrace = Vec<TraceRecord>;

/// CubeSat EPS simulator
///
/// Deterministic fold over a finite time grid: identical inputs always
/// produce an identical trace. Single-threaded, no I/O inside the loop.
pub struct EpsSimulator {
    battery: Battery,
    panel: SolarPanel,
    manager: PowerManager,
}

impl EpsSimulator {
    pub fn new(battery: Battery, panel: SolarPanel, manager: PowerManager) -> Self {
        Self {
            battery,
            panel,
            manager,
        }
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Run the simulation over an inclusive, evenly spaced time grid
    /// from 0 to `total_duration_s` with step `time_step_s` (grid length
    /// `floor(total/step) + 1`).
    ///
    /// Load semantics: the total static subsystem load is treated as
    /// always fully drawn for SOC-update purposes. The power manager's
    /// per-step allocation is recorded in the trace for reporting but
    /// does not feed back into the SOC update.
    pub fn run(
        &mut self,
        total_duration_s: f64,
        time_step_s: f64,
    ) -> Result<SimulationTrace, SimulationError> {
        if !time_step_s.is_finite() || time_step_s <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "time_step_s",
                value: time_step_s,
            });
        }
        if !total_duration_s.is_finite() || total_duration_s < 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "total_duration_s",
                value: total_duration_s,
            });
        }

        let steps = (total_duration_s / time_step_s).floor() as usize;
        let pack_voltage_v = self.battery.config().voltage_v;

        // Generation is independent of battery and load state, so the
        // whole profile can be precomputed up front.
        let power_generated_w: Vec<f64> = (0..=steps)
            .map(|i| self.panel.power_output(i as f64 * time_step_s))
            .collect();

        // Total static load, converted to a constant current on the pack.
        let current_load_a = self.manager.total_load_w() / pack_voltage_v;

        info!(
            total_duration_s,
            time_step_s,
            grid_points = steps + 1,
            current_load_a,
            "starting EPS simulation run"
        );

        let mut trace = Vec::with_capacity(steps + 1);
        trace.push(TraceRecord {
            t_s: 0.0,
            power_generated_w: power_generated_w[0],
            soc: self.battery.soc(),
            current_generated_a: power_generated_w[0] / pack_voltage_v,
            current_load_a,
            subsystem_on: self.manager.all_off(),
        });

        for i in 1..=steps {
            let t_s = i as f64 * time_step_s;
            let current_generated_a = power_generated_w[i] / pack_voltage_v;
            let net_current_a = current_generated_a - current_load_a;

            self.battery
                .update_soc(net_current_a, time_step_s, None)
                .map_err(|source| SimulationError::Battery { time_s: t_s, source })?;

            // The allocator sees the efficiency-adjusted net current on
            // the distribution bus, as a power budget.
            let effective_net_a = self.battery.effective_current_a(net_current_a);
            let subsystem_on = self
                .manager
                .allocate(effective_net_a * self.manager.bus_voltage_v());

            debug!(t_s, soc = self.battery.soc(), net_current_a, "simulation step");

            trace.push(TraceRecord {
                t_s,
                power_generated_w: power_generated_w[i],
                soc: self.battery.soc(),
                current_generated_a,
                current_load_a,
                subsystem_on,
            });
        }

        info!(
            records = trace.len(),
            final_soc = self.battery.soc(),
            "EPS simulation run complete"
        );
        Ok(trace)
    }
}

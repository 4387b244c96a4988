//! # EPS Simulation Module
//!
//! Discrete-time simulation of a CubeSat electrical power system.
//!
//! ## Components
//!
//! - **Solar**: synthetic LEO illumination model with a sinusoidal incidence-angle sweep
//! - **Battery**: SOC tracking via coulomb counting with charge/discharge efficiency split
//! - **Power**: priority-based load shedding across the subsystem table
//! - **Eps**: the simulation loop coupling the three over a fixed time grid
//!
//! ## Usage
//!
//! ```rust
//! use cubesat_eps::simulation::{
//!     Battery, BatteryConfig, EpsSimulator, PowerManager, PowerManagerConfig,
//!     SolarPanel, SolarPanelConfig,
//! };
//!
//! let battery = Battery::new(BatteryConfig::default()).unwrap();
//! let panel = SolarPanel::new(SolarPanelConfig::default()).unwrap();
//! let manager = PowerManager::new(PowerManagerConfig::default()).unwrap();
//!
//! let mut sim = EpsSimulator::new(battery, panel, manager);
//! let trace = sim.run(5400.0, 60.0).unwrap();
//! assert_eq!(trace.len(), 91);
//! ```

pub mod battery;
pub mod eps;
pub mod power;
pub mod solar;

pub use battery::{Battery, BatteryConfig, BatteryError, SocMethod};
pub use eps::{EpsSimulator, SimulationError, SimulationTrace, TraceRecord};
pub use power::{
    PowerManager, PowerManagerConfig, PowerManagerError, PriorityPolicy, StaticRankPolicy,
    Subsystem,
};
pub use solar::{SolarPanel, SolarPanelConfig, SolarPanelError};

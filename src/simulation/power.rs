//! # Power Manager
//!
//! Allocates an available power budget to subsystems by fixed priority
//! ordering (priority shedding). Allocation is a pure function of the
//! subsystem table and the budget; there is no hysteresis or memory of
//! previous allocations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Power manager construction errors
#[derive(Debug, Error)]
pub enum PowerManagerError {
    #[error("invalid power manager parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("duplicate subsystem name: {0}")]
    DuplicateSubsystem(String),
}

/// A single switchable load on the power bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subsystem {
    /// Unique subsystem name
    pub name: String,
    /// Power draw when on (W)
    pub power_draw_w: f64,
    /// Priority rank; lower = higher priority
    pub priority: u32,
}

impl Subsystem {
    pub fn new(name: impl Into<String>, power_draw_w: f64, priority: u32) -> Self {
        Self {
            name: name.into(),
            power_draw_w,
            priority,
        }
    }
}

/// Power manager configuration: bus voltage plus the static subsystem
/// table. An explicit value handed to the constructor, never shared
/// module state, so independent simulations can use independent tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerManagerConfig {
    /// Nominal bus voltage of the power distribution rail (V)
    pub bus_voltage_v: f64,
    pub subsystems: Vec<Subsystem>,
}

impl Default for PowerManagerConfig {
    fn default() -> Self {
        Self {
            bus_voltage_v: 8.2,
            subsystems: vec![
                Subsystem::new("Communications", 7.0, 1),
                Subsystem::new("Cameras", 5.0, 2),
                Subsystem::new("Thermal Control", 2.0, 3),
                Subsystem::new("Sensors", 1.0, 4),
            ],
        }
    }
}

/// Ordering policy for shedding decisions
///
/// Injectable so mission-phase reprioritization can be plugged in later
/// without touching the allocation loop itself.
pub trait PriorityPolicy: Send + Sync {
    /// Return subsystem indices in allocation order (first = served first).
    fn order(&self, subsystems: &[Subsystem]) -> Vec<usize>;
}

/// Static rank ordering from the subsystem table. Ranks are unique by
/// construction; if they ever collide, name order breaks the tie so the
/// result stays deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRankPolicy;

impl PriorityPolicy for StaticRankPolicy {
    fn order(&self, subsystems: &[Subsystem]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..subsystems.len()).collect();
        indices.sort_by(|&a, &b| {
            subsystems[a]
                .priority
                .cmp(&subsystems[b].priority)
                .then_with(|| subsystems[a].name.cmp(&subsystems[b].name))
        });
        indices
    }
}

/// Priority-based power allocator
pub struct PowerManager {
    config: PowerManagerConfig,
    policy: Box<dyn PriorityPolicy>,
}

impl PowerManager {
    pub fn new(config: PowerManagerConfig) -> Result<Self, PowerManagerError> {
        Self::with_policy(config, Box::new(StaticRankPolicy))
    }

    pub fn with_policy(
        config: PowerManagerConfig,
        policy: Box<dyn PriorityPolicy>,
    ) -> Result<Self, PowerManagerError> {
        if !config.bus_voltage_v.is_finite() || config.bus_voltage_v <= 0.0 {
            return Err(PowerManagerError::InvalidParameter {
                name: "bus_voltage_v",
                value: config.bus_voltage_v,
            });
        }

        let mut seen = HashSet::new();
        for subsystem in &config.subsystems {
            if !subsystem.power_draw_w.is_finite() || subsystem.power_draw_w < 0.0 {
                return Err(PowerManagerError::InvalidParameter {
                    name: "power_draw_w",
                    value: subsystem.power_draw_w,
                });
            }
            if !seen.insert(subsystem.name.as_str()) {
                return Err(PowerManagerError::DuplicateSubsystem(
                    subsystem.name.clone(),
                ));
            }
        }

        Ok(Self { config, policy })
    }

    pub fn bus_voltage_v(&self) -> f64 {
        self.config.bus_voltage_v
    }

    pub fn subsystems(&self) -> &[Subsystem] {
        &self.config.subsystems
    }

    /// Static sum of all subsystem draws (W)
    pub fn total_load_w(&self) -> f64 {
        self.config.subsystems.iter().map(|s| s.power_draw_w).sum()
    }

    /// Map with every subsystem off, used as the simulation seed state.
    pub fn all_off(&self) -> BTreeMap<String, bool> {
        self.config
            .subsystems
            .iter()
            .map(|s| (s.name.clone(), false))
            .collect()
    }

    /// Greedy first-fit allocation by priority order.
    ///
    /// Walks the subsystems in policy order and turns each one on only
    /// if its full draw fits in the remaining budget. A skipped
    /// subsystem is never retried, and lower-priority subsystems never
    /// see the budget a skipped one would have used. A negative budget
    /// (net deficit, e.g. in eclipse) turns everything off.
    pub fn allocate(&self, available_power_w: f64) -> BTreeMap<String, bool> {
        let mut state = self.all_off();
        let mut budget = available_power_w;

        for index in self.policy.order(&self.config.subsystems) {
            let subsystem = &self.config.subsystems[index];
            if budget >= subsystem.power_draw_w {
                state.insert(subsystem.name.clone(), true);
                budget -= subsystem.power_draw_w;
            }
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_manager() -> PowerManager {
        PowerManager::new(PowerManagerConfig::default()).unwrap()
    }

    fn on_names(state: &BTreeMap<String, bool>) -> Vec<&str> {
        state
            .iter()
            .filter(|(_, &on)| on)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad_voltage = PowerManagerConfig {
            bus_voltage_v: 0.0,
            ..Default::default()
        };
        assert!(PowerManager::new(bad_voltage).is_err());

        let negative_draw = PowerManagerConfig {
            bus_voltage_v: 8.2,
            subsystems: vec![Subsystem::new("Comms", -7.0, 1)],
        };
        assert!(PowerManager::new(negative_draw).is_err());

        let duplicate = PowerManagerConfig {
            bus_voltage_v: 8.2,
            subsystems: vec![
                Subsystem::new("Comms", 7.0, 1),
                Subsystem::new("Comms", 5.0, 2),
            ],
        };
        assert!(matches!(
            PowerManager::new(duplicate),
            Err(PowerManagerError::DuplicateSubsystem(_))
        ));
    }

    #[test]
    fn test_zero_budget_turns_everything_off() {
        let manager = default_manager();
        let state = manager.allocate(0.0);
        assert!(state.values().all(|&on| !on));
        assert_eq!(state.len(), 4);
    }

    #[test]
    fn test_negative_budget_turns_everything_off() {
        let manager = default_manager();
        let state = manager.allocate(-3.5);
        assert!(state.values().all(|&on| !on));
    }

    #[test]
    fn test_first_fit_skips_without_retry() {
        // 9 W budget: Communications (7 W) fits leaving 2 W, Cameras
        // (5 W) is skipped, Thermal Control (2 W) fits leaving 0 W,
        // Sensors (1 W) is skipped.
        let manager = default_manager();
        let state = manager.allocate(9.0);
        assert_eq!(on_names(&state), vec!["Communications", "Thermal Control"]);
    }

    #[test]
    fn test_full_budget_turns_everything_on() {
        let manager = default_manager();
        let state = manager.allocate(15.0);
        assert!(state.values().all(|&on| on));
    }

    #[test]
    fn test_allocated_power_never_exceeds_budget() {
        let manager = default_manager();
        for budget in [0.0, 1.0, 2.9, 7.0, 9.0, 12.5, 15.0, 100.0] {
            let state = manager.allocate(budget);
            let allocated: f64 = manager
                .subsystems()
                .iter()
                .filter(|s| state[&s.name])
                .map(|s| s.power_draw_w)
                .sum();
            assert!(
                allocated <= budget + 1e-9,
                "allocated {} exceeds budget {}",
                allocated,
                budget
            );
        }
    }

    #[test]
    fn test_rank_collision_falls_back_to_name_order() {
        let config = PowerManagerConfig {
            bus_voltage_v: 8.2,
            subsystems: vec![
                Subsystem::new("Beta", 5.0, 1),
                Subsystem::new("Alpha", 5.0, 1),
            ],
        };
        let manager = PowerManager::new(config).unwrap();
        let state = manager.allocate(5.0);
        assert_eq!(on_names(&state), vec!["Alpha"]);
    }

    #[test]
    fn test_total_load() {
        assert_eq!(default_manager().total_load_w(), 15.0);
    }
}

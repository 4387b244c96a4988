use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::simulation::{BatteryConfig, PowerManagerConfig, SolarPanelConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub battery: BatteryConfig,
    pub solar: SolarPanelConfig,
    pub power: PowerManagerConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub total_duration_s: f64,
    pub time_step_s: f64,
    /// Where to write the JSON trace; stdout when unset
    pub trace_path: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("EPS__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SocMethod;

    #[test]
    fn test_default_toml_parses() {
        let config: Config = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .extract()
            .unwrap();

        assert_eq!(config.battery.capacity_ah, 50.0);
        assert_eq!(config.battery.method, SocMethod::Coulomb);
        assert_eq!(config.solar.max_power_w, 10.0);
        assert_eq!(config.power.bus_voltage_v, 8.2);
        assert_eq!(config.power.subsystems.len(), 4);
        assert_eq!(config.run.time_step_s, 60.0);
    }
}

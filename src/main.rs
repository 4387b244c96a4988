use anyhow::{Context, Result};
use cubesat_eps::config::Config;
use cubesat_eps::simulation::{Battery, EpsSimulator, PowerManager, SolarPanel};
use cubesat_eps::telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let battery = Battery::new(cfg.battery)?;
    let panel = SolarPanel::new(cfg.solar)?;
    let manager = PowerManager::new(cfg.power)?;

    let mut sim = EpsSimulator::new(battery, panel, manager);
    let trace = sim.run(cfg.run.total_duration_s, cfg.run.time_step_s)?;

    let json = serde_json::to_string_pretty(&trace)?;
    match cfg.run.trace_path {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing trace to {path}"))?;
            info!(%path, records = trace.len(), "trace written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

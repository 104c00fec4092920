//! Headless runner: builds a world and logs population statistics.
//!
//! Usage: `gridlife [ticks] [params.json] [world.json]`

use std::path::Path;

use gridlife::Result;
use gridlife::simulation::context::SimulationContext;
use gridlife::simulation::params::SimParams;
use gridlife::simulation::world::{World, WorldConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_TICKS: u64 = 5000;
const REPORT_EVERY: u64 = 500;

fn load_world_config(path: &Path) -> Result<WorldConfig> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    let ticks = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICKS);
    let params = match args.get(2) {
        Some(path) => SimParams::load_from_file(path)?,
        None => SimParams::default(),
    };
    let config = match args.get(3) {
        Some(path) => load_world_config(Path::new(path))?,
        None => WorldConfig::default(),
    };

    let mut world = World::new(&config, SimulationContext::new(params))?;
    info!(ticks, "starting simulation");

    for _ in 0..ticks {
        world.update();

        if world.tick % REPORT_EVERY == 0 {
            let max_generation = world
                .creatures
                .iter()
                .map(|c| c.generation)
                .max()
                .unwrap_or(0);
            let mean_energy = if world.creatures.is_empty() {
                0.0
            } else {
                world.creatures.iter().map(|c| c.energy).sum::<f32>() / world.creatures.len() as f32
            };
            info!(
                tick = world.tick,
                population = world.creatures.len(),
                foods = world.foods.len(),
                max_generation,
                mean_energy,
                "population report"
            );
        }

        if world.creatures.is_empty() {
            info!(tick = world.tick, "population went extinct");
            break;
        }
    }

    for (generation, mean_age) in world.ctx.telemetry.mean_age_at_death_by_generation() {
        info!(generation, mean_age, "mean age at death");
    }

    Ok(())
}

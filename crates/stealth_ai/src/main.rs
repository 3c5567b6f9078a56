//! Headless симуляция StealthAI
//!
//! Guard патрулирует, intruder бродит (seeded RNG), логируются переходы FSM.

use std::path::PathBuf;

use clap::Parser;
use stealth_ai::logger::{init_logger, set_log_level, LogLevel};
use stealth_ai::{run_patrol_scenario, AgentConfig, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "stealth_ai", about = "Headless stealth NPC simulation")]
struct Args {
    /// Seed для intruder RNG
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Количество тиков (60 тиков = 1 секунда)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// TOML с AgentConfig (недостающие поля = defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Только info и выше (без debug переходов)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), ConfigError> {
    let args = Args::parse();

    init_logger();
    if args.quiet {
        set_log_level(LogLevel::Info);
    }

    let config = match &args.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };

    println!(
        "Starting StealthAI headless simulation (seed: {}, ticks: {})",
        args.seed, args.ticks
    );

    let summary = run_patrol_scenario(args.seed, args.ticks, config);

    println!(
        "Spotted: {}, lost: {}, caught: {}, abandoned: {}, waypoints: {}",
        summary.spotted, summary.lost, summary.caught, summary.abandoned, summary.waypoints_reached
    );
    println!("Final: {}", summary.snapshot);
    println!("Simulation complete!");

    Ok(())
}

mod logging;
mod replay;
mod scenario;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bubble_logging::bubble_info;
use bubble_runtime::BubbleSettings;
use clap::Parser;
use log::LevelFilter;

use logging::LogDestination;
use replay::{Replay, TimeMode};

/// Replays a scripted status sequence through one message bubble and prints
/// every frame it renders.
#[derive(Debug, Parser)]
#[command(name = "bubble-replay", version)]
struct Cli {
    /// Scenario file (RON).
    scenario: PathBuf,
    /// Run on simulated time instead of waiting in real time.
    #[arg(long)]
    simulated: bool,
    /// Override the scenario's tick interval, in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Where log records go.
    #[arg(long, value_enum, default_value = "terminal")]
    log: LogDestination,
    /// Log file used by the `file` and `both` destinations.
    #[arg(long, default_value = "./bubble.log")]
    log_file: PathBuf,
    /// Log level filter.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level, &cli.log_file);

    let scenario = scenario::load_scenario(&cli.scenario)
        .with_context(|| format!("loading {}", cli.scenario.display()))?;

    let mut settings = BubbleSettings::default();
    if let Some(ms) = cli.tick_ms.or(scenario.tick_interval_ms) {
        settings.tick_interval = Duration::from_millis(ms.max(1));
    }
    let mode = if cli.simulated {
        TimeMode::Simulated
    } else {
        TimeMode::Real
    };
    bubble_info!(
        "replaying {} steps, tick every {:?}",
        scenario.steps.len(),
        settings.tick_interval
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    Replay::new(settings, mode, &mut out).run(&scenario)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for survival sessions.

mod autopilot;
mod config;
mod report;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use survival_presentation::SignalLog;
use survival_simulation::Simulation;
use tracing::info;
use tracing_subscriber::EnvFilter;

use autopilot::Autopilot;
use report::Report;

/// Runs a survival session without a display, driven by a simple autopilot.
#[derive(Debug, Parser)]
#[command(name = "survival-sim", version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed shared by every random stream of the session.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 6000)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = config::load(args.config.as_deref())?;
    let log = SignalLog::new();
    let mut simulation = Simulation::new(settings, args.seed)
        .context("settings rejected")?
        .with_scene_sink(log.clone())
        .with_audio_sink(log.clone());
    simulation.start();

    let tick = Duration::from_millis(args.tick_ms);
    let mut autopilot = Autopilot::new();
    let mut elapsed_ticks = 0;
    while elapsed_ticks < args.ticks && !simulation.is_game_over() {
        autopilot.drive(&mut simulation);
        simulation.tick_duration(tick);
        elapsed_ticks += 1;
    }
    info!(ticks = elapsed_ticks, "run finished");

    let report = Report::capture(&simulation, &autopilot, &log, elapsed_ticks);
    println!("{report}");

    let _ = simulation.teardown();
    Ok(())
}

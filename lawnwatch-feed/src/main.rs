use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use lawnwatch_core::{LawnConfig, write_record_atomic};
use lawnwatch_feed::SweepPlan;
use log::{info, warn};

#[derive(Parser)]
#[command(about = "Writes a simulated row-by-row mowing run into a position file")]
struct Cli {
    /// TOML file with lawn settings, shared with the viewer
    #[arg(long)]
    config: Option<PathBuf>,
    /// Record file to overwrite on every step
    #[arg(long)]
    position_file: Option<PathBuf>,
    /// Delay between records in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Distance between lanes; defaults to the mowing width
    #[arg(long)]
    lane_spacing: Option<f64>,
    /// Distance covered per record
    #[arg(long, default_value_t = 0.1)]
    step: f64,
    /// Battery percent used per unit travelled
    #[arg(long, default_value_t = 0.4)]
    drain: f64,
    /// Random offset applied to mowing positions, in world units
    #[arg(long, default_value_t = 0.0)]
    jitter: f64,
    /// Seed for the jitter generator
    #[arg(long)]
    seed: Option<u64>,
}

fn build_plan(cli: &Cli, config: &LawnConfig) -> Result<SweepPlan> {
    let mowing_width = 2.0 * config.mow_half_width as f64 * config.resolution;
    let lane_spacing = cli.lane_spacing.unwrap_or(mowing_width);
    ensure!(lane_spacing > 0.0, "lane spacing must be positive, got {lane_spacing}");
    ensure!(cli.step > 0.0, "step must be positive, got {}", cli.step);
    ensure!(cli.jitter >= 0.0, "jitter must not be negative");
    ensure!(
        cli.drain >= 0.0 && cli.drain.is_finite(),
        "drain must be a finite non-negative number, got {}",
        cli.drain
    );

    Ok(SweepPlan {
        width: config.width,
        height: config.height,
        lane_spacing,
        cell_size: config.resolution,
        step: cli.step,
        dock: config.dock,
        drain_per_unit: cli.drain,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => LawnConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LawnConfig::default(),
    };
    if let Some(path) = &cli.position_file {
        config.position_file = path.clone();
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.refresh_interval_ms = interval_ms;
    }
    config.validate().context("invalid settings")?;

    let plan = build_plan(&cli, &config)?;
    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let states = plan.states(&mut rng, cli.jitter);
    info!(
        "feeding {} records over {} lanes into {}",
        states.len(),
        plan.lane_ys().len(),
        config.position_file.display()
    );

    let interval = config.refresh_interval();
    let mut last_status = String::new();
    for state in &states {
        if state.status != last_status {
            info!("{} (battery {:.1}%)", state.status, state.battery_pct);
            last_status.clone_from(&state.status);
        }
        if let Err(err) = write_record_atomic(&config.position_file, state) {
            warn!("{err}");
        }
        thread::sleep(interval);
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lawnwatch_core::LawnConfig;
use lawnwatch_view_lib::{raster_dimensions, run, window_conf};
use macroquad::Window;

#[derive(Parser)]
#[command(about = "Live lawn coverage view fed by a mower position file")]
struct Cli {
    /// TOML file with lawn and viewer settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Record file written by the mower controller
    #[arg(long)]
    position_file: Option<PathBuf>,
    /// Refresh period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
}

fn load_config(cli: &Cli) -> Result<LawnConfig> {
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
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let (rows, cols) = config.grid_dimensions()?;
    raster_dimensions(rows, cols)?;

    Window::from_config(window_conf(), run(config));
    Ok(())
}

/*
 * ASCII Flock Viewer
 *
 * Opens a window that draws the flock's density field as ASCII art. Move the
 * mouse to scare (or feed) the flock, click to drop a crumb.
 *
 * Keys: Space pauses, R resets, D toggles the debug overlay.
 * Logging follows RUST_LOG, e.g. `RUST_LOG=ascii_flock=debug`.
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ascii_flock::app::{self, Launch};
use ascii_flock::{FlockConfig, Preset, DEFAULT_COLS};

#[derive(Parser, Debug)]
#[command(name = "ascii-flock")]
#[command(about = "Boid flocking drawn as an ASCII density field")]
struct Cli {
    /// Starting preset: background, predator, crumbs or foraging
    #[arg(short, long, default_value = "background")]
    preset: Preset,

    /// TOML file with parameters; replaces the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of agents
    #[arg(short, long)]
    agents: Option<usize>,

    /// Grid columns across the window
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    #[arg(long, default_value_t = 1024)]
    width: u32,

    #[arg(long, default_value_t = 640)]
    height: u32,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FlockConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => cli.preset.config(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(agents) = cli.agents {
        config.agent_count = agents;
    }
    config.validate().context("invalid flock parameters")?;
    anyhow::ensure!(cli.cols > 0, "--cols must be at least 1");

    info!(preset = %cli.preset, agents = config.agent_count, cols = cli.cols, "starting viewer");
    app::run(Launch {
        config,
        preset: cli.preset,
        cols: cli.cols,
        width: cli.width,
        height: cli.height,
    });
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

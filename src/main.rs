//! Gate Runner entry point
//!
//! Parses flags, loads config and the ship sprite, then runs the frame loop
//! in the terminal until the player quits.

use std::io::{BufWriter, stdout};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use gate_runner::GameConfig;
use gate_runner::assets::{AssetPolicy, DirImageProvider, load_ship_sprite};
use gate_runner::driver::{Driver, SystemClock};
use gate_runner::sim::GameState;
use gate_runner::term::{TerminalInput, TerminalSession, TerminalSink};

#[derive(Parser)]
#[command(name = "gate-runner")]
#[command(about = "Flap a ship through an endless stream of gates")]
struct Args {
    /// JSON config file; missing fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gate generator seed (defaults to the current time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fail at startup when the ship sprite is missing instead of using the placeholder
    #[arg(long)]
    strict_assets: bool,

    /// Directory to search for `ship.json` (repeatable, searched in order)
    #[arg(long = "asset-dir")]
    asset_dirs: Vec<PathBuf>,

    /// Override the target frame rate
    #[arg(long)]
    fps: Option<u32>,
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    // Logs go to stderr; redirect it (2>gate-runner.log) when raising RUST_LOG
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.target_fps = fps;
        config.validate().context("applying --fps")?;
    }

    let provider = if args.asset_dirs.is_empty() {
        DirImageProvider::default()
    } else {
        DirImageProvider::new(args.asset_dirs.clone())
    };
    let policy = if args.strict_assets {
        AssetPolicy::Strict
    } else {
        AssetPolicy::Tolerant
    };
    let sprite = load_ship_sprite(&provider, policy, config.ship_w, config.ship_h)
        .context("loading ship sprite")?;

    let seed = args.seed.unwrap_or_else(time_seed);
    let state = GameState::new(config, sprite, seed).context("building game")?;
    log::info!("Gate Runner starting (seed {seed})");

    let mut driver = Driver::new(state);
    let run = {
        let _session = TerminalSession::enter().context("entering terminal mode")?;
        let mut input = TerminalInput::spawn();
        let mut sink = TerminalSink::new(BufWriter::new(stdout()));
        driver.run(&mut input, &mut SystemClock::default(), &mut sink)
    }
    .context("running game loop")?;

    println!("Best score: {}", run.best);
    Ok(())
}

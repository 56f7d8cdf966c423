//! Application entry point for the 3D SCA tree viewer.
//!
//! Parses the command line, installs logging, loads the growth config and
//! either opens the interactive [`Viewer`] or grows one tree headless.

mod cli;
mod viewer;

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use sca3d_core::{GrowthConfig, GrowthController};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::CliArgs;
use viewer::Viewer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    init_logging(args.log_level.as_deref());

    let mut config = match &args.config {
        Some(path) => GrowthConfig::load(path)?,
        None => GrowthConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "starting");

    if args.headless {
        return run_headless(config, seed);
    }

    let viewer = Viewer::new(config, seed)?;
    eframe::run_native(
        "3D SCA Tree",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(viewer))),
    )?;
    Ok(())
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, then `level`, then `info`.
fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Grows, simplifies and measures one tree without opening a window.
fn run_headless(config: GrowthConfig, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut controller = GrowthController::new(config, &mut rng)?;

    let ticks = controller.run_to_completion();
    let grown = controller.tree().len();
    let removed = controller.reduce();
    let body = controller.body();
    let trunk_radius = body.first().map_or(0.0, |s| s.radius);

    info!(
        ticks,
        grown,
        removed,
        segments = body.len(),
        trunk_radius,
        points_left = controller.field().len(),
        "headless growth done"
    );
    Ok(())
}

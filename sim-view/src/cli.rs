//! Command-line arguments for the viewer.

use std::path::PathBuf;

use clap::Parser;
use sca3d_core::{GrowthConfig, Tropism};

/// CLI values override settings loaded from `--config`.
#[derive(Parser, Debug)]
#[command(name = "sca3d", about = "3D space-colonization tree growth")]
pub struct CliArgs {
    /// Path to a RON growth config.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for attraction point sampling (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Grow one tree to completion and log a summary instead of opening a window.
    #[arg(long)]
    pub headless: bool,

    /// Number of attraction points.
    #[arg(long)]
    pub points: Option<usize>,

    /// Tropism variant.
    #[arg(long, value_parser = parse_tropism)]
    pub tropism: Option<Tropism>,

    /// Log filter (error, warn, info, debug, trace), overridden by RUST_LOG.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    pub fn apply_overrides(&self, config: &mut GrowthConfig) {
        if let Some(points) = self.points {
            config.attraction_points = points;
        }
        if let Some(tropism) = self.tropism {
            config.tropism = tropism;
        }
    }
}

fn parse_tropism(s: &str) -> Result<Tropism, String> {
    match s.to_ascii_lowercase().as_str() {
        "none" => Ok(Tropism::None),
        "gravity" => Ok(Tropism::Gravity),
        "radial" | "radial-attract" => Ok(Tropism::RadialAttract),
        "spin" => Ok(Tropism::Spin),
        other => Err(format!(
            "unknown tropism `{other}`, expected none, gravity, radial or spin"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_values() {
        let args = CliArgs::parse_from(["sca3d", "--points", "50", "--tropism", "Spin"]);
        let mut config = GrowthConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.attraction_points, 50);
        assert_eq!(config.tropism, Tropism::Spin);
        assert_eq!(config.kill_distance, GrowthConfig::default().kill_distance);
        assert!(!args.headless);
    }

    #[test]
    fn unknown_tropism_is_rejected() {
        assert!(CliArgs::try_parse_from(["sca3d", "--tropism", "wind"]).is_err());
        assert_eq!(parse_tropism("radial"), Ok(Tropism::RadialAttract));
    }
}

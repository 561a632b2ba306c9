//! Command-line argument parsing for the biome tools.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Biome map command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nebula-biomemap", about = "Render a biome map for a world seed")]
pub struct CliArgs {
    /// World seed.
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// World X of the left edge of the map.
    #[arg(long, allow_hyphen_values = true)]
    pub min_x: Option<i32>,

    /// World Z of the top edge of the map.
    #[arg(long, allow_hyphen_values = true)]
    pub min_z: Option<i32>,

    /// Number of tiles across.
    #[arg(long)]
    pub tiles_x: Option<usize>,

    /// Number of tiles down.
    #[arg(long)]
    pub tiles_z: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(x) = args.min_x {
            self.map.min_x = x;
        }
        if let Some(z) = args.min_z {
            self.map.min_z = z;
        }
        if let Some(tiles) = args.tiles_x {
            self.map.tiles_x = tiles;
        }
        if let Some(tiles) = args.tiles_z {
            self.map.tiles_z = tiles;
        }
        if let Some(ref path) = args.output {
            self.map.output = path.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

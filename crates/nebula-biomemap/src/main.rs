//! Renders a biome map PNG for a world seed.

mod map;

use clap::Parser;
use nebula_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    nebula_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match map::run(&config) {
        Ok(summary) => info!(
            path = %config.map.output.display(),
            width = summary.width,
            height = summary.height,
            biomes = summary.distinct_biomes,
            "wrote biome map"
        ),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}

//! Configuration for the Nebula biome tools.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the
//! command line via clap, and are validated against the layer pipeline's
//! own parameter checks before use.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, MapConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;

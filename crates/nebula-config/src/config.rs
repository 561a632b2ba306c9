//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use nebula_layers::{DEFAULT_TILE_SIZE, LayerParams};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World identity.
    pub world: WorldConfig,
    /// Biome chain parameters.
    pub layers: LayerParams,
    /// Region rendered by the map tool.
    pub map: MapConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. The same seed always yields the same map.
    pub seed: i64,
}

/// Map tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// World X of the left edge.
    pub min_x: i32,
    /// World Z of the top edge.
    pub min_z: i32,
    /// Tiles across.
    pub tiles_x: usize,
    /// Tiles down.
    pub tiles_z: usize,
    /// Edge length of one tile in world columns.
    pub tile_size: usize,
    /// Shared tile cache capacity (0 = disabled).
    pub cache_tiles: usize,
    /// Worker threads (0 = one per CPU).
    pub threads: usize,
    /// Output PNG path. Relative paths resolve against the working directory.
    pub output: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_x: -256,
            min_z: -256,
            tiles_x: 32,
            tiles_z: 32,
            tile_size: DEFAULT_TILE_SIZE,
            cache_tiles: 0,
            threads: 0,
            output: PathBuf::from("biomes.png"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the biome tools, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nebula-biomes"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Checks the layer parameters and the map region.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layers.validate()?;
        if self.map.tile_size == 0 {
            return Err(ConfigError::InvalidMap("tile_size must be non-zero"));
        }
        if self.map.tiles_x == 0 || self.map.tiles_z == 0 {
            return Err(ConfigError::InvalidMap("tiles_x and tiles_z must be non-zero"));
        }
        let pixels_x = self.map.tiles_x.checked_mul(self.map.tile_size);
        let pixels_z = self.map.tiles_z.checked_mul(self.map.tile_size);
        let fits = match (pixels_x, pixels_z) {
            (Some(w), Some(h)) => {
                u32::try_from(w).is_ok()
                    && u32::try_from(h).is_ok()
                    && w.checked_mul(h).and_then(|cells| cells.checked_mul(4)).is_some()
            }
            _ => false,
        };
        if fits {
            Ok(())
        } else {
            Err(ConfigError::InvalidMap("map is too large"))
        }
    }
}

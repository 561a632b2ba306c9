//! Region resolution and PNG output.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use nebula_config::{Config, ConfigError};
use nebula_layers::debug_viz::{DebugImage, render_biome_map};
use nebula_layers::{BiomePipeline, BuildError, Grid, PipelineBuilder};
use tracing::{debug, info};

/// Errors that stop the map tool.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pipeline rejected the configured chain.
    #[error("failed to build pipeline: {0}")]
    Build(#[from] BuildError),

    /// The output file could not be created.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The image does not fit the PNG size fields.
    #[error("map of {width}x{height} pixels is too large to encode")]
    TooLarge {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },

    /// PNG encoding failed.
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
}

/// What was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapSummary {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of distinct biome ids on the map.
    pub distinct_biomes: usize,
}

/// Validates `config` and builds the pipeline it describes.
pub fn build_pipeline(config: &Config) -> Result<BiomePipeline, MapError> {
    config.validate()?;
    let pipeline = PipelineBuilder::new(config.world.seed)
        .params(config.layers.clone())
        .tile_size(config.map.tile_size, config.map.tile_size)
        .cache(config.map.cache_tiles)
        .build()?;
    Ok(pipeline)
}

/// Resolves the configured region.
pub fn resolve(pipeline: &BiomePipeline, config: &Config) -> Grid {
    let map = &config.map;
    let grid = if map.threads == 0 {
        pipeline.resolve_region(map.min_x, map.min_z, map.tiles_x, map.tiles_z)
    } else {
        pipeline.resolve_region_with_threads(map.min_x, map.min_z, map.tiles_x, map.tiles_z, map.threads)
    };
    debug!(cached_tiles = pipeline.cached_tiles(), "region resolved");
    grid
}

/// Encodes `image` as an 8-bit RGBA PNG at `path`, creating parent directories.
pub fn write_png(path: &Path, image: &DebugImage) -> Result<(), MapError> {
    let (width, height) = png_size(image)?;
    let io_error = |source| MapError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.pixels)?;
    writer.finish()?;
    Ok(())
}

fn png_size(image: &DebugImage) -> Result<(u32, u32), MapError> {
    match (u32::try_from(image.width), u32::try_from(image.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(MapError::TooLarge {
            width: image.width,
            height: image.height,
        }),
    }
}

/// Builds, resolves, renders and writes the configured map.
pub fn run(config: &Config) -> Result<MapSummary, MapError> {
    let pipeline = build_pipeline(config)?;
    info!(
        seed = config.world.seed,
        min_x = config.map.min_x,
        min_z = config.map.min_z,
        tiles_x = config.map.tiles_x,
        tiles_z = config.map.tiles_z,
        "rendering biome map"
    );
    let grid = resolve(&pipeline, config);
    let image = render_biome_map(&grid);
    write_png(&config.map.output, &image)?;
    let (width, height) = png_size(&image)?;

    Ok(MapSummary {
        width,
        height,
        distinct_biomes: grid.values().iter().collect::<HashSet<_>>().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(output: PathBuf) -> Config {
        let mut config = Config::default();
        config.world.seed = 5;
        config.map.min_x = -8;
        config.map.min_z = 24;
        config.map.tiles_x = 3;
        config.map.tiles_z = 2;
        config.map.tile_size = 8;
        config.map.threads = 2;
        config.map.output = output;
        config
    }

    #[test]
    fn test_run_writes_a_decodable_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("maps").join("seed5.png");
        let summary = run(&small_config(output.clone())).unwrap();
        assert_eq!((summary.width, summary.height), (24, 16));
        assert!(summary.distinct_biomes >= 1);

        let decoder = png::Decoder::new(File::open(&output).unwrap());
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 24);
        assert_eq!(reader.info().height, 16);
        assert_eq!(reader.info().color_type, png::ColorType::Rgba);
    }

    #[test]
    fn test_region_matches_single_tiles() {
        let config = small_config(PathBuf::from("unused.png"));
        let pipeline = build_pipeline(&config).unwrap();
        let region = resolve(&pipeline, &config);
        let tile = pipeline.resolve(0, 32);
        assert_eq!(region.sub_grid(8, 8, 8, 8), tile);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut config = small_config(PathBuf::from("unused.png"));
        config.layers.land_threshold_percent = 250;
        assert!(matches!(build_pipeline(&config), Err(MapError::Config(_))));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_oversized_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("huge.png");
        let image = DebugImage {
            width: u32::MAX as usize + 1,
            height: 1,
            pixels: Vec::new(),
        };
        assert!(matches!(
            write_png(&output, &image),
            Err(MapError::TooLarge { height: 1, .. })
        ));
        assert!(!output.exists());
    }
}

//! Configuration error types.

use nebula_layers::BuildError;

/// Errors that can occur when loading, saving, parsing, or validating
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// Layer parameters were rejected by the pipeline.
    #[error("invalid layer parameters: {0}")]
    Invalid(#[from] BuildError),

    /// A map setting is unusable.
    #[error("invalid map settings: {0}")]
    InvalidMap(&'static str),
}

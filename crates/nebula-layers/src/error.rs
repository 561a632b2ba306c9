//! Construction-time errors.
//!
//! Queries never fail: once a pipeline is built, every coordinate resolves.
//! All wiring and tunable problems surface here instead.

use crate::stage::Alphabet;

/// Errors raised while wiring stages or validating tunables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An upstream produces values the stage cannot interpret.
    #[error("{stage}: upstream produces {found} values but {expected} values are required")]
    AlphabetMismatch {
        /// Stage being wired.
        stage: &'static str,
        /// Alphabet the stage reads.
        expected: Alphabet,
        /// Alphabet the upstream writes.
        found: Alphabet,
    },

    /// An upstream tile has the wrong size for the stage's halo.
    #[error(
        "{stage}: upstream tile is {found_width}x{found_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        /// Stage being wired.
        stage: &'static str,
        /// Required upstream width.
        expected_width: usize,
        /// Required upstream height.
        expected_height: usize,
        /// Actual upstream width.
        found_width: usize,
        /// Actual upstream height.
        found_height: usize,
    },

    /// A percentage or permille tunable is outside its range.
    #[error("{name} must be within 0..={max}, got {value}")]
    OutOfRange {
        /// Tunable name.
        name: &'static str,
        /// Offending value.
        value: i32,
        /// Inclusive upper bound (lower bound is 0).
        max: i32,
    },

    /// A uniform choice stage was given a non-positive range.
    #[error("choice range must be positive, got {0}")]
    InvalidRange(i32),

    /// A biome group has nothing to materialise into.
    #[error("empty {} candidate list for the {group} group", rare_label(.rare))]
    EmptyCandidateList {
        /// Group name.
        group: &'static str,
        /// Whether the rare list is the empty one.
        rare: bool,
    },

    /// A configured replacement value is not part of the stage's alphabet.
    #[error("{stage}: value {value} is not part of the {alphabet} alphabet")]
    ValueOutsideAlphabet {
        /// Stage being configured.
        stage: &'static str,
        /// Offending value.
        value: i32,
        /// Alphabet the value was checked against.
        alphabet: Alphabet,
    },

    /// A stage was asked for an empty tile.
    #[error("tile size must be non-zero, got {width}x{height}")]
    ZeroTileSize {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A chain has no stages.
    #[error("stage chain is empty")]
    EmptyChain,

    /// A chain does not begin with a source stage.
    #[error("stage chain must start with a source stage, found {0}")]
    MissingSource(&'static str),

    /// A source stage appears after the first position.
    #[error("source stage {0} may only appear first in a chain")]
    MisplacedSource(&'static str),
}

fn rare_label(rare: &bool) -> &'static str {
    if *rare { "rare" } else { "normal" }
}

/// Checks a per-mille chance.
pub(crate) fn check_permille(name: &'static str, value: i32) -> Result<i32, BuildError> {
    if (0..=1000).contains(&value) {
        Ok(value)
    } else {
        Err(BuildError::OutOfRange {
            name,
            value,
            max: 1000,
        })
    }
}

/// Checks a percentage.
pub(crate) fn check_percent(name: &'static str, value: i32) -> Result<i32, BuildError> {
    if (0..=100).contains(&value) {
        Ok(value)
    } else {
        Err(BuildError::OutOfRange {
            name,
            value,
            max: 100,
        })
    }
}

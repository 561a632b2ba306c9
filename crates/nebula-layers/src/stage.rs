//! The stage abstraction shared by every grid generator.
//!
//! A stage produces a fixed-size [`Grid`] for any anchor coordinate by pulling
//! a (possibly larger, possibly half-resolution) tile from the upstream stages
//! it owns. Tile sizes are runtime fields checked once when a stage is wired;
//! after that, `generate` cannot fail.

use std::fmt;

use crate::biome::{Biome, is_biome_id, is_group, is_rare_group};
use crate::error::BuildError;
use crate::grid::Grid;

/// The set of values a stage reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alphabet {
    /// Arbitrary region ids (uniform choice output, alteration masks).
    Region,
    /// Biome group ids, `0..=4`.
    Group,
    /// Group ids that may carry the rare flag.
    RareGroup,
    /// Final biome identifiers.
    Biome,
    /// River markers: `0` or the river biome id.
    River,
}

impl Alphabet {
    /// Returns `true` if a stage reading `self` can consume values written
    /// in `found`.
    pub fn accepts(self, found: Alphabet) -> bool {
        match self {
            Self::Region => true,
            Self::RareGroup => matches!(found, Self::Group | Self::RareGroup),
            other => other == found,
        }
    }

    /// Returns `true` if `value` is a legal member of this alphabet.
    pub fn contains(self, value: i32) -> bool {
        match self {
            Self::Region => true,
            Self::Group => is_group(value),
            Self::RareGroup => is_rare_group(value),
            Self::Biome => is_biome_id(value),
            Self::River => value == 0 || value == Biome::River.id(),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Region => "region",
            Self::Group => "group",
            Self::RareGroup => "rare group",
            Self::Biome => "biome",
            Self::River => "river",
        })
    }
}

/// A node in the generation chain.
///
/// Implementations are immutable after construction and hold no per-call
/// state, so a single instance may be queried from any number of threads.
pub trait GridGenerator: Send + Sync {
    /// Short stage name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Width of every tile this stage produces.
    fn width(&self) -> usize;

    /// Height of every tile this stage produces.
    fn height(&self) -> usize;

    /// Alphabet of the values this stage writes.
    fn alphabet(&self) -> Alphabet;

    /// Produces the tile whose top-left cell is the world column `(min_x, min_z)`.
    fn generate(&self, min_x: i32, min_z: i32) -> Grid;
}

/// An owned, type-erased stage.
pub type BoxedGenerator = Box<dyn GridGenerator>;

/// Upstream size needed by a stage that inspects the four direct neighbours.
#[inline]
pub const fn neighborhood_dims(width: usize, height: usize) -> (usize, usize) {
    (width + 2, height + 2)
}

/// Upstream size needed by a resolution-doubling stage.
#[inline]
pub const fn zoom_dims(width: usize, height: usize) -> (usize, usize) {
    (width / 2 + 2, height / 2 + 2)
}

/// Rejects a configured value the stage could never legally emit.
pub(crate) fn check_value(
    stage: &'static str,
    alphabet: Alphabet,
    value: i32,
) -> Result<i32, BuildError> {
    if alphabet.contains(value) {
        Ok(value)
    } else {
        Err(BuildError::ValueOutsideAlphabet {
            stage,
            value,
            alphabet,
        })
    }
}

/// Rejects empty tiles.
pub(crate) fn check_tile_size(width: usize, height: usize) -> Result<(), BuildError> {
    if width == 0 || height == 0 {
        return Err(BuildError::ZeroTileSize { width, height });
    }
    Ok(())
}

/// Validates that `upstream` produces `width × height` tiles in an alphabet
/// `expected` accepts.
pub(crate) fn check_upstream(
    stage: &'static str,
    upstream: &dyn GridGenerator,
    (width, height): (usize, usize),
    expected: Alphabet,
) -> Result<(), BuildError> {
    if upstream.width() != width || upstream.height() != height {
        return Err(BuildError::DimensionMismatch {
            stage,
            expected_width: width,
            expected_height: height,
            found_width: upstream.width(),
            found_height: upstream.height(),
        });
    }
    if !expected.accepts(upstream.alphabet()) {
        return Err(BuildError::AlphabetMismatch {
            stage,
            expected,
            found: upstream.alphabet(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_compatibility() {
        assert!(Alphabet::Region.accepts(Alphabet::Biome));
        assert!(Alphabet::RareGroup.accepts(Alphabet::Group));
        assert!(!Alphabet::Group.accepts(Alphabet::RareGroup));
        assert!(!Alphabet::Group.accepts(Alphabet::Biome));
        assert!(!Alphabet::Biome.accepts(Alphabet::River));
        assert!(Alphabet::River.accepts(Alphabet::River));
    }

    #[test]
    fn test_alphabet_membership() {
        assert!(Alphabet::Group.contains(4));
        assert!(!Alphabet::Group.contains(1024 | 4));
        assert!(Alphabet::RareGroup.contains(1024 | 4));
        assert!(Alphabet::Biome.contains(Biome::MesaPlateauM.id()));
        assert!(!Alphabet::Biome.contains(40));
        assert!(Alphabet::River.contains(7));
        assert!(!Alphabet::River.contains(11));
        assert!(Alphabet::Region.contains(-12));
        assert!(check_value("test", Alphabet::Group, 5).is_err());
    }

    #[test]
    fn test_halo_dims() {
        assert_eq!(neighborhood_dims(16, 16), (18, 18));
        assert_eq!(zoom_dims(16, 16), (10, 10));
        assert_eq!(zoom_dims(7, 5), (5, 4));
    }

    #[test]
    fn test_zero_tile_rejected() {
        assert!(check_tile_size(0, 4).is_err());
        assert!(check_tile_size(4, 4).is_ok());
    }
}

//! Synthetic stages for unit tests.

use crate::grid::Grid;
use crate::stage::{Alphabet, BoxedGenerator, GridGenerator};

/// A source whose cells are an arbitrary function of the world column.
pub(crate) struct FnSource<F> {
    width: usize,
    height: usize,
    alphabet: Alphabet,
    f: F,
}

impl<F> FnSource<F>
where
    F: Fn(i32, i32) -> i32 + Send + Sync + 'static,
{
    pub(crate) fn boxed(
        (width, height): (usize, usize),
        alphabet: Alphabet,
        f: F,
    ) -> BoxedGenerator {
        Box::new(Self {
            width,
            height,
            alphabet,
            f,
        })
    }
}

impl<F> GridGenerator for FnSource<F>
where
    F: Fn(i32, i32) -> i32 + Send + Sync,
{
    fn name(&self) -> &'static str {
        "fn_source"
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        Grid::from_fn(min_x, min_z, self.width, self.height, |x, z| {
            (self.f)(min_x + x as i32, min_z + z as i32)
        })
    }
}

/// A source that returns the same value everywhere.
pub(crate) fn constant(dims: (usize, usize), alphabet: Alphabet, value: i32) -> BoxedGenerator {
    FnSource::boxed(dims, alphabet, move |_, _| value)
}

//! Row-major tile of classification values anchored at a world column.

/// A `width × height` tile of `i32` cells whose top-left cell sits at the
/// world column `(min_x, min_z)`.
///
/// Cells are stored row-major: `values[x + z * width]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    min_x: i32,
    min_z: i32,
    width: usize,
    height: usize,
    values: Vec<i32>,
}

impl Grid {
    /// Creates a zero-filled grid.
    pub fn new(min_x: i32, min_z: i32, width: usize, height: usize) -> Self {
        Self {
            min_x,
            min_z,
            width,
            height,
            values: vec![0; width * height],
        }
    }

    /// Creates a grid by evaluating `f(x, z)` for every local cell.
    pub fn from_fn(
        min_x: i32,
        min_z: i32,
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> i32,
    ) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for z in 0..height {
            for x in 0..width {
                values.push(f(x, z));
            }
        }
        Self {
            min_x,
            min_z,
            width,
            height,
            values,
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != width * height`.
    pub fn from_values(
        min_x: i32,
        min_z: i32,
        width: usize,
        height: usize,
        values: Vec<i32>,
    ) -> Self {
        assert_eq!(
            values.len(),
            width * height,
            "grid buffer length does not match {width}x{height}"
        );
        Self {
            min_x,
            min_z,
            width,
            height,
            values,
        }
    }

    /// World X of the left column.
    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// World Z of the top row.
    #[inline]
    pub fn min_z(&self) -> i32 {
        self.min_z
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Value at local coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `z >= height`.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> i32 {
        debug_assert!(x < self.width && z < self.height);
        self.values[x + z * self.width]
    }

    /// Overwrites the value at local coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `z >= height`.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: i32) {
        debug_assert!(x < self.width && z < self.height);
        self.values[x + z * self.width] = value;
    }

    /// Returns `true` if the world column lies inside this grid.
    pub fn contains_world(&self, world_x: i32, world_z: i32) -> bool {
        self.local_index(world_x, world_z).is_some()
    }

    /// Value at a world column, or `None` outside the grid.
    pub fn get_world(&self, world_x: i32, world_z: i32) -> Option<i32> {
        self.local_index(world_x, world_z)
            .map(|(x, z)| self.values[x + z * self.width])
    }

    /// World coordinates wrap at the `i32` boundary, so a grid anchored near
    /// `i32::MAX` continues at `i32::MIN`.
    fn local_index(&self, world_x: i32, world_z: i32) -> Option<(usize, usize)> {
        let dx = world_x.wrapping_sub(self.min_x) as u32 as usize;
        let dz = world_z.wrapping_sub(self.min_z) as u32 as usize;
        (dx < self.width && dz < self.height).then_some((dx, dz))
    }

    /// Row-major cell values.
    #[inline]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Mutable row-major cell values.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [i32] {
        &mut self.values
    }

    /// Consumes the grid, returning its buffer.
    pub fn into_values(self) -> Vec<i32> {
        self.values
    }

    /// One row of the grid.
    pub fn row(&self, z: usize) -> &[i32] {
        let start = z * self.width;
        &self.values[start..start + self.width]
    }

    /// Copies a window out of this grid. `(x, z)` is the local top-left corner.
    ///
    /// # Panics
    ///
    /// Panics if the window extends past the grid.
    pub fn sub_grid(&self, x: usize, z: usize, width: usize, height: usize) -> Grid {
        assert!(
            x + width <= self.width && z + height <= self.height,
            "window {width}x{height} at ({x}, {z}) exceeds {}x{}",
            self.width,
            self.height
        );
        let mut values = Vec::with_capacity(width * height);
        for row in z..z + height {
            let start = x + row * self.width;
            values.extend_from_slice(&self.values[start..start + width]);
        }
        Grid {
            min_x: self.min_x.wrapping_add(x as i32),
            min_z: self.min_z.wrapping_add(z as i32),
            width,
            height,
            values,
        }
    }

    /// Copies `tile` into this grid at its world position.
    ///
    /// # Panics
    ///
    /// Panics if `tile` is not fully contained in this grid.
    pub fn paste(&mut self, tile: &Grid) {
        let origin = self
            .local_index(tile.min_x, tile.min_z)
            .filter(|&(x0, z0)| x0 + tile.width <= self.width && z0 + tile.height <= self.height);
        let Some((x0, z0)) = origin else {
            panic!(
                "{}x{} tile at ({}, {}) does not fit in the target grid",
                tile.width, tile.height, tile.min_x, tile.min_z
            );
        };
        for z in 0..tile.height {
            let dst = x0 + (z0 + z) * self.width;
            self.values[dst..dst + tile.width].copy_from_slice(tile.row(z));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid = Grid::new(-3, 7, 4, 2);
        assert_eq!(grid.dimensions(), (4, 2));
        assert!(grid.values().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_fn(0, 0, 3, 2, |x, z| (x + 10 * z) as i32);
        assert_eq!(grid.values(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(grid.get(2, 1), 12);
        assert_eq!(grid.row(1), &[10, 11, 12]);
    }

    #[test]
    fn test_world_lookup() {
        let grid = Grid::from_fn(-2, -2, 4, 4, |x, z| (x * 4 + z) as i32);
        assert_eq!(grid.get_world(0, 0), Some(grid.get(2, 2)));
        assert_eq!(grid.get_world(-3, 0), None);
        assert_eq!(grid.get_world(2, 0), None);
        assert!(grid.contains_world(1, 1));
        assert!(!grid.contains_world(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_sub_grid_and_paste() {
        let source = Grid::from_fn(10, 20, 6, 5, |x, z| (x * 100 + z) as i32);
        let window = source.sub_grid(2, 1, 3, 3);
        assert_eq!(window.min_x(), 12);
        assert_eq!(window.min_z(), 21);
        assert_eq!(window.get(0, 0), source.get(2, 1));
        assert_eq!(window.get(2, 2), source.get(4, 3));

        let mut target = Grid::new(10, 20, 6, 5);
        target.paste(&window);
        assert_eq!(target.get_world(13, 22), source.get_world(13, 22));
        assert_eq!(target.get(0, 0), 0);
    }

    #[test]
    fn test_world_lookup_wraps_at_i32_boundary() {
        let grid = Grid::from_fn(i32::MAX - 1, 0, 4, 1, |x, _| x as i32);
        assert_eq!(grid.get_world(i32::MAX, 0), Some(1));
        assert_eq!(grid.get_world(i32::MIN, 0), Some(2));
        assert_eq!(grid.get_world(i32::MIN + 1, 0), Some(3));
        assert_eq!(grid.get_world(i32::MIN + 2, 0), None);
        assert_eq!(grid.get_world(i32::MAX - 2, 0), None);
    }

    #[test]
    fn test_paste_across_i32_boundary() {
        let mut region = Grid::new(0, i32::MAX - 3, 2, 8);
        let tail = Grid::from_fn(0, i32::MIN, 2, 4, |x, z| (x + 10 * z) as i32 + 1);
        region.paste(&tail);
        assert_eq!(region.sub_grid(0, 4, 2, 4).values(), tail.values());
        assert!(region.row(0).iter().all(|&v| v == 0));
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_paste_rejects_overhanging_tile() {
        let mut region = Grid::new(0, 0, 4, 4);
        region.paste(&Grid::new(2, 2, 4, 4));
    }

    #[test]
    #[should_panic(expected = "grid buffer length")]
    fn test_from_values_rejects_wrong_length() {
        let _ = Grid::from_values(0, 0, 2, 2, vec![1, 2, 3]);
    }
}

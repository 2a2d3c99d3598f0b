//! Fixed-size 2D grids addressed by integer (x, z) coordinates.
//!
//! The heightmap, detail layers and scratch buffers (erosion potential,
//! visited masks) are all `Tilemap`s. Unlike a planetary map there is no
//! wrapping: neighbour lookups clamp onto the border.

use crate::error::{Result, TerrainError};

/// The elevation grid every generator and eroder mutates.
pub type Heightmap = Tilemap<f32>;

/// A row-major 2D grid. `width` runs along x, `height` along z.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T> Tilemap<T> {
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn contains(&self, x: i64, z: i64) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.height
    }

    /// Reject a grid whose dimensions differ from this one.
    pub fn ensure_same_dims<U>(&self, other: &Tilemap<U>) -> Result<()> {
        if self.dims() != other.dims() {
            return Err(TerrainError::DimensionMismatch {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        Ok(())
    }

    pub fn ensure_square(&self) -> Result<()> {
        if self.width != self.height {
            return Err(TerrainError::NotSquare {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// Overwrite every cell with `T::default()`.
    pub fn reset(&mut self) {
        self.data.fill(T::default());
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a grid from row-major data.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != width * height {
            return Err(TerrainError::invalid(
                "data",
                format!("expected {} cells, got {}", width * height, data.len()),
            ));
        }
        Ok(Self { width, height, data })
    }

    fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.width && z < self.height, "({x}, {z}) out of grid");
        z * self.width + x
    }

    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.data[self.index(x, z)]
    }

    pub fn get_mut(&mut self, x: usize, z: usize) -> &mut T {
        let idx = self.index(x, z);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Copy a `width × height` block starting at (x0, z0).
    pub fn region(&self, x0: usize, z0: usize, width: usize, height: usize) -> Result<Self> {
        if x0 + width > self.width || z0 + height > self.height {
            return Err(TerrainError::invalid(
                "region",
                format!(
                    "{width}x{height} at ({x0}, {z0}) exceeds {}x{} grid",
                    self.width, self.height
                ),
            ));
        }
        let mut data = Vec::with_capacity(width * height);
        for z in z0..z0 + height {
            let start = self.index(x0, z);
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Ok(Self { width, height, data })
    }

    /// Commit a block previously taken with [`Tilemap::region`] (or computed
    /// elsewhere) back into the grid at (x0, z0).
    pub fn set_region(&mut self, x0: usize, z0: usize, block: &Tilemap<T>) -> Result<()> {
        if x0 + block.width > self.width || z0 + block.height > self.height {
            return Err(TerrainError::invalid(
                "region",
                format!(
                    "{}x{} at ({x0}, {z0}) exceeds {}x{} grid",
                    block.width, block.height, self.width, self.height
                ),
            ));
        }
        for z in 0..block.height {
            let src = z * block.width;
            let dst = self.index(x0, z0 + z);
            self.data[dst..dst + block.width].clone_from_slice(&block.data[src..src + block.width]);
        }
        Ok(())
    }

    /// The 8-connected Moore neighbourhood with offsets clamped onto the grid.
    ///
    /// Always returns eight coordinates. On edges and corners clamping folds
    /// some offsets onto the same cell (or onto (x, z) itself), so callers
    /// that need distinct neighbours use [`Tilemap::distinct_neighbors_8`].
    pub fn neighbors_8(&self, x: usize, z: usize) -> [(usize, usize); 8] {
        let max_x = self.width as i64 - 1;
        let max_z = self.height as i64 - 1;
        let mut result = [(0, 0); 8];
        let mut i = 0;

        for dz in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let nx = (x as i64 + dx).clamp(0, max_x) as usize;
                let nz = (z as i64 + dz).clamp(0, max_z) as usize;
                result[i] = (nx, nz);
                i += 1;
            }
        }

        result
    }

    /// Moore neighbours with duplicates and the cell itself removed, in
    /// row-major offset order. Corners yield 3 cells, edges 5, interior 8.
    pub fn distinct_neighbors_8(&self, x: usize, z: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(8);
        for n in self.neighbors_8(x, z) {
            if n != (x, z) && !result.contains(&n) {
                result.push(n);
            }
        }
        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(idx, val)| (idx % width, idx / width, val))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Row-major cell storage, for row-parallel passes (`par_chunks_mut(width)`).
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Tilemap<f32> {
    /// Sum of all cells, accumulated in f64.
    pub fn total(&self) -> f64 {
        self.data.iter().map(|&h| h as f64).sum()
    }

    /// (min, max) over all cells.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// Forward-difference gradient magnitude at (x, z), falling back to the
    /// backward neighbour on the upper edges.
    ///
    /// This is the steepness used when the host provides no slope query.
    pub fn steepness(&self, x: usize, z: usize) -> f32 {
        let h = *self.get(x, z);
        let nx = if x + 1 > self.width - 1 { x.saturating_sub(1) } else { x + 1 };
        let nz = if z + 1 > self.height - 1 { z.saturating_sub(1) } else { z + 1 };
        let dx = *self.get(nx, z) - h;
        let dz = *self.get(x, nz) - h;
        (dx * dx + dz * dz).sqrt()
    }
}

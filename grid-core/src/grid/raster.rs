//! In-memory grid with a complex-interleaved backing store.

use ndarray::Array2;

use crate::error::{GridFourierError, Result};
use crate::grid::geometry::GridGeometry;

/// Row/column address of the injected unit impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpikeLocation {
    pub row: usize,
    pub col: usize,
}

impl SpikeLocation {
    /// The default location: the geometric center cell of the grid.
    pub fn center(geometry: &GridGeometry) -> Self {
        Self {
            row: geometry.ny / 2,
            col: geometry.nx / 2,
        }
    }
}

/// A regular 2D grid backed by a flat sequence of interleaved
/// (real, imaginary) sample pairs.
///
/// The store is row-major over the *padded* dimensions, which start out
/// equal to the logical `nx`/`ny` and may grow via [`Grid::expand_to`] once
/// a transform plan has chosen padded sizes. The storage offset of cell
/// (row, col) is `2 * (row * nx_padded + col)`.
#[derive(Debug, Clone)]
pub struct Grid {
    geometry: GridGeometry,
    nx_padded: usize,
    ny_padded: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Create an empty grid: both channels zero everywhere.
    pub fn new(geometry: GridGeometry) -> Self {
        let (nx, ny) = (geometry.nx, geometry.ny);
        Self {
            geometry,
            nx_padded: nx,
            ny_padded: ny,
            data: vec![0.0; 2 * nx * ny],
        }
    }

    /// Create a grid whose real channel is initialized from `samples`
    /// (row-major, row 0 north) and whose imaginary channel is zero.
    pub fn from_real(geometry: GridGeometry, samples: &[f64]) -> Result<Self> {
        let expected = geometry.nx * geometry.ny;
        if samples.len() != expected {
            return Err(GridFourierError::input(format!(
                "expected {} samples for a {} x {} grid, got {}",
                expected,
                geometry.nx,
                geometry.ny,
                samples.len()
            )));
        }

        let mut grid = Self::new(geometry);
        for (node, &value) in samples.iter().enumerate() {
            grid.data[2 * node] = value;
        }
        Ok(grid)
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Current padded column count of the backing store.
    pub fn nx_padded(&self) -> usize {
        self.nx_padded
    }

    /// Current padded row count of the backing store.
    pub fn ny_padded(&self) -> usize {
        self.ny_padded
    }

    /// Storage offset of the real component of cell (row, col).
    pub fn node(&self, row: usize, col: usize) -> usize {
        2 * (row * self.nx_padded + col)
    }

    /// The interleaved backing store.
    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the interleaved backing store.
    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Set the real component of cell (row, col) to `1.0`.
    ///
    /// The location is checked against the logical grid dimensions; an
    /// out-of-range location is rejected and the store is left untouched.
    pub fn inject_impulse(&mut self, location: SpikeLocation) -> Result<()> {
        if location.row >= self.geometry.ny || location.col >= self.geometry.nx {
            return Err(GridFourierError::SpikeOutOfBounds {
                row: location.row,
                col: location.col,
                nx: self.geometry.nx,
                ny: self.geometry.ny,
            });
        }

        let node = self.node(location.row, location.col);
        self.data[node] = 1.0;
        Ok(())
    }

    /// Grow the backing store to padded dimensions chosen by a transform
    /// plan, keeping every logical sample at its (row, col) address and
    /// zero-filling the new cells.
    pub fn expand_to(&mut self, nx_padded: usize, ny_padded: usize) -> Result<()> {
        if nx_padded < self.geometry.nx || ny_padded < self.geometry.ny {
            return Err(GridFourierError::transform(format!(
                "padded dimensions {} x {} are smaller than the grid ({} x {})",
                nx_padded, ny_padded, self.geometry.nx, self.geometry.ny
            )));
        }
        if nx_padded == self.nx_padded && ny_padded == self.ny_padded {
            return Ok(());
        }

        let mut expanded = vec![0.0; 2 * nx_padded * ny_padded];
        let row_len = 2 * self.geometry.nx;
        for row in 0..self.geometry.ny {
            let src = 2 * row * self.nx_padded;
            let dst = 2 * row * nx_padded;
            expanded[dst..dst + row_len].copy_from_slice(&self.data[src..src + row_len]);
        }

        self.data = expanded;
        self.nx_padded = nx_padded;
        self.ny_padded = ny_padded;
        Ok(())
    }

    /// The real channel cropped to the logical dimensions, row-major.
    ///
    /// Padding introduced for the transform does not appear in the view.
    pub fn real_channel(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.geometry.ny, self.geometry.nx), |(row, col)| {
            self.data[self.node(row, col)]
        })
    }
}

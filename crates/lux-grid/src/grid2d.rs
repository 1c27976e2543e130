//! 2D rectangular lattice, row-major.

use crate::error::GridError;
use crate::lattice::Lattice;
use lux_core::Coord;
use smallvec::smallvec;

/// A two-dimensional rectangular lattice with uniform spacing.
///
/// Flat ranks are row-major: cell `(r, c)` has rank `r * cols + c`.
/// Axis 0 is the row direction, axis 1 the column direction. The
/// boundary layer is the outermost ring of cells.
#[derive(Debug, Clone)]
pub struct Grid2D {
    rows: u32,
    cols: u32,
    spacing: f32,
}

impl Grid2D {
    /// Maximum extent per axis: coordinates use `i32`.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a new 2D grid with `rows x cols` cells and uniform spacing.
    ///
    /// Returns `GridError::InvalidGeometry` if either dimension is zero
    /// or exceeds [`Grid2D::MAX_DIM`], if the total cell count overflows
    /// `u32`, or if `spacing` is non-finite or non-positive.
    pub fn new(rows: u32, cols: u32, spacing: f32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidGeometry {
                reason: format!("dimensions must be positive, got {rows}x{cols}"),
            });
        }
        if rows > Self::MAX_DIM || cols > Self::MAX_DIM {
            return Err(GridError::InvalidGeometry {
                reason: format!("dimension exceeds maximum {}", Self::MAX_DIM),
            });
        }
        if rows.checked_mul(cols).is_none() {
            return Err(GridError::InvalidGeometry {
                reason: format!("cell count {rows}x{cols} overflows u32"),
            });
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(GridError::InvalidGeometry {
                reason: format!("spacing must be finite and positive, got {spacing}"),
            });
        }
        Ok(Self {
            rows,
            cols,
            spacing,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    fn split(&self, cell: usize) -> (usize, usize) {
        (cell / self.cols as usize, cell % self.cols as usize)
    }
}

impl Lattice for Grid2D {
    fn ndim(&self) -> usize {
        2
    }

    fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    fn spacing(&self) -> f32 {
        self.spacing
    }

    fn axis_neighbours(&self, cell: usize, axis: usize) -> (Option<usize>, Option<usize>) {
        let cols = self.cols as usize;
        let (r, c) = self.split(cell);
        match axis {
            0 => {
                let minus = r.checked_sub(1).map(|rm| rm * cols + c);
                let plus = if r + 1 < self.rows as usize {
                    Some((r + 1) * cols + c)
                } else {
                    None
                };
                (minus, plus)
            }
            _ => {
                debug_assert_eq!(axis, 1);
                let minus = c.checked_sub(1).map(|cm| r * cols + cm);
                let plus = if c + 1 < cols {
                    Some(r * cols + c + 1)
                } else {
                    None
                };
                (minus, plus)
            }
        }
    }

    fn axis_neighbours_wrapped(&self, cell: usize, axis: usize) -> (usize, usize) {
        let cols = self.cols as usize;
        let rows = self.rows as usize;
        let (r, c) = self.split(cell);
        match axis {
            0 => (
                ((r + rows - 1) % rows) * cols + c,
                ((r + 1) % rows) * cols + c,
            ),
            _ => {
                debug_assert_eq!(axis, 1);
                (
                    r * cols + (c + cols - 1) % cols,
                    r * cols + (c + 1) % cols,
                )
            }
        }
    }

    fn is_interior(&self, cell: usize) -> bool {
        let (r, c) = self.split(cell);
        r > 0 && r + 1 < self.rows as usize && c > 0 && c + 1 < self.cols as usize
    }

    fn boundary_cells(&self) -> Vec<usize> {
        (0..self.cell_count())
            .filter(|&cell| !self.is_interior(cell))
            .collect()
    }

    fn interior_neighbour(&self, cell: usize) -> Option<usize> {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        if rows < 3 || cols < 3 {
            return None;
        }
        let (r, c) = self.split(cell);
        Some(r.clamp(1, rows - 2) * cols + c.clamp(1, cols - 2))
    }

    fn coord_of(&self, cell: usize) -> Coord {
        let (r, c) = self.split(cell);
        smallvec![r as i32, c as i32]
    }

    fn rank_of(&self, coord: &Coord) -> Option<usize> {
        if coord.len() != 2 {
            return None;
        }
        let (r, c) = (coord[0], coord[1]);
        if r >= 0 && (r as u32) < self.rows && c >= 0 && (c as u32) < self.cols {
            Some(r as usize * self.cols as usize + c as usize)
        } else {
            None
        }
    }
}

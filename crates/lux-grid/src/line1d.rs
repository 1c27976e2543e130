//! 1D line lattice.

use crate::error::GridError;
use crate::lattice::Lattice;
use lux_core::Coord;
use smallvec::smallvec;

/// A one-dimensional line of cells with uniform spacing.
///
/// Cell `i` has coordinate `[i]` where `0 <= i < len`. Cells `0` and
/// `len - 1` form the boundary layer; everything else is interior.
///
/// # Examples
///
/// ```
/// use lux_grid::{Lattice, Line1D};
///
/// let line = Line1D::new(5, 1.0).unwrap();
/// assert_eq!(line.cell_count(), 5);
/// assert!(line.is_interior(2));
/// assert!(!line.is_interior(0));
/// assert_eq!(line.boundary_cells(), vec![0, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Line1D {
    len: u32,
    spacing: f32,
}

impl Line1D {
    /// Maximum length: coordinates use `i32`, so `len` must fit.
    pub const MAX_LEN: u32 = i32::MAX as u32;

    /// Create a new 1D line with `len` cells and the given spacing.
    ///
    /// Returns `GridError::InvalidGeometry` if `len` is zero or exceeds
    /// [`Line1D::MAX_LEN`], or if `spacing` is non-finite or non-positive.
    pub fn new(len: u32, spacing: f32) -> Result<Self, GridError> {
        if len == 0 {
            return Err(GridError::InvalidGeometry {
                reason: "len must be positive".into(),
            });
        }
        if len > Self::MAX_LEN {
            return Err(GridError::InvalidGeometry {
                reason: format!("len {len} exceeds maximum {}", Self::MAX_LEN),
            });
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(GridError::InvalidGeometry {
                reason: format!("spacing must be finite and positive, got {spacing}"),
            });
        }
        Ok(Self { len, spacing })
    }

    /// Number of cells.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Always `false` — construction rejects `len == 0`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Lattice for Line1D {
    fn ndim(&self) -> usize {
        1
    }

    fn cell_count(&self) -> usize {
        self.len as usize
    }

    fn spacing(&self) -> f32 {
        self.spacing
    }

    fn axis_neighbours(&self, cell: usize, axis: usize) -> (Option<usize>, Option<usize>) {
        debug_assert_eq!(axis, 0);
        let minus = cell.checked_sub(1);
        let plus = if cell + 1 < self.len as usize {
            Some(cell + 1)
        } else {
            None
        };
        (minus, plus)
    }

    fn axis_neighbours_wrapped(&self, cell: usize, axis: usize) -> (usize, usize) {
        debug_assert_eq!(axis, 0);
        let n = self.len as usize;
        ((cell + n - 1) % n, (cell + 1) % n)
    }

    fn is_interior(&self, cell: usize) -> bool {
        cell > 0 && cell + 1 < self.len as usize
    }

    fn boundary_cells(&self) -> Vec<usize> {
        let n = self.len as usize;
        if n == 1 {
            vec![0]
        } else {
            vec![0, n - 1]
        }
    }

    fn interior_neighbour(&self, cell: usize) -> Option<usize> {
        let n = self.len as usize;
        if n < 3 {
            return None;
        }
        Some(cell.clamp(1, n - 2))
    }

    fn coord_of(&self, cell: usize) -> Coord {
        smallvec![cell as i32]
    }

    fn rank_of(&self, coord: &Coord) -> Option<usize> {
        if coord.len() != 1 {
            return None;
        }
        let i = coord[0];
        if i >= 0 && (i as u32) < self.len {
            Some(i as usize)
        } else {
            None
        }
    }
}

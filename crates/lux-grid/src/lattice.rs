//! The [`Lattice`] trait: fixed spatial topology over flat cell ranks.
//!
//! Kernels address cells by flat rank (row-major for 2D) and query
//! neighbors per axis, which keeps the update loops allocation-free.
//! Topology — dimensions and spacing — is immutable for the lifetime of
//! a run; only field values mutate.

use lux_core::Coord;

/// A structured lattice of cells with uniform spacing.
///
/// Implementations must be pure: every method is a function of the
/// construction parameters alone, so two lattices built from the same
/// parameters answer identically. This is what makes the solver's
/// determinism property hold across runs.
pub trait Lattice: Send + Sync + 'static {
    /// Number of spatial dimensions.
    fn ndim(&self) -> usize;

    /// Total number of cells.
    fn cell_count(&self) -> usize;

    /// Uniform cell spacing (meters).
    fn spacing(&self) -> f32;

    /// Neighbors of `cell` along `axis` without wrap-around:
    /// `(minus, plus)`, where a side past the lattice edge is `None`.
    fn axis_neighbours(&self, cell: usize, axis: usize) -> (Option<usize>, Option<usize>);

    /// Neighbors of `cell` along `axis` with periodic wrap-around.
    fn axis_neighbours_wrapped(&self, cell: usize, axis: usize) -> (usize, usize);

    /// Whether `cell` has a full set of non-wrapped neighbors on every axis.
    fn is_interior(&self, cell: usize) -> bool;

    /// Ranks of all boundary-layer cells, ascending.
    fn boundary_cells(&self) -> Vec<usize>;

    /// The nearest interior cell to a boundary cell: one step inward on
    /// every axis where the cell sits on a face. Returns `None` when the
    /// lattice has no interior (fewer than 3 cells along some axis).
    fn interior_neighbour(&self, cell: usize) -> Option<usize>;

    /// Coordinate of a flat rank.
    fn coord_of(&self, cell: usize) -> Coord;

    /// Flat rank of a coordinate, or `None` if out of bounds.
    fn rank_of(&self, coord: &Coord) -> Option<usize>;
}

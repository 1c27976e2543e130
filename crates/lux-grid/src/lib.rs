//! Lattice geometry, material coefficient maps, and the double-buffered
//! field store for the lux solver.
//!
//! The [`Lattice`] trait describes the fixed spatial topology; [`Line1D`]
//! and [`Grid2D`] are the shipped backends. [`MaterialMap`] derives
//! per-cell update coefficients from the constant set once, at
//! configuration time. [`FieldStore`] owns two generations of every field
//! buffer and swaps their roles at each publish, so a step always reads
//! the previous generation and writes a separate staging generation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid2d;
pub mod lattice;
pub mod line1d;
pub mod material;
pub mod store;

pub use error::GridError;
pub use grid2d::Grid2D;
pub use lattice::Lattice;
pub use line1d::Line1D;
pub use material::MaterialMap;
pub use store::{FieldStore, GridSnapshot, OwnedGridSnapshot, StepGuard, StoreReader, StoreWriter};

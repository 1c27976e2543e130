//! Field update kernels and boundary handling.
//!
//! An [`UpdateKernel`] advances the interior of the lattice one step in
//! Jacobi form: it reads only previous-generation values and writes the
//! staging generation, so cell traversal order never affects the result.
//! The [`BoundaryHandler`] then fills the boundary layer according to
//! the configured [`BoundaryPolicy`]. Every value either pass computes
//! goes through the same pipeline: finiteness check, clamp to the
//! amplitude range, flush to zero below the noise floor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod context;
pub mod em_pair;
pub mod kernel;
pub mod scalar_wave;

pub use boundary::{BoundaryHandler, BoundaryPolicy};
pub use context::StepContext;
pub use em_pair::{EmPairKernel, EmPairKernelBuilder};
pub use kernel::UpdateKernel;
pub use scalar_wave::{ScalarWaveKernel, ScalarWaveKernelBuilder};

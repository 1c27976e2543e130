//! The [`UpdateKernel`] trait.

use crate::context::StepContext;
use lux_core::{FieldId, FieldRole, KernelError};
use lux_grid::{Lattice, MaterialMap};

/// A field update rule advancing the lattice interior by one step.
///
/// Kernels are stateless with respect to the run: all per-step inputs
/// arrive through the [`StepContext`]. The driver calls [`step`] once
/// per step for the interior, then the boundary handler may call
/// [`update_cell_wrapped`] for edge cells under the periodic policy.
///
/// Implementations must be Jacobi-form: neighbor values come from
/// `ctx.reader` (the previous generation), never from `ctx.writer`.
///
/// [`step`]: UpdateKernel::step
/// [`update_cell_wrapped`]: UpdateKernel::update_cell_wrapped
pub trait UpdateKernel: Send + Sync {
    /// Kernel name for error reporting.
    fn name(&self) -> &str;

    /// The fields this kernel updates, with their physical roles.
    fn fields(&self) -> Vec<(FieldId, FieldRole)>;

    /// Largest stable timestep for this kernel on the given lattice
    /// and materials (seconds). The driver rejects any configured `dt`
    /// above this bound.
    fn max_dt(&self, lattice: &dyn Lattice, materials: &MaterialMap) -> f32;

    /// Advance every interior cell by one step.
    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), KernelError>;

    /// Recompute the update at one cell using wrapped neighbor
    /// indices. Used by the periodic boundary policy, which treats the
    /// lattice as a torus.
    fn update_cell_wrapped(
        &self,
        ctx: &mut StepContext<'_>,
        cell: usize,
    ) -> Result<(), KernelError>;
}

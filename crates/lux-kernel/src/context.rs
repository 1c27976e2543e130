//! Per-step context handed to kernels and the boundary handler.

use lux_core::{FieldReader, FieldWriter, StepId};
use lux_grid::{Lattice, MaterialMap};

/// Everything a kernel may touch during one step.
///
/// `reader` exposes the published (previous) generation, `writer` the
/// staging generation. Kernels must source neighbor values from
/// `reader` only; `writer` contents are partial until the step
/// completes.
pub struct StepContext<'a> {
    /// Previous-generation field values.
    pub reader: &'a dyn FieldReader,
    /// Staging buffers for the new generation.
    pub writer: &'a mut dyn FieldWriter,
    /// Lattice topology.
    pub lattice: &'a dyn Lattice,
    /// Per-cell material coefficients.
    pub materials: &'a MaterialMap,
    /// Timestep for this step (seconds).
    pub dt: f32,
    /// Index of the step being computed (the one that will be published).
    pub step: StepId,
}

impl<'a> StepContext<'a> {
    /// Bundle the borrows for one step.
    pub fn new(
        reader: &'a dyn FieldReader,
        writer: &'a mut dyn FieldWriter,
        lattice: &'a dyn Lattice,
        materials: &'a MaterialMap,
        dt: f32,
        step: StepId,
    ) -> Self {
        Self {
            reader,
            writer,
            lattice,
            materials,
            dt,
            step,
        }
    }
}

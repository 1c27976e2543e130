//! Field access and snapshot traits shared across the workspace.

use crate::id::{FieldId, GridGenerationId, StepId};

/// Read-only access to the previous generation's field data.
///
/// Implemented by the grid's published-buffer view. Kernels read *only*
/// through this trait, which is what guarantees the Jacobi (read-old,
/// write-new) discipline: no cell's update can observe another cell's
/// freshly written value.
pub trait FieldReader {
    /// Read a field as a flat f32 slice, or `None` if the ID is unknown.
    fn read(&self, field: FieldId) -> Option<&[f32]>;
}

/// Mutable access to the staging generation's field data.
///
/// Implemented by the grid's staging-buffer view. The boundary handler
/// additionally reads back through the returned slice, since it runs
/// after the interior pass and corrects freshly written edge cells.
pub trait FieldWriter {
    /// Get the staging buffer for a field, or `None` if the ID is unknown.
    fn write(&mut self, field: FieldId) -> Option<&mut [f32]>;
}

/// Read-only access to a published snapshot.
///
/// Decouples external consumers (visualization, output encoding) from
/// the grid implementation; they only ever see a completed generation.
pub trait SnapshotAccess {
    /// Read field data from the snapshot.
    fn read_field(&self, field: FieldId) -> Option<&[f32]>;

    /// The step at which this snapshot was published.
    fn step_id(&self) -> StepId;

    /// Simulation time at that step, in seconds.
    fn sim_time(&self) -> f64;

    /// The grid buffer generation of this snapshot.
    fn generation(&self) -> GridGenerationId;
}

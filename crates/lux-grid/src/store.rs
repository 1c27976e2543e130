//! Double-buffered field storage.
//!
//! Every registered field owns two equal-length buffers in ping-pong
//! roles. During a step, kernels read the published generation and write
//! the staging generation; `publish()` swaps the roles and bumps the
//! generation counter. A step therefore never observes its own partial
//! writes, which is what makes the Jacobi update order-independent.

use std::mem;

use indexmap::IndexMap;

use crate::error::GridError;
use lux_core::{FieldDef, FieldId, FieldReader, FieldWriter, GridGenerationId, SnapshotAccess, StepId};

/// Double-buffered storage for all fields on one lattice.
///
/// Fields are registered up front and keep their registration order
/// (the descriptor map is insertion-ordered). At most one step can be
/// in flight: [`FieldStore::begin_step`] hands out a [`StepGuard`]
/// whose exclusive borrow of the store prevents a second.
#[derive(Debug)]
pub struct FieldStore {
    cell_count: usize,
    defs: IndexMap<FieldId, FieldDef>,
    published: IndexMap<FieldId, Vec<f32>>,
    staging: IndexMap<FieldId, Vec<f32>>,
    step: StepId,
    sim_time: f64,
    generation: GridGenerationId,
    in_step: bool,
}

impl FieldStore {
    /// Create an empty store for a lattice with `cell_count` cells.
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_count,
            defs: IndexMap::new(),
            published: IndexMap::new(),
            staging: IndexMap::new(),
            step: StepId(0),
            sim_time: 0.0,
            generation: GridGenerationId(0),
            in_step: false,
        }
    }

    /// Register a field. Both generations start zero-filled.
    ///
    /// Fails with `GridError::StepInProgress` while a step guard is
    /// outstanding (unreachable through safe use, since the guard holds
    /// the store's `&mut`, but `discard_step` misuse is still caught).
    pub fn register_field(&mut self, def: FieldDef) -> Result<FieldId, GridError> {
        if self.in_step {
            return Err(GridError::StepInProgress);
        }
        let id = FieldId(self.defs.len() as u32);
        self.defs.insert(id, def);
        self.published.insert(id, vec![0.0; self.cell_count]);
        self.staging.insert(id, vec![0.0; self.cell_count]);
        Ok(id)
    }

    /// Number of cells per field buffer.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Registered field descriptors in registration order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &FieldDef)> {
        self.defs.iter().map(|(&id, def)| (id, def))
    }

    /// Descriptor for one field.
    pub fn field_def(&self, field: FieldId) -> Option<&FieldDef> {
        self.defs.get(&field)
    }

    /// Overwrite the published generation of `field` with `values`.
    ///
    /// Used to seed initial conditions before the first step.
    pub fn set_initial(&mut self, field: FieldId, values: &[f32]) -> Result<(), GridError> {
        if self.in_step {
            return Err(GridError::StepInProgress);
        }
        if values.len() != self.cell_count {
            return Err(GridError::SizeMismatch {
                expected: self.cell_count,
                got: values.len(),
            });
        }
        let buf = self
            .published
            .get_mut(&field)
            .ok_or(GridError::UnknownField { field })?;
        buf.copy_from_slice(values);
        Ok(())
    }

    /// Read one published cell value, bounds-checked.
    pub fn read_cell(&self, field: FieldId, cell: usize) -> Result<f32, GridError> {
        let buf = self
            .published
            .get(&field)
            .ok_or(GridError::UnknownField { field })?;
        buf.get(cell).copied().ok_or(GridError::IndexOutOfBounds {
            cell,
            len: buf.len(),
        })
    }

    /// Begin a step: seed every staging buffer from its published
    /// counterpart and hand out a reader/writer pair.
    ///
    /// The staging seed means a kernel that writes only some cells
    /// leaves the rest carrying their previous values.
    pub fn begin_step(&mut self) -> Result<StepGuard<'_>, GridError> {
        if self.in_step {
            return Err(GridError::StepInProgress);
        }
        for (id, staging) in self.staging.iter_mut() {
            // Registration keeps the maps in lockstep.
            if let Some(published) = self.published.get(id) {
                staging.copy_from_slice(published);
            }
        }
        self.in_step = true;
        Ok(StepGuard {
            reader: StoreReader {
                fields: &self.published,
            },
            writer: StoreWriter {
                fields: &mut self.staging,
            },
        })
    }

    /// Promote the staging generation: swap buffer roles, record the
    /// step index and simulation time, and advance the generation
    /// counter.
    pub fn publish(&mut self, step: StepId, sim_time: f64) -> Result<(), GridError> {
        if !self.in_step {
            return Err(GridError::NoStepInProgress);
        }
        mem::swap(&mut self.published, &mut self.staging);
        self.step = step;
        self.sim_time = sim_time;
        self.generation = GridGenerationId(self.generation.0 + 1);
        self.in_step = false;
        Ok(())
    }

    /// Abandon the in-flight step. The published generation is
    /// untouched; staging contents are stale until the next
    /// `begin_step` reseeds them.
    pub fn discard_step(&mut self) -> Result<(), GridError> {
        if !self.in_step {
            return Err(GridError::NoStepInProgress);
        }
        self.in_step = false;
        Ok(())
    }

    /// Borrow the published generation read-only.
    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot { store: self }
    }

    /// Clone the published generation out for external consumers.
    pub fn owned_snapshot(&self) -> OwnedGridSnapshot {
        OwnedGridSnapshot {
            fields: self.published.clone(),
            step: self.step,
            sim_time: self.sim_time,
            generation: self.generation,
        }
    }

    /// Step index of the last published generation.
    pub fn step(&self) -> StepId {
        self.step
    }

    /// Simulation time of the last published generation (seconds).
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Generation counter; advances by one on every publish.
    pub fn generation(&self) -> GridGenerationId {
        self.generation
    }
}

/// Reader/writer pair for one in-flight step.
///
/// The reader sees the published generation, the writer the staging
/// generation. Dropping the guard without calling
/// [`FieldStore::publish`] leaves the published generation untouched
/// (the store still needs `discard_step` before the next begin).
pub struct StepGuard<'a> {
    /// Previous-generation values.
    pub reader: StoreReader<'a>,
    /// Staging buffers for the new generation.
    pub writer: StoreWriter<'a>,
}

/// Read access to the published generation.
pub struct StoreReader<'a> {
    fields: &'a IndexMap<FieldId, Vec<f32>>,
}

impl FieldReader for StoreReader<'_> {
    fn read(&self, field: FieldId) -> Option<&[f32]> {
        self.fields.get(&field).map(Vec::as_slice)
    }
}

/// Write access to the staging generation.
pub struct StoreWriter<'a> {
    fields: &'a mut IndexMap<FieldId, Vec<f32>>,
}

impl StoreWriter<'_> {
    /// Write one staging cell value, bounds-checked.
    pub fn write_cell(&mut self, field: FieldId, cell: usize, value: f32) -> Result<(), GridError> {
        let buf = self
            .fields
            .get_mut(&field)
            .ok_or(GridError::UnknownField { field })?;
        let len = buf.len();
        let slot = buf
            .get_mut(cell)
            .ok_or(GridError::IndexOutOfBounds { cell, len })?;
        *slot = value;
        Ok(())
    }
}

impl FieldWriter for StoreWriter<'_> {
    fn write(&mut self, field: FieldId) -> Option<&mut [f32]> {
        self.fields.get_mut(&field).map(Vec::as_mut_slice)
    }
}

/// Borrowed view of the published generation.
#[derive(Clone, Copy)]
pub struct GridSnapshot<'a> {
    store: &'a FieldStore,
}

impl SnapshotAccess for GridSnapshot<'_> {
    fn read_field(&self, field: FieldId) -> Option<&[f32]> {
        self.store.published.get(&field).map(Vec::as_slice)
    }

    fn step_id(&self) -> StepId {
        self.store.step
    }

    fn sim_time(&self) -> f64 {
        self.store.sim_time
    }

    fn generation(&self) -> GridGenerationId {
        self.store.generation
    }
}

/// Owned copy of the published generation, detached from the store.
#[derive(Clone, Debug)]
pub struct OwnedGridSnapshot {
    fields: IndexMap<FieldId, Vec<f32>>,
    step: StepId,
    sim_time: f64,
    generation: GridGenerationId,
}

impl SnapshotAccess for OwnedGridSnapshot {
    fn read_field(&self, field: FieldId) -> Option<&[f32]> {
        self.fields.get(&field).map(Vec::as_slice)
    }

    fn step_id(&self) -> StepId {
        self.step
    }

    fn sim_time(&self) -> f64 {
        self.sim_time
    }

    fn generation(&self) -> GridGenerationId {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::FieldRole;

    fn store_with_field() -> (FieldStore, FieldId) {
        let mut store = FieldStore::new(4);
        let id = store
            .register_field(FieldDef::new("e", FieldRole::Electric))
            .unwrap();
        (store, id)
    }

    #[test]
    fn registered_field_starts_zeroed() {
        let (store, id) = store_with_field();
        assert_eq!(store.read_cell(id, 0).unwrap(), 0.0);
        assert_eq!(store.read_cell(id, 3).unwrap(), 0.0);
    }

    #[test]
    fn read_cell_rejects_out_of_bounds() {
        let (store, id) = store_with_field();
        assert!(matches!(
            store.read_cell(id, 4),
            Err(GridError::IndexOutOfBounds { cell: 4, len: 4 })
        ));
    }

    #[test]
    fn read_cell_rejects_unknown_field() {
        let (store, _) = store_with_field();
        assert!(matches!(
            store.read_cell(FieldId(99), 0),
            Err(GridError::UnknownField { .. })
        ));
    }

    #[test]
    fn set_initial_rejects_size_mismatch() {
        let (mut store, id) = store_with_field();
        assert!(matches!(
            store.set_initial(id, &[1.0, 2.0]),
            Err(GridError::SizeMismatch {
                expected: 4,
                got: 2
            })
        ));
    }

    #[test]
    fn step_reads_published_writes_staging() {
        let (mut store, id) = store_with_field();
        store.set_initial(id, &[1.0, 2.0, 3.0, 4.0]).unwrap();

        let mut guard = store.begin_step().unwrap();
        assert_eq!(guard.reader.read(id).unwrap(), &[1.0, 2.0, 3.0, 4.0]);
        guard.writer.write_cell(id, 1, 9.0).unwrap();
        // The write is invisible until publish.
        assert_eq!(guard.reader.read(id).unwrap(), &[1.0, 2.0, 3.0, 4.0]);
        drop(guard);

        store.publish(StepId(1), 0.5).unwrap();
        assert_eq!(store.read_cell(id, 1).unwrap(), 9.0);
        // Unwritten cells carry the previous value through the seed.
        assert_eq!(store.read_cell(id, 0).unwrap(), 1.0);
        assert_eq!(store.step(), StepId(1));
        assert_eq!(store.sim_time(), 0.5);
        assert_eq!(store.generation(), GridGenerationId(1));
    }

    #[test]
    fn discard_leaves_published_untouched() {
        let (mut store, id) = store_with_field();
        store.set_initial(id, &[1.0, 1.0, 1.0, 1.0]).unwrap();

        let mut guard = store.begin_step().unwrap();
        guard.writer.write_cell(id, 0, 7.0).unwrap();
        drop(guard);
        store.discard_step().unwrap();

        assert_eq!(store.read_cell(id, 0).unwrap(), 1.0);
        assert_eq!(store.generation(), GridGenerationId(0));
    }

    #[test]
    fn publish_without_begin_is_rejected() {
        let (mut store, _) = store_with_field();
        assert!(matches!(
            store.publish(StepId(1), 0.0),
            Err(GridError::NoStepInProgress)
        ));
        assert!(matches!(
            store.discard_step(),
            Err(GridError::NoStepInProgress)
        ));
    }

    #[test]
    fn generation_advances_per_publish() {
        let (mut store, _) = store_with_field();
        for i in 1..=3 {
            let guard = store.begin_step().unwrap();
            drop(guard);
            store.publish(StepId(i), i as f64).unwrap();
            assert_eq!(store.generation(), GridGenerationId(i));
        }
    }

    #[test]
    fn write_cell_rejects_out_of_bounds() {
        let (mut store, id) = store_with_field();
        let mut guard = store.begin_step().unwrap();
        assert!(matches!(
            guard.writer.write_cell(id, 10, 1.0),
            Err(GridError::IndexOutOfBounds { cell: 10, len: 4 })
        ));
    }

    #[test]
    fn snapshot_reflects_published_generation() {
        let (mut store, id) = store_with_field();
        store.set_initial(id, &[5.0, 6.0, 7.0, 8.0]).unwrap();
        let snap = store.owned_snapshot();
        assert_eq!(snap.read_field(id).unwrap(), &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(snap.step_id(), StepId(0));
        assert_eq!(snap.generation(), GridGenerationId(0));

        let borrowed = store.snapshot();
        assert_eq!(borrowed.read_field(id).unwrap(), &[5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn fields_iterate_in_registration_order() {
        let mut store = FieldStore::new(2);
        let a = store
            .register_field(FieldDef::new("e", FieldRole::Electric))
            .unwrap();
        let b = store
            .register_field(FieldDef::new("h", FieldRole::Magnetic))
            .unwrap();
        let order: Vec<FieldId> = store.fields().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b]);
    }
}

//! Test utilities and mock types for lux development.
//!
//! Provides mock implementations of core traits ([`FieldReader`],
//! [`FieldWriter`], [`SnapshotAccess`]) and seeded field fixtures for
//! deterministic test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;

use lux_core::constants::clamp_amplitude;
use lux_core::{FieldId, FieldReader, FieldWriter, GridGenerationId, SnapshotAccess, StepId};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Mock implementation of [`FieldReader`].
///
/// Backed by a `HashMap<FieldId, Vec<f32>>` for flexible test setup.
/// Pre-populate fields with [`set_field`](MockFieldReader::set_field)
/// before passing to code under test.
pub struct MockFieldReader {
    fields: HashMap<FieldId, Vec<f32>>,
}

impl MockFieldReader {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Pre-populate a field with data for testing.
    pub fn set_field(&mut self, field: FieldId, data: Vec<f32>) {
        self.fields.insert(field, data);
    }
}

impl Default for MockFieldReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldReader for MockFieldReader {
    fn read(&self, field: FieldId) -> Option<&[f32]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }
}

/// Mock implementation of [`FieldWriter`].
///
/// Pre-allocate field buffers with [`add_field`](MockFieldWriter::add_field),
/// then pass to code under test. Inspect results with
/// [`get_field`](MockFieldWriter::get_field).
pub struct MockFieldWriter {
    fields: HashMap<FieldId, Vec<f32>>,
}

impl MockFieldWriter {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Pre-allocate a field buffer with the given size, initialized to zero.
    pub fn add_field(&mut self, field: FieldId, size: usize) {
        self.fields.insert(field, vec![0.0; size]);
    }

    /// Pre-populate a field buffer, as the staging seed would.
    pub fn seed_field(&mut self, field: FieldId, data: Vec<f32>) {
        self.fields.insert(field, data);
    }

    /// Read back the current field data for test assertions.
    pub fn get_field(&self, field: FieldId) -> Option<&[f32]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }
}

impl Default for MockFieldWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldWriter for MockFieldWriter {
    fn write(&mut self, field: FieldId) -> Option<&mut [f32]> {
        self.fields.get_mut(&field).map(|v| v.as_mut_slice())
    }
}

/// Mock snapshot implementing [`SnapshotAccess`] with configurable
/// step, time, and generation metadata.
pub struct MockSnapshot {
    fields: HashMap<FieldId, Vec<f32>>,
    step: StepId,
    sim_time: f64,
    generation: GridGenerationId,
}

impl MockSnapshot {
    /// Create a new mock snapshot with the given metadata.
    pub fn new(step: StepId, sim_time: f64, generation: GridGenerationId) -> Self {
        Self {
            fields: HashMap::new(),
            step,
            sim_time,
            generation,
        }
    }

    /// Pre-populate a field with data for testing.
    pub fn set_field(&mut self, field: FieldId, data: Vec<f32>) {
        self.fields.insert(field, data);
    }

    /// Returns the number of fields in the snapshot.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl SnapshotAccess for MockSnapshot {
    fn read_field(&self, field: FieldId) -> Option<&[f32]> {
        self.fields.get(&field).map(|v| v.as_slice())
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

/// Deterministic random field fixture: `len` values in the amplitude
/// range, already clamped and flushed so they satisfy the storage
/// invariant. Identical seeds produce identical buffers.
pub fn seeded_field(seed: u64, len: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let u: f64 = rng.random::<f64>() * 2.0 - 1.0;
            clamp_amplitude(u as f32)
        })
        .collect()
}

/// A zero field with a single spike.
pub fn impulse_field(len: usize, cell: usize, amplitude: f32) -> Vec<f32> {
    let mut field = vec![0.0; len];
    field[cell] = amplitude;
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::constants::{MAX_VOL, MIN_VOL};

    #[test]
    fn mock_reader_round_trips() {
        let mut reader = MockFieldReader::new();
        reader.set_field(FieldId(0), vec![1.0, 2.0]);
        assert_eq!(reader.read(FieldId(0)).unwrap(), &[1.0, 2.0]);
        assert!(reader.read(FieldId(1)).is_none());
    }

    #[test]
    fn mock_writer_exposes_written_data() {
        let mut writer = MockFieldWriter::new();
        writer.add_field(FieldId(0), 3);
        writer.write(FieldId(0)).unwrap()[1] = 5.0;
        assert_eq!(writer.get_field(FieldId(0)).unwrap(), &[0.0, 5.0, 0.0]);
    }

    #[test]
    fn seeded_field_is_deterministic_and_in_range() {
        let a = seeded_field(42, 64);
        let b = seeded_field(42, 64);
        assert_eq!(a, b);
        assert_ne!(a, seeded_field(43, 64));
        for &v in &a {
            assert!(v.abs() <= MAX_VOL);
            assert!(v == 0.0 || v.abs() >= MIN_VOL);
        }
    }

    #[test]
    fn impulse_field_has_one_spike() {
        let f = impulse_field(5, 2, 1.0);
        assert_eq!(f, vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}

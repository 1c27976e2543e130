//! Strongly-typed identifiers and the [`Coord`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a field component within a solver run.
///
/// Fields are registered at configuration time and assigned sequential
/// IDs; `FieldId(n)` corresponds to the n-th registered field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing step counter.
///
/// Incremented by the driver only after a full kernel + boundary pass
/// has completed and been published. A failed step never advances it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Tracks the grid's buffer generation for snapshot identity.
///
/// Incremented each time the staging buffer is published. Distinct from
/// [`StepId`] only in principle: a reset run re-uses step indices but
/// never generation numbers within one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridGenerationId(pub u64);

impl fmt::Display for GridGenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GridGenerationId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A coordinate on the spatial lattice.
///
/// Uses `SmallVec<[i32; 4]>` to avoid heap allocation for lattices up to
/// 4 dimensions, covering the shipped 1D and 2D topologies with headroom.
pub type Coord = SmallVec<[i32; 4]>;

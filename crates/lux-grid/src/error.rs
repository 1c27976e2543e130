//! Error types for lattice construction, material maps, and field storage.

use std::error::Error;
use std::fmt;

use lux_core::FieldId;

/// Errors from the grid subsystem.
///
/// Configuration-time variants (`InvalidGeometry`, `OutOfRange`,
/// `SizeMismatch`) are fail-fast: the caller must reconfigure, not
/// continue with defaults. `IndexOutOfBounds` indicates an internal
/// invariant violation — malformed neighbor indexing in a kernel —
/// and is a defect, not a recoverable runtime condition.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A lattice dimension is zero or the cell spacing is non-finite
    /// or non-positive.
    InvalidGeometry {
        /// Description of the rejected geometry.
        reason: String,
    },
    /// A material property produced a non-finite derived coefficient.
    OutOfRange {
        /// The offending cell index.
        cell: usize,
        /// The non-finite derived value.
        value: f32,
    },
    /// A cell index fell outside the lattice. Internal-only: indicates
    /// a core bug, not a user error.
    IndexOutOfBounds {
        /// The offending cell index.
        cell: usize,
        /// The buffer length.
        len: usize,
    },
    /// The field ID is not registered in the store.
    UnknownField {
        /// The unregistered field.
        field: FieldId,
    },
    /// A supplied buffer does not match the lattice cell count.
    SizeMismatch {
        /// Expected length (lattice cell count).
        expected: usize,
        /// Supplied length.
        got: usize,
    },
    /// `begin_step()` was called while a step was already in progress.
    StepInProgress,
    /// `publish()` or `discard_step()` was called with no step begun.
    NoStepInProgress,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry { reason } => write!(f, "invalid geometry: {reason}"),
            Self::OutOfRange { cell, value } => {
                write!(f, "non-finite material coefficient {value} at cell {cell}")
            }
            Self::IndexOutOfBounds { cell, len } => {
                write!(f, "cell index {cell} out of bounds for length {len}")
            }
            Self::UnknownField { field } => write!(f, "unknown field {field}"),
            Self::SizeMismatch { expected, got } => {
                write!(f, "buffer length {got} does not match cell count {expected}")
            }
            Self::StepInProgress => write!(f, "a step is already in progress"),
            Self::NoStepInProgress => write!(f, "no step in progress"),
        }
    }
}

impl Error for GridError {}

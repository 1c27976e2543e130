//! Error types shared by the kernel and engine crates.
//!
//! Organized by subsystem, following a fail-fast taxonomy: configuration
//! errors abort construction, kernel errors abort the step, and a
//! divergence is terminal for the run.

use std::error::Error;
use std::fmt;

use crate::id::{FieldId, StepId};

/// Errors from an update kernel or boundary pass within one step.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelError {
    /// A computed field value was NaN or infinite. The step must be
    /// discarded; silently clamping a diverging run would mask
    /// physically meaningless results.
    NumericDivergence {
        /// The field containing the non-finite value.
        field: FieldId,
        /// Index of the first offending cell.
        cell: usize,
    },
    /// A boundary policy name from configuration is not recognized.
    UnsupportedBoundaryPolicy {
        /// The unrecognized policy name.
        name: String,
    },
    /// A declared field was not readable from the previous generation.
    FieldNotReadable {
        /// The missing field.
        field: FieldId,
    },
    /// A declared field was not writable in the staging generation.
    FieldNotWritable {
        /// The missing field.
        field: FieldId,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericDivergence { field, cell } => {
                write!(f, "non-finite value in field {field} at cell {cell}")
            }
            Self::UnsupportedBoundaryPolicy { name } => {
                write!(f, "unsupported boundary policy '{name}'")
            }
            Self::FieldNotReadable { field } => write!(f, "field {field} not readable"),
            Self::FieldNotWritable { field } => write!(f, "field {field} not writable"),
        }
    }
}

impl Error for KernelError {}

/// Errors from the driver during `step()` or `run()`.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The kernel or boundary pass failed; the step was discarded and
    /// the timestep state did not advance.
    Kernel {
        /// Name of the failing kernel or pass.
        name: String,
        /// The underlying kernel error.
        reason: KernelError,
    },
    /// The run previously diverged; the driver is in its terminal state
    /// and refuses further steps.
    Diverged {
        /// The step index at which divergence occurred.
        step: StepId,
    },
    /// The run already completed its step budget or was stopped.
    AlreadyFinished,
    /// An internal grid invariant was violated (malformed indexing or a
    /// misused step guard). Indicates a defect in the solver core, not a
    /// user error.
    Internal {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kernel { name, reason } => write!(f, "kernel '{name}' failed: {reason}"),
            Self::Diverged { step } => write!(f, "run diverged at step {step}"),
            Self::AlreadyFinished => write!(f, "run already finished"),
            Self::Internal { reason } => write!(f, "internal invariant violated: {reason}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kernel { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let e = KernelError::NumericDivergence {
            field: FieldId(1),
            cell: 42,
        };
        assert_eq!(e.to_string(), "non-finite value in field 1 at cell 42");

        let s = StepError::Kernel {
            name: "em_pair".into(),
            reason: e,
        };
        assert!(s.to_string().contains("em_pair"));
        assert!(s.to_string().contains("cell 42"));
    }

    #[test]
    fn step_error_source_chains_to_kernel_error() {
        let s = StepError::Kernel {
            name: "em_pair".into(),
            reason: KernelError::FieldNotWritable { field: FieldId(0) },
        };
        assert!(s.source().is_some());
        assert!(StepError::AlreadyFinished.source().is_none());
    }

    #[test]
    fn diverged_reports_step_index() {
        let s = StepError::Diverged { step: StepId(7) };
        assert_eq!(s.to_string(), "run diverged at step 7");
    }
}

//! Core constants, types, and traits for the lux field solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the physical constant set, strongly-typed IDs, field definitions,
//! the error taxonomy, and the field access traits shared by the grid,
//! kernel, and engine crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod error;
pub mod field;
pub mod id;
pub mod traits;

pub use constants::{clamp_amplitude, EPSILON, LIGHTSPEED, MAX_VOL, MIN_VOL, MU, PI};
pub use error::{KernelError, StepError};
pub use field::{FieldDef, FieldRole};
pub use id::{Coord, FieldId, GridGenerationId, StepId};
pub use traits::{FieldReader, FieldWriter, SnapshotAccess};

//! Lux: a single-precision explicit field solver core.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the lux sub-crates. For most users, adding `lux` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lux::prelude::*;
//!
//! // A 100-cell line in vacuum with an impulse in the electric field.
//! let n = 100;
//! let mut initial = vec![0.0_f32; n];
//! initial[50] = 1.0;
//!
//! let kernel = EmPairKernel::builder()
//!     .electric(FieldId(0))
//!     .magnetic(FieldId(1))
//!     .build()
//!     .unwrap();
//! let config = SolverConfig::builder()
//!     .lattice(Line1D::new(n as u32, 1.0).unwrap())
//!     .materials(MaterialMap::vacuum(n))
//!     .field_with_initial(FieldDef::new("e", FieldRole::Electric), initial)
//!     .field(FieldDef::new("h", FieldRole::Magnetic))
//!     .kernel(kernel)
//!     .boundary(BoundaryPolicy::Absorbing)
//!     .timestep(Timestep::Auto)
//!     .step_budget(10)
//!     .build()
//!     .unwrap();
//!
//! let mut driver = Driver::new(config).unwrap();
//! driver.run().unwrap();
//! assert_eq!(driver.steps_done(), 10);
//! ```
//!
//! # Module map
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lux-core` | Constants, IDs, field roles, core traits, errors |
//! | [`grid`] | `lux-grid` | Lattices, material maps, the double-buffered store |
//! | [`kernel`] | `lux-kernel` | Update kernels and the boundary handler |
//! | [`engine`] | `lux-engine` | Solver configuration and the stepping driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Constants, IDs, field definitions, and core traits (`lux-core`).
pub use lux_core as types;

/// Lattice geometry, materials, and field storage (`lux-grid`).
pub use lux_grid as grid;

/// Update kernels and boundary handling (`lux-kernel`).
pub use lux_kernel as kernel;

/// Configuration and the time-stepping driver (`lux-engine`).
pub use lux_engine as engine;

/// The types most runs need, importable in one line.
pub mod prelude {
    pub use lux_core::constants::{EPSILON, LIGHTSPEED, MAX_VOL, MIN_VOL, MU, PI};
    pub use lux_core::{
        FieldDef, FieldId, FieldRole, KernelError, SnapshotAccess, StepError, StepId,
    };
    pub use lux_engine::{ConfigError, Driver, RunState, SolverConfig, Timestep};
    pub use lux_grid::{FieldStore, Grid2D, GridError, Lattice, Line1D, MaterialMap};
    pub use lux_kernel::{
        BoundaryHandler, BoundaryPolicy, EmPairKernel, ScalarWaveKernel, StepContext, UpdateKernel,
    };
}

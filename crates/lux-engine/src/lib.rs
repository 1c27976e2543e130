//! Time-stepping driver for the lux solver.
//!
//! [`SolverConfig`] gathers the lattice, materials, fields, kernel, and
//! boundary policy; [`Driver::new`] validates the whole configuration
//! fail-fast (including the Courant timestep bound) and then owns the
//! run: `step()` advances one generation, `run()` loops to the step
//! budget or an external stop signal, and snapshots expose the
//! published state between steps.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;

pub use config::{ConfigError, SolverConfig, SolverConfigBuilder, Timestep};
pub use driver::{Driver, RunState};

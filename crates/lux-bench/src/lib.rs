//! Benchmark profiles for the lux solver.
//!
//! Provides pre-built [`SolverConfig`] profiles shared by the criterion
//! benches:
//!
//! - [`impulse_profile`]: 1-D vacuum line with a centered impulse and
//!   absorbing boundaries
//! - [`periodic_profile`]: the same line closed into a ring

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lux_core::{FieldDef, FieldId, FieldRole};
use lux_engine::{SolverConfig, Timestep};
use lux_grid::{Line1D, MaterialMap};
use lux_kernel::{BoundaryPolicy, EmPairKernel};

/// A 1-D vacuum run with a unit impulse at the midpoint and absorbing
/// boundaries. `dt` sits at 90% of the stability limit.
pub fn impulse_profile(cells: usize, step_budget: u64) -> SolverConfig {
    profile(cells, step_budget, BoundaryPolicy::Absorbing)
}

/// The impulse run on a periodic ring, which exercises the wrapped
/// edge recompute path.
pub fn periodic_profile(cells: usize, step_budget: u64) -> SolverConfig {
    profile(cells, step_budget, BoundaryPolicy::Periodic)
}

fn profile(cells: usize, step_budget: u64, boundary: BoundaryPolicy) -> SolverConfig {
    let mut initial = vec![0.0_f32; cells];
    initial[cells / 2] = 1.0;
    let kernel = EmPairKernel::builder()
        .electric(FieldId(0))
        .magnetic(FieldId(1))
        .build()
        .expect("static field ids");
    SolverConfig::builder()
        .lattice(Line1D::new(cells as u32, 1.0).expect("static geometry"))
        .materials(MaterialMap::vacuum(cells))
        .field_with_initial(FieldDef::new("e", FieldRole::Electric), initial)
        .field(FieldDef::new("h", FieldRole::Magnetic))
        .kernel(kernel)
        .boundary(boundary)
        .timestep(Timestep::Auto)
        .step_budget(step_budget)
        .build()
        .expect("static configuration")
}

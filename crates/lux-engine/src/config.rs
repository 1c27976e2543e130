//! Solver configuration and its error type.

use std::error::Error;
use std::fmt;

use crossbeam_channel::Receiver;

use lux_core::{FieldDef, FieldId};
use lux_grid::{GridError, Lattice, MaterialMap};
use lux_kernel::{BoundaryPolicy, UpdateKernel};

/// Timestep selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timestep {
    /// An explicit timestep in seconds. Rejected at construction if it
    /// exceeds the kernel's stability bound; never silently clamped.
    Fixed(f32),
    /// Derive the timestep from the stability bound with a 0.9 safety
    /// factor.
    Auto,
}

/// Safety factor applied by [`Timestep::Auto`].
pub const AUTO_DT_SAFETY: f32 = 0.9;

/// Configuration errors, reported at [`Driver::new`] before any step
/// executes.
///
/// [`Driver::new`]: crate::driver::Driver::new
#[derive(Debug)]
pub enum ConfigError {
    /// A grid-subsystem validation failed (geometry, buffers).
    Grid(GridError),
    /// The requested timestep violates the kernel's stability bound,
    /// or is not a positive finite number.
    UnstableTimestep {
        /// The requested (or derived) timestep.
        dt: f32,
        /// The largest stable timestep for this configuration.
        limit: f32,
    },
    /// The material map does not cover the lattice.
    MaterialSizeMismatch {
        /// Lattice cell count.
        expected: usize,
        /// Material map cell count.
        got: usize,
    },
    /// No fields were declared.
    NoFields,
    /// The step budget is zero.
    ZeroStepBudget,
    /// The kernel updates a field the configuration never declared.
    UnknownKernelField {
        /// The undeclared field.
        field: FieldId,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(err) => write!(f, "grid configuration failed: {err}"),
            Self::UnstableTimestep { dt, limit } => {
                write!(f, "timestep {dt} exceeds stability limit {limit}")
            }
            Self::MaterialSizeMismatch { expected, got } => {
                write!(
                    f,
                    "material map covers {got} cells, lattice has {expected}"
                )
            }
            Self::NoFields => write!(f, "configuration declares no fields"),
            Self::ZeroStepBudget => write!(f, "step budget must be positive"),
            Self::UnknownKernelField { field } => {
                write!(f, "kernel updates undeclared field {field}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}

/// A complete, not-yet-validated solver configuration.
///
/// Field ids are assigned in declaration order starting at `FieldId(0)`;
/// build kernels against those ids.
pub struct SolverConfig {
    pub(crate) lattice: Box<dyn Lattice>,
    pub(crate) materials: MaterialMap,
    pub(crate) fields: Vec<(FieldDef, Option<Vec<f32>>)>,
    pub(crate) kernel: Box<dyn UpdateKernel>,
    pub(crate) boundary: BoundaryPolicy,
    pub(crate) timestep: Timestep,
    pub(crate) step_budget: u64,
    pub(crate) stop: Option<Receiver<()>>,
}

impl SolverConfig {
    /// Start building a configuration.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::new()
    }
}

/// Builder for [`SolverConfig`].
pub struct SolverConfigBuilder {
    lattice: Option<Box<dyn Lattice>>,
    materials: Option<MaterialMap>,
    fields: Vec<(FieldDef, Option<Vec<f32>>)>,
    kernel: Option<Box<dyn UpdateKernel>>,
    boundary: Option<BoundaryPolicy>,
    timestep: Timestep,
    step_budget: u64,
    stop: Option<Receiver<()>>,
}

impl SolverConfigBuilder {
    fn new() -> Self {
        Self {
            lattice: None,
            materials: None,
            fields: Vec::new(),
            kernel: None,
            boundary: None,
            timestep: Timestep::Auto,
            step_budget: 0,
            stop: None,
        }
    }

    /// Set the lattice.
    pub fn lattice(mut self, lattice: impl Lattice) -> Self {
        self.lattice = Some(Box::new(lattice));
        self
    }

    /// Set the material map.
    pub fn materials(mut self, materials: MaterialMap) -> Self {
        self.materials = Some(materials);
        self
    }

    /// Declare a field starting from an all-zero state.
    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push((def, None));
        self
    }

    /// Declare a field with an initial state. Initial values pass the
    /// same amplitude clamp/flush rule as computed values.
    pub fn field_with_initial(mut self, def: FieldDef, initial: Vec<f32>) -> Self {
        self.fields.push((def, Some(initial)));
        self
    }

    /// Set the update kernel.
    pub fn kernel(mut self, kernel: impl UpdateKernel + 'static) -> Self {
        self.kernel = Some(Box::new(kernel));
        self
    }

    /// Set the boundary policy.
    pub fn boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Set the timestep selection (default: [`Timestep::Auto`]).
    pub fn timestep(mut self, timestep: Timestep) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the number of steps `run()` executes.
    pub fn step_budget(mut self, steps: u64) -> Self {
        self.step_budget = steps;
        self
    }

    /// Attach an external stop signal, honored at step boundaries.
    pub fn stop_signal(mut self, stop: Receiver<()>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Check structural completeness and assemble the configuration.
    ///
    /// Semantic validation (Courant bound, buffer sizes) happens in
    /// [`Driver::new`](crate::driver::Driver::new).
    pub fn build(self) -> Result<SolverConfig, String> {
        let lattice = self.lattice.ok_or("lattice is required")?;
        let materials = self.materials.ok_or("materials are required")?;
        let kernel = self.kernel.ok_or("kernel is required")?;
        let boundary = self.boundary.ok_or("boundary policy is required")?;
        Ok(SolverConfig {
            lattice,
            materials,
            fields: self.fields,
            kernel,
            boundary,
            timestep: self.timestep,
            step_budget: self.step_budget,
            stop: self.stop,
        })
    }
}

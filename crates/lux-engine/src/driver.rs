//! The time-stepping driver.

use lux_core::constants::clamp_amplitude;
use lux_core::{FieldId, KernelError, StepError, StepId};
use lux_grid::{FieldStore, GridError, GridSnapshot, OwnedGridSnapshot};
use lux_kernel::{BoundaryHandler, StepContext};

use crate::config::{ConfigError, SolverConfig, Timestep, AUTO_DT_SAFETY};

/// Where the run currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Validated, no step taken yet.
    Configured,
    /// At least one step published; budget not yet exhausted.
    Running,
    /// The step budget was exhausted or the stop signal fired.
    Completed,
    /// A step produced a non-finite value. Terminal: the offending
    /// step was discarded and no further steps will execute.
    Diverged {
        /// The step that diverged (never published).
        step: StepId,
    },
}

/// Owns a validated configuration and advances it step by step.
///
/// The published generation only ever changes inside [`Driver::step`],
/// and snapshots borrow `&self`, so a snapshot can never observe a
/// half-written step.
pub struct Driver {
    config: SolverConfig,
    store: FieldStore,
    handler: BoundaryHandler,
    dt: f32,
    steps_done: u64,
    state: RunState,
}

impl Driver {
    /// Validate a configuration and prepare the initial state.
    ///
    /// Fails fast on an empty field set, a zero step budget, a material
    /// map that does not cover the lattice, kernel fields that were
    /// never declared, mis-sized initial buffers, and any timestep above
    /// the kernel's stability bound.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        if config.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        if config.step_budget == 0 {
            return Err(ConfigError::ZeroStepBudget);
        }
        let cell_count = config.lattice.cell_count();
        if config.materials.cell_count() != cell_count {
            return Err(ConfigError::MaterialSizeMismatch {
                expected: cell_count,
                got: config.materials.cell_count(),
            });
        }

        let mut store = FieldStore::new(cell_count);
        for (def, initial) in &config.fields {
            let id = store.register_field(def.clone())?;
            if let Some(values) = initial {
                // Initial state obeys the same amplitude rule as
                // computed values. NaN survives the clamp and will
                // surface as a divergence on the first step.
                let clamped: Vec<f32> = values.iter().map(|&v| clamp_amplitude(v)).collect();
                store.set_initial(id, &clamped)?;
            }
        }

        let field_count = config.fields.len() as u32;
        for (field, _) in config.kernel.fields() {
            if field.0 >= field_count {
                return Err(ConfigError::UnknownKernelField { field });
            }
        }

        let limit = config
            .kernel
            .max_dt(config.lattice.as_ref(), &config.materials);
        let dt = match config.timestep {
            Timestep::Fixed(dt) => {
                if !dt.is_finite() || dt <= 0.0 || dt > limit {
                    return Err(ConfigError::UnstableTimestep { dt, limit });
                }
                dt
            }
            Timestep::Auto => {
                let dt = AUTO_DT_SAFETY * limit;
                if !dt.is_finite() || dt <= 0.0 {
                    return Err(ConfigError::UnstableTimestep { dt, limit });
                }
                dt
            }
        };

        let handler = BoundaryHandler::new(config.boundary);
        Ok(Self {
            config,
            store,
            handler,
            dt,
            steps_done: 0,
            state: RunState::Configured,
        })
    }

    /// The resolved timestep (seconds).
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of published steps so far.
    pub fn steps_done(&self) -> u64 {
        self.steps_done
    }

    /// Simulation time of the published state (seconds).
    pub fn sim_time(&self) -> f64 {
        self.store.sim_time()
    }

    /// Look up a declared field by name.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.store
            .fields()
            .find(|(_, def)| def.name == name)
            .map(|(id, _)| id)
    }

    /// Borrow the published state.
    pub fn snapshot(&self) -> GridSnapshot<'_> {
        self.store.snapshot()
    }

    /// Clone the published state out for external consumers.
    pub fn owned_snapshot(&self) -> OwnedGridSnapshot {
        self.store.owned_snapshot()
    }

    /// Advance one step: kernel interior pass, boundary pass, publish.
    ///
    /// On divergence the step is discarded, the published state keeps
    /// its pre-step values, the step counter does not advance, and the
    /// driver enters the terminal [`RunState::Diverged`].
    pub fn step(&mut self) -> Result<StepId, StepError> {
        match self.state {
            RunState::Diverged { step } => return Err(StepError::Diverged { step }),
            RunState::Completed => return Err(StepError::AlreadyFinished),
            RunState::Configured | RunState::Running => {}
        }
        if self.steps_done >= self.config.step_budget {
            self.state = RunState::Completed;
            return Err(StepError::AlreadyFinished);
        }

        let next = StepId(self.steps_done + 1);
        let result = {
            let mut guard = self.store.begin_step().map_err(internal)?;
            let mut ctx = StepContext::new(
                &guard.reader,
                &mut guard.writer,
                self.config.lattice.as_ref(),
                &self.config.materials,
                self.dt,
                next,
            );
            self.config
                .kernel
                .step(&mut ctx)
                .and_then(|()| self.handler.apply(self.config.kernel.as_ref(), &mut ctx))
        };

        match result {
            Ok(()) => {
                let sim_time = next.0 as f64 * self.dt as f64;
                self.store.publish(next, sim_time).map_err(internal)?;
                self.steps_done += 1;
                self.state = if self.steps_done >= self.config.step_budget {
                    RunState::Completed
                } else {
                    RunState::Running
                };
                Ok(next)
            }
            Err(err) => {
                self.store.discard_step().map_err(internal)?;
                match err {
                    KernelError::NumericDivergence { .. } => {
                        self.state = RunState::Diverged { step: next };
                        Err(StepError::Diverged { step: next })
                    }
                    other => Err(StepError::Kernel {
                        name: self.config.kernel.name().to_string(),
                        reason: other,
                    }),
                }
            }
        }
    }

    /// Run to the step budget or the stop signal, whichever first.
    ///
    /// The stop signal is polled only between steps; a step in flight
    /// always finishes. Returns the terminal state reached.
    pub fn run(&mut self) -> Result<RunState, StepError> {
        loop {
            match self.state {
                RunState::Diverged { step } => return Err(StepError::Diverged { step }),
                RunState::Completed => return Ok(self.state),
                RunState::Configured | RunState::Running => {}
            }
            if self.stop_requested() || self.steps_done >= self.config.step_budget {
                self.state = RunState::Completed;
                return Ok(self.state);
            }
            self.step()?;
        }
    }

    fn stop_requested(&self) -> bool {
        match &self.config.stop {
            Some(stop) => stop.try_recv().is_ok(),
            None => false,
        }
    }
}

fn internal(err: GridError) -> StepError {
    StepError::Internal {
        reason: err.to_string(),
    }
}

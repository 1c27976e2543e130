//! Scalar wave kernel.
//!
//! Leapfrog displacement/velocity update with the local wave speed
//! taken from the material map:
//!
//! ```text
//! v'[i] = damping * (v[i] + dt * c[i]^2 * lap(u)[i])
//! u'[i] = u[i] + dt * v'[i]
//! ```
//!
//! where `lap` is the spacing-scaled discrete Laplacian. The velocity
//! update uses previous-generation displacements only, so the kernel
//! stays Jacobi-form; the displacement update folds in the locally
//! computed new velocity (semi-implicit Euler), which is what keeps
//! the oscillation from spiraling outward.

use crate::context::StepContext;
use crate::kernel::UpdateKernel;
use lux_core::constants::clamp_amplitude;
use lux_core::{FieldId, FieldRole, KernelError};
use lux_grid::{Lattice, MaterialMap};

/// Displacement/velocity wave kernel.
#[derive(Debug, Clone)]
pub struct ScalarWaveKernel {
    displacement: FieldId,
    velocity: FieldId,
    damping: f32,
}

impl ScalarWaveKernel {
    /// Start building a kernel.
    pub fn builder() -> ScalarWaveKernelBuilder {
        ScalarWaveKernelBuilder::default()
    }

    /// The displacement field this kernel updates.
    pub fn displacement(&self) -> FieldId {
        self.displacement
    }

    /// The velocity field this kernel updates.
    pub fn velocity(&self) -> FieldId {
        self.velocity
    }

    /// Per-step velocity retention factor.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    fn pair_at(
        &self,
        lattice: &dyn Lattice,
        u_prev: &[f32],
        v_prev: &[f32],
        dt: f32,
        speed_sq_over_dx_sq: f32,
        cell: usize,
    ) -> Result<(f32, f32), KernelError> {
        let mut lap = 0.0_f32;
        for axis in 0..lattice.ndim() {
            let (minus, plus) = lattice.axis_neighbours_wrapped(cell, axis);
            lap += u_prev[minus] - 2.0 * u_prev[cell] + u_prev[plus];
        }
        let v_raw = self.damping * (v_prev[cell] + dt * speed_sq_over_dx_sq * lap);
        let v = finalize(self.velocity, cell, v_raw)?;
        let u = finalize(self.displacement, cell, u_prev[cell] + dt * v)?;
        Ok((u, v))
    }
}

fn finalize(field: FieldId, cell: usize, value: f32) -> Result<f32, KernelError> {
    if !value.is_finite() {
        return Err(KernelError::NumericDivergence { field, cell });
    }
    Ok(clamp_amplitude(value))
}

fn read_field<'a>(
    ctx: &StepContext<'a>,
    field: FieldId,
    cell_count: usize,
) -> Result<&'a [f32], KernelError> {
    let buf = ctx
        .reader
        .read(field)
        .ok_or(KernelError::FieldNotReadable { field })?;
    if buf.len() != cell_count {
        return Err(KernelError::FieldNotReadable { field });
    }
    Ok(buf)
}

impl UpdateKernel for ScalarWaveKernel {
    fn name(&self) -> &str {
        "scalar_wave"
    }

    fn fields(&self) -> Vec<(FieldId, FieldRole)> {
        vec![
            (self.displacement, FieldRole::Displacement),
            (self.velocity, FieldRole::Velocity),
        ]
    }

    fn max_dt(&self, lattice: &dyn Lattice, materials: &MaterialMap) -> f32 {
        lattice.spacing() / (materials.max_speed() * (lattice.ndim() as f32).sqrt())
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), KernelError> {
        let lattice = ctx.lattice;
        let n = lattice.cell_count();
        let u_prev = read_field(ctx, self.displacement, n)?;
        let v_prev = read_field(ctx, self.velocity, n)?;
        let speed = ctx.materials.speed();
        let dt = ctx.dt;
        let inv_dx_sq = 1.0 / (lattice.spacing() * lattice.spacing());

        for pick_u in [true, false] {
            let field = if pick_u { self.displacement } else { self.velocity };
            let out = ctx
                .writer
                .write(field)
                .ok_or(KernelError::FieldNotWritable { field })?;
            for cell in 0..n {
                if !lattice.is_interior(cell) {
                    continue;
                }
                let c = speed[cell];
                let (u, v) = self.pair_at(lattice, u_prev, v_prev, dt, c * c * inv_dx_sq, cell)?;
                out[cell] = if pick_u { u } else { v };
            }
        }
        Ok(())
    }

    fn update_cell_wrapped(
        &self,
        ctx: &mut StepContext<'_>,
        cell: usize,
    ) -> Result<(), KernelError> {
        let lattice = ctx.lattice;
        let n = lattice.cell_count();
        let u_prev = read_field(ctx, self.displacement, n)?;
        let v_prev = read_field(ctx, self.velocity, n)?;
        let c = ctx.materials.speed()[cell];
        let inv_dx_sq = 1.0 / (lattice.spacing() * lattice.spacing());
        let (u, v) = self.pair_at(lattice, u_prev, v_prev, ctx.dt, c * c * inv_dx_sq, cell)?;
        for (field, value) in [(self.displacement, u), (self.velocity, v)] {
            let out = ctx
                .writer
                .write(field)
                .ok_or(KernelError::FieldNotWritable { field })?;
            out[cell] = value;
        }
        Ok(())
    }
}

/// Builder for [`ScalarWaveKernel`].
#[derive(Debug)]
pub struct ScalarWaveKernelBuilder {
    displacement: Option<FieldId>,
    velocity: Option<FieldId>,
    damping: f32,
}

impl Default for ScalarWaveKernelBuilder {
    fn default() -> Self {
        Self {
            displacement: None,
            velocity: None,
            damping: 1.0,
        }
    }
}

impl ScalarWaveKernelBuilder {
    /// Set the displacement field.
    pub fn displacement(mut self, field: FieldId) -> Self {
        self.displacement = Some(field);
        self
    }

    /// Set the velocity field.
    pub fn velocity(mut self, field: FieldId) -> Self {
        self.velocity = Some(field);
        self
    }

    /// Per-step velocity retention in `(0, 1]`; 1.0 means lossless.
    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<ScalarWaveKernel, String> {
        let displacement = self.displacement.ok_or("displacement field is required")?;
        let velocity = self.velocity.ok_or("velocity field is required")?;
        if displacement == velocity {
            return Err(format!(
                "displacement and velocity fields must differ, both are {displacement}"
            ));
        }
        if !self.damping.is_finite() || self.damping <= 0.0 || self.damping > 1.0 {
            return Err(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            ));
        }
        Ok(ScalarWaveKernel {
            displacement,
            velocity,
            damping: self.damping,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::{FieldDef, StepId};
    use lux_grid::{FieldStore, Line1D};

    fn setup(len: u32, damping: f32) -> (Line1D, MaterialMap, FieldStore, ScalarWaveKernel) {
        let lattice = Line1D::new(len, 1.0).unwrap();
        // Unit wave speed keeps the expected values easy to read.
        let n = len as usize;
        let materials =
            MaterialMap::from_raw_parts(n, vec![1.0; n], vec![1.0; n], vec![1.0; n]).unwrap();
        let mut store = FieldStore::new(n);
        let u = store
            .register_field(FieldDef::new("u", FieldRole::Displacement))
            .unwrap();
        let v = store
            .register_field(FieldDef::new("v", FieldRole::Velocity))
            .unwrap();
        let kernel = ScalarWaveKernel::builder()
            .displacement(u)
            .velocity(v)
            .damping(damping)
            .build()
            .unwrap();
        (lattice, materials, store, kernel)
    }

    fn run_step(
        lattice: &Line1D,
        materials: &MaterialMap,
        store: &mut FieldStore,
        kernel: &ScalarWaveKernel,
        dt: f32,
    ) {
        let mut guard = store.begin_step().unwrap();
        let mut ctx = StepContext::new(
            &guard.reader,
            &mut guard.writer,
            lattice,
            materials,
            dt,
            StepId(1),
        );
        kernel.step(&mut ctx).unwrap();
        drop(guard);
        store.publish(StepId(1), dt as f64).unwrap();
    }

    #[test]
    fn builder_validates_fields_and_damping() {
        assert!(ScalarWaveKernel::builder().build().is_err());
        assert!(ScalarWaveKernel::builder()
            .displacement(FieldId(0))
            .velocity(FieldId(0))
            .build()
            .is_err());
        for damping in [0.0_f32, -0.1, 1.1, f32::NAN] {
            assert!(
                ScalarWaveKernel::builder()
                    .displacement(FieldId(0))
                    .velocity(FieldId(1))
                    .damping(damping)
                    .build()
                    .is_err(),
                "damping {damping}"
            );
        }
    }

    #[test]
    fn flat_field_stays_static() {
        let (lattice, materials, mut store, kernel) = setup(6, 1.0);
        let u = kernel.displacement();
        store.set_initial(u, &[0.5; 6]).unwrap();
        run_step(&lattice, &materials, &mut store, &kernel, 0.5);
        for cell in 1..5 {
            assert_eq!(store.read_cell(u, cell).unwrap(), 0.5);
            assert_eq!(store.read_cell(kernel.velocity(), cell).unwrap(), 0.0);
        }
    }

    #[test]
    fn impulse_accelerates_neighbours() {
        let (lattice, materials, mut store, kernel) = setup(5, 1.0);
        let u = kernel.displacement();
        let v = kernel.velocity();
        store.set_initial(u, &[0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        run_step(&lattice, &materials, &mut store, &kernel, 0.5);

        let tol = 1e-6;
        // Laplacian pulls the peak down and its neighbours up.
        assert!((store.read_cell(v, 1).unwrap() - 0.5).abs() < tol);
        assert!((store.read_cell(v, 2).unwrap() + 1.0).abs() < tol);
        assert!((store.read_cell(v, 3).unwrap() - 0.5).abs() < tol);
        assert!((store.read_cell(u, 1).unwrap() - 0.25).abs() < tol);
        assert!((store.read_cell(u, 2).unwrap() - 0.5).abs() < tol);
        assert!((store.read_cell(u, 3).unwrap() - 0.25).abs() < tol);
    }

    #[test]
    fn damping_attenuates_velocity() {
        let (lattice, materials, mut store, kernel) = setup(5, 0.5);
        let v = kernel.velocity();
        store.set_initial(v, &[0.0, 0.8, 0.8, 0.8, 0.0]).unwrap();
        run_step(&lattice, &materials, &mut store, &kernel, 0.5);
        for cell in 1..4 {
            assert!((store.read_cell(v, cell).unwrap() - 0.4).abs() < 1e-6);
        }
    }

    #[test]
    fn divergent_velocity_names_the_field() {
        let (lattice, materials, mut store, kernel) = setup(5, 1.0);
        let v = kernel.velocity();
        store
            .set_initial(v, &[0.0, f32::INFINITY, 0.0, 0.0, 0.0])
            .unwrap();
        let mut guard = store.begin_step().unwrap();
        let mut ctx = StepContext::new(
            &guard.reader,
            &mut guard.writer,
            &lattice,
            &materials,
            0.5,
            StepId(1),
        );
        match kernel.step(&mut ctx) {
            Err(KernelError::NumericDivergence { field, cell }) => {
                assert_eq!(field, v);
                assert_eq!(cell, 1);
            }
            other => panic!("expected divergence, got {other:?}"),
        }
    }
}

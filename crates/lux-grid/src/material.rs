//! Per-cell material coefficient maps.
//!
//! Coefficients are derived from permittivity and permeability once at
//! configuration time, so the per-step kernels never divide or take
//! square roots. Validated constructors reject any cell whose derived
//! coefficients are non-finite; [`MaterialMap::from_raw_parts`] skips
//! that validation for precomputed tables and is only length-checked.

use crate::error::GridError;
use lux_core::constants::{EPSILON, MU};

/// Per-cell material coefficients for a lattice.
///
/// Stores relative permittivity and permeability as supplied, plus the
/// derived local wave speed `1 / sqrt(eps_r * EPSILON * mu_r * MU)` per
/// cell. All buffers have exactly one entry per lattice cell.
#[derive(Clone, Debug)]
pub struct MaterialMap {
    eps: Vec<f32>,
    mu: Vec<f32>,
    speed: Vec<f32>,
    max_speed: f32,
}

impl MaterialMap {
    /// Vacuum everywhere: relative permittivity and permeability of 1.
    pub fn vacuum(cell_count: usize) -> Self {
        // Derived speed is LIGHTSPEED up to rounding; uniform() cannot
        // fail for (1, 1).
        Self::uniform_unchecked(cell_count, 1.0, 1.0)
    }

    /// One material filling the whole lattice.
    ///
    /// `eps_r` and `mu_r` are relative to [`EPSILON`] and [`MU`].
    /// Returns `GridError::OutOfRange` if the derived wave speed is
    /// non-finite or non-positive.
    pub fn uniform(cell_count: usize, eps_r: f32, mu_r: f32) -> Result<Self, GridError> {
        let speed = derive_speed(eps_r, mu_r);
        if !speed.is_finite() || speed <= 0.0 {
            return Err(GridError::OutOfRange {
                cell: 0,
                value: speed,
            });
        }
        Ok(Self::uniform_unchecked(cell_count, eps_r, mu_r))
    }

    fn uniform_unchecked(cell_count: usize, eps_r: f32, mu_r: f32) -> Self {
        let speed = derive_speed(eps_r, mu_r);
        Self {
            eps: vec![eps_r; cell_count],
            mu: vec![mu_r; cell_count],
            speed: vec![speed; cell_count],
            max_speed: speed,
        }
    }

    /// Per-cell materials from relative permittivity and permeability
    /// buffers.
    ///
    /// Both buffers must have `cell_count` entries. Every cell's derived
    /// wave speed must come out finite and positive; the first offending
    /// cell is reported as `GridError::OutOfRange`.
    pub fn per_cell(cell_count: usize, eps_r: &[f32], mu_r: &[f32]) -> Result<Self, GridError> {
        if eps_r.len() != cell_count {
            return Err(GridError::SizeMismatch {
                expected: cell_count,
                got: eps_r.len(),
            });
        }
        if mu_r.len() != cell_count {
            return Err(GridError::SizeMismatch {
                expected: cell_count,
                got: mu_r.len(),
            });
        }
        let mut speed = Vec::with_capacity(cell_count);
        let mut max_speed = 0.0_f32;
        for (cell, (&e, &m)) in eps_r.iter().zip(mu_r.iter()).enumerate() {
            let s = derive_speed(e, m);
            if !s.is_finite() || s <= 0.0 {
                return Err(GridError::OutOfRange { cell, value: s });
            }
            max_speed = max_speed.max(s);
            speed.push(s);
        }
        Ok(Self {
            eps: eps_r.to_vec(),
            mu: mu_r.to_vec(),
            speed,
            max_speed,
        })
    }

    /// Build a map directly from precomputed coefficient tables,
    /// skipping the finiteness validation of [`MaterialMap::per_cell`].
    ///
    /// Only buffer lengths are checked. A non-finite speed entry will
    /// surface later as a kernel divergence on the first step rather
    /// than here. Intended for tables exported by external tooling.
    pub fn from_raw_parts(
        cell_count: usize,
        eps_r: Vec<f32>,
        mu_r: Vec<f32>,
        speed: Vec<f32>,
    ) -> Result<Self, GridError> {
        for buf in [&eps_r, &mu_r, &speed] {
            if buf.len() != cell_count {
                return Err(GridError::SizeMismatch {
                    expected: cell_count,
                    got: buf.len(),
                });
            }
        }
        // Non-finite entries stay out of the stability bound; they
        // surface in the kernel as a divergence on the first step.
        let max_speed = speed
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .fold(0.0_f32, f32::max);
        Ok(Self {
            eps: eps_r,
            mu: mu_r,
            speed,
            max_speed,
        })
    }

    /// Number of cells covered by this map.
    pub fn cell_count(&self) -> usize {
        self.speed.len()
    }

    /// Relative permittivity per cell.
    pub fn eps(&self) -> &[f32] {
        &self.eps
    }

    /// Relative permeability per cell.
    pub fn mu(&self) -> &[f32] {
        &self.mu
    }

    /// Derived local wave speed per cell (meters per second).
    pub fn speed(&self) -> &[f32] {
        &self.speed
    }

    /// The fastest wave speed anywhere on the lattice. Drives the
    /// Courant timestep bound.
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }
}

/// Local wave speed for relative permittivity `eps_r` and permeability
/// `mu_r`: `1 / sqrt(eps_r * EPSILON * mu_r * MU)`.
fn derive_speed(eps_r: f32, mu_r: f32) -> f32 {
    1.0 / (eps_r * EPSILON * mu_r * MU).sqrt()
}

//! The physical and numeric constant set.
//!
//! Every constant is a single-precision `f32`. The solver targets
//! accelerator hardware where double precision is either unavailable or
//! heavily penalized, so the entire numeric pipeline — constants, field
//! storage, and kernel arithmetic — stays in `f32`. Simulation *time* is
//! accumulated in `f64` by the driver to avoid drift over long runs, but
//! no field value ever leaves single precision.
//!
//! The amplitude bounds [`MIN_VOL`] and [`MAX_VOL`] implement the clamp
//! invariant: after every completed step, each stored field value `v`
//! satisfies `|v| <= MAX_VOL`, and `|v| < MIN_VOL` implies `v == 0.0`.
//! The sub-threshold flush is an explicit branch rather than a reliance
//! on hardware flush-to-zero, which varies across accelerators.

/// π, single precision.
pub const PI: f32 = 3.141_592_653_589_793_2;

/// Speed of light in vacuum (m/s).
pub const LIGHTSPEED: f32 = 2.997_924_58e8;

/// Vacuum permittivity ε₀ (F/m).
pub const EPSILON: f32 = 8.854_187_817_6e-12;

/// Vacuum permeability μ₀ (H/m).
pub const MU: f32 = 1.256_637_061_4e-6;

/// Amplitude magnitudes below this threshold are flushed to exactly zero.
pub const MIN_VOL: f32 = 1.0e-5;

/// Maximum field amplitude magnitude; values are clamped to `±MAX_VOL`.
pub const MAX_VOL: f32 = 1.0;

/// Apply the shared amplitude hygiene rule to a finite value.
///
/// Clamps `v` into `[-MAX_VOL, MAX_VOL]`, then flushes magnitudes below
/// [`MIN_VOL`] to exactly `0.0`. The kernel and the boundary handler both
/// route every write through this function so the clamp invariant is
/// bit-identical regardless of which pass produced the value.
///
/// Non-finite inputs are the caller's responsibility: divergence detection
/// must happen *before* clamping, or an `Inf` would be silently folded
/// into `MAX_VOL`.
#[inline]
pub fn clamp_amplitude(v: f32) -> f32 {
    let clamped = v.clamp(-MAX_VOL, MAX_VOL);
    if clamped.abs() < MIN_VOL {
        0.0
    } else {
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn constants_match_reference_values() {
        assert_eq!(LIGHTSPEED, 299_792_458.0_f32);
        assert_eq!(MAX_VOL, 1.0);
        assert_eq!(MIN_VOL, 0.000_01);
        assert!((EPSILON - 8.854_187_8e-12).abs() < 1e-18);
        assert!((MU - 1.256_637_06e-6).abs() < 1e-12);
    }

    #[test]
    fn lightspeed_consistent_with_vacuum_constants() {
        // c = 1/sqrt(ε₀μ₀), within f32 tolerance.
        let derived = 1.0 / (EPSILON * MU).sqrt();
        assert!((derived - LIGHTSPEED).abs() / LIGHTSPEED < 1e-5);
    }

    #[test]
    fn clamp_bounds_positive_and_negative() {
        assert_eq!(clamp_amplitude(3.5), MAX_VOL);
        assert_eq!(clamp_amplitude(-3.5), -MAX_VOL);
        assert_eq!(clamp_amplitude(0.5), 0.5);
    }

    #[test]
    fn sub_threshold_flushes_to_exact_zero() {
        assert_eq!(clamp_amplitude(MIN_VOL / 2.0), 0.0);
        assert_eq!(clamp_amplitude(-MIN_VOL / 2.0), 0.0);
        // Sign of zero must not survive: exact 0.0, not -0.0.
        assert!(clamp_amplitude(-1.0e-9).to_bits() == 0.0_f32.to_bits());
    }

    #[test]
    fn threshold_itself_is_kept() {
        assert_eq!(clamp_amplitude(MIN_VOL), MIN_VOL);
        assert_eq!(clamp_amplitude(-MIN_VOL), -MIN_VOL);
    }

    proptest! {
        #[test]
        fn clamp_is_idempotent(v in -1.0e6_f32..1.0e6) {
            let once = clamp_amplitude(v);
            prop_assert_eq!(once.to_bits(), clamp_amplitude(once).to_bits());
        }

        #[test]
        fn clamp_output_within_bounds(v in -1.0e6_f32..1.0e6) {
            let out = clamp_amplitude(v);
            prop_assert!(out.abs() <= MAX_VOL);
            prop_assert!(out == 0.0 || out.abs() >= MIN_VOL);
        }
    }
}

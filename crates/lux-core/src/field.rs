//! Field definitions and the [`FieldRole`] classification.

/// Physical role of a field component.
///
/// The role decides how a reflecting boundary mirrors the component:
/// at a perfect conductor the tangential electric component flips sign
/// while the magnetic component is preserved. The scalar wave pair
/// follows the fixed-wall convention (displacement preserved, velocity
/// flipped). The role carries no other semantics; kernels address
/// fields purely by ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Electric field component; mirrored sign-inverted.
    Electric,
    /// Magnetic field component; mirrored sign-preserved.
    Magnetic,
    /// Scalar wave displacement; mirrored sign-preserved.
    Displacement,
    /// Scalar wave velocity; mirrored sign-inverted.
    Velocity,
}

impl FieldRole {
    /// Sign applied when a reflecting boundary mirrors this component.
    pub fn reflect_sign(self) -> f32 {
        match self {
            Self::Magnetic | Self::Displacement => 1.0,
            Self::Electric | Self::Velocity => -1.0,
        }
    }
}

/// Definition of a field registered with the solver.
///
/// Fields are the unit of per-cell state. Registration order assigns
/// the [`FieldId`](crate::FieldId): the n-th definition becomes field n.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Human-readable name for error reporting.
    pub name: String,
    /// Physical role, used by the reflecting boundary pass.
    pub role: FieldRole,
}

impl FieldDef {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, role: FieldRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

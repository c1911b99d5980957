//! Friction laws used by the rod contact models.
//!
//! Two regimes appear in rod contact:
//!
//! - **Viscous-capped Coulomb**: a viscous force opposing slip whose
//!   magnitude is capped at the Coulomb limit `μ |F_n|`. There is no
//!   stick/slip state; the cap approximates static friction.
//!
//! ```text
//! F_t = -min(c |v_t|, μ |F_n|) * v_t / (|v_t| + ε)
//! ```
//!
//! - **Directional Coulomb**: separate coefficients for motion along the
//!   rod (forward/backward) and across it (sideways), blended between the
//!   static and kinetic regimes by a slip function of the slip speed.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, non_negative};

/// Regularisation added to slip speeds before normalising.
pub const SLIP_EPSILON: f64 = 1e-14;

/// Sign function with `sign(0) = 0`.
///
/// Unlike [`f64::signum`], zero maps to zero so a body at rest selects the
/// average of the forward and backward coefficients.
#[must_use]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Static-to-kinetic blending factor for a slip speed.
///
/// Returns `1` (fully static) up to `tolerance`, then falls linearly to `0`
/// (fully kinetic) at `2 * tolerance`.
#[must_use]
pub fn slip_function(speed: f64, tolerance: f64) -> f64 {
    if speed <= tolerance {
        1.0
    } else {
        (1.0 - (speed / tolerance - 1.0).min(1.0)).abs()
    }
}

/// Viscous friction capped at the Coulomb limit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViscousCoulombFriction {
    /// Viscous coefficient multiplying the slip speed (N·s/m).
    pub velocity_damping_coefficient: f64,
    /// Coulomb coefficient (dimensionless).
    pub friction_coefficient: f64,
}

impl Default for ViscousCoulombFriction {
    fn default() -> Self {
        Self::frictionless()
    }
}

impl ViscousCoulombFriction {
    /// Create a friction law.
    #[must_use]
    pub const fn new(velocity_damping_coefficient: f64, friction_coefficient: f64) -> Self {
        Self {
            velocity_damping_coefficient,
            friction_coefficient,
        }
    }

    /// No friction.
    #[must_use]
    pub const fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Friction force opposing `slip_velocity`.
    ///
    /// `normal_force` is the magnitude of the normal contact force.
    #[must_use]
    pub fn compute_force(&self, slip_velocity: &Vector3<f64>, normal_force: f64) -> Vector3<f64> {
        let speed = slip_velocity.norm();
        let direction = slip_velocity / (speed + SLIP_EPSILON);
        let viscous = self.velocity_damping_coefficient * speed;
        let coulomb = self.friction_coefficient * normal_force;
        -direction * viscous.min(coulomb)
    }

    /// Validate the coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        non_negative(
            "velocity_damping_coefficient",
            self.velocity_damping_coefficient,
        )?;
        non_negative("friction_coefficient", self.friction_coefficient)
    }
}

/// Direction-dependent friction coefficients of a rod on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionalFriction {
    /// Coefficient for motion along `+tangent`.
    pub forward: f64,
    /// Coefficient for motion along `-tangent`.
    pub backward: f64,
    /// Coefficient for motion across the rod.
    pub sideways: f64,
}

impl DirectionalFriction {
    /// Create a set of coefficients.
    #[must_use]
    pub const fn new(forward: f64, backward: f64, sideways: f64) -> Self {
        Self {
            forward,
            backward,
            sideways,
        }
    }

    /// The same coefficient in every direction.
    #[must_use]
    pub const fn isotropic(mu: f64) -> Self {
        Self::new(mu, mu, mu)
    }

    /// Axial coefficient for a motion or force with the given axial sign.
    ///
    /// A zero sign gives the mean of forward and backward.
    #[must_use]
    pub fn axial(&self, direction_sign: f64) -> f64 {
        0.5 * (self.forward * (1.0 + direction_sign) + self.backward * (1.0 - direction_sign))
    }

    /// Validate the coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        non_negative("forward friction", self.forward)?;
        non_negative("backward friction", self.backward)?;
        non_negative("sideways friction", self.sideways)
    }
}

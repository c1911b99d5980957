//! Material and cross-section configuration for straight rods.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RodError};

/// Shear correction factor for a solid circular cross-section.
pub const CIRCULAR_SHEAR_CORRECTION: f64 = 4.0 / 3.0;

/// Configuration used by [`CosseratRod::straight`](crate::CosseratRod::straight).
///
/// All quantities are in SI units. The cross-section is a solid circle of
/// constant radius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodConfig {
    /// Cross-section radius (m).
    pub radius: f64,
    /// Material density (kg/m³).
    pub density: f64,
    /// Young's modulus E (Pa).
    pub youngs_modulus: f64,
    /// Shear modulus G (Pa).
    pub shear_modulus: f64,
    /// Shear correction factor α applied to the shear stiffnesses.
    pub shear_correction: f64,
    /// Kelvin-Voigt retardation time τ (s). `None` gives a purely elastic rod.
    pub retardation_time: Option<f64>,
}

impl Default for RodConfig {
    fn default() -> Self {
        Self::soft_filament(0.01)
    }
}

impl RodConfig {
    /// Create a config from explicit elastic moduli.
    ///
    /// The shear modulus is derived from `youngs_modulus` and `poisson_ratio`
    /// as `E / (2 (1 + ν))`.
    #[must_use]
    pub fn new(radius: f64, density: f64, youngs_modulus: f64, poisson_ratio: f64) -> Self {
        Self {
            radius,
            density,
            youngs_modulus,
            shear_modulus: youngs_modulus / (2.0 * (1.0 + poisson_ratio)),
            shear_correction: CIRCULAR_SHEAR_CORRECTION,
            retardation_time: None,
        }
    }

    /// Soft elastomer filament (silicone-like, E = 1 MPa).
    #[must_use]
    pub const fn soft_filament(radius: f64) -> Self {
        Self {
            radius,
            density: 1000.0,
            youngs_modulus: 1.0e6,
            shear_modulus: 1.0e6 / 3.0,
            shear_correction: CIRCULAR_SHEAR_CORRECTION,
            retardation_time: None,
        }
    }

    /// Biological cilium (microtubule bundle, E ≈ 1 GPa, water-like density).
    #[must_use]
    pub const fn cilium(radius: f64) -> Self {
        Self {
            radius,
            density: 1050.0,
            youngs_modulus: 1.0e9,
            shear_modulus: 1.0e9 / 3.0,
            shear_correction: CIRCULAR_SHEAR_CORRECTION,
            retardation_time: None,
        }
    }

    /// Steel cable.
    #[must_use]
    pub const fn steel_cable(radius: f64) -> Self {
        Self {
            radius,
            density: 7850.0,
            youngs_modulus: 200.0e9,
            shear_modulus: 79.3e9,
            shear_correction: CIRCULAR_SHEAR_CORRECTION,
            retardation_time: None,
        }
    }

    /// Set the cross-section radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the density.
    #[must_use]
    pub const fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Set Young's modulus.
    #[must_use]
    pub const fn with_youngs_modulus(mut self, youngs_modulus: f64) -> Self {
        self.youngs_modulus = youngs_modulus;
        self
    }

    /// Set the shear modulus.
    #[must_use]
    pub const fn with_shear_modulus(mut self, shear_modulus: f64) -> Self {
        self.shear_modulus = shear_modulus;
        self
    }

    /// Set the shear correction factor.
    #[must_use]
    pub const fn with_shear_correction(mut self, shear_correction: f64) -> Self {
        self.shear_correction = shear_correction;
        self
    }

    /// Enable strain-rate dependence with Kelvin-Voigt retardation time `tau`.
    ///
    /// The rate matrices become `τ S` and `τ B`.
    #[must_use]
    pub const fn with_retardation_time(mut self, tau: f64) -> Self {
        self.retardation_time = Some(tau);
        self
    }

    /// Cross-section area `π r²`.
    #[must_use]
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    /// Second moment of area about a principal bending axis, `π r⁴ / 4`.
    #[must_use]
    pub fn second_moment_of_area(&self) -> f64 {
        std::f64::consts::PI * self.radius.powi(4) / 4.0
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any physical parameter is non-positive or not finite.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("radius", self.radius),
            ("density", self.density),
            ("youngs_modulus", self.youngs_modulus),
            ("shear_modulus", self.shear_modulus),
            ("shear_correction", self.shear_correction),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RodError::invalid_config(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if let Some(tau) = self.retardation_time {
            if !(tau.is_finite() && tau >= 0.0) {
                return Err(RodError::invalid_config(format!(
                    "retardation_time must be non-negative and finite, got {tau}"
                )));
            }
        }
        Ok(())
    }
}

//! Linear constitutive laws mapping strains to internal stresses.
//!
//! ```text
//! n = S (σ - σ0)               strain only
//! τ = B (κ - κ0)
//!
//! n = S (σ - σ0) + S_r σ̇      with strain rate
//! τ = B (κ - κ0) + B_r κ̇
//! ```

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_simd::batch_matvec;

use crate::error::{Result, check_len};
use crate::strain::Strains;

/// Elastic rest state and stiffness matrices of a rod.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearElastic {
    /// Rest shear/stretch strain (`n`).
    pub rest_sigma: Vec<Vector3<f64>>,
    /// Rest bend/twist curvature (`n - 1`).
    pub rest_kappa: Vec<Vector3<f64>>,
    /// Shear/stretch stiffness per element (`n`).
    pub shear_matrix: Vec<Matrix3<f64>>,
    /// Bend/twist stiffness per Voronoi domain (`n - 1`).
    pub bend_matrix: Vec<Matrix3<f64>>,
}

impl LinearElastic {
    /// Stiffnesses with zero rest strain and curvature.
    #[must_use]
    pub fn unstressed(shear_matrix: Vec<Matrix3<f64>>, bend_matrix: Vec<Matrix3<f64>>) -> Self {
        Self {
            rest_sigma: vec![Vector3::zeros(); shear_matrix.len()],
            rest_kappa: vec![Vector3::zeros(); bend_matrix.len()],
            shear_matrix,
            bend_matrix,
        }
    }

    fn validate(&self, n: usize) -> Result<()> {
        let nv = n.saturating_sub(1);
        check_len("rest_sigma", &self.rest_sigma, n)?;
        check_len("rest_kappa", &self.rest_kappa, nv)?;
        check_len("shear_matrix", &self.shear_matrix, n)?;
        check_len("bend_matrix", &self.bend_matrix, nv)
    }
}

/// Damping matrices multiplying the strain rates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrainRateMatrices {
    /// Multiplies `σ̇` (`n`).
    pub shear_rate_matrix: Vec<Matrix3<f64>>,
    /// Multiplies `κ̇` (`n - 1`).
    pub bend_rate_matrix: Vec<Matrix3<f64>>,
}

impl StrainRateMatrices {
    /// Kelvin-Voigt rate matrices `τ S` and `τ B`.
    #[must_use]
    pub fn kelvin_voigt(elastic: &LinearElastic, retardation_time: f64) -> Self {
        Self {
            shear_rate_matrix: elastic
                .shear_matrix
                .iter()
                .map(|s| s * retardation_time)
                .collect(),
            bend_rate_matrix: elastic
                .bend_matrix
                .iter()
                .map(|b| b * retardation_time)
                .collect(),
        }
    }
}

/// Constitutive model owned by a rod.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstitutiveModel {
    /// Stresses depend on strain only.
    Linear(LinearElastic),
    /// Stresses add a term linear in the strain rates.
    LinearWithStrainRate {
        /// Elastic part.
        elastic: LinearElastic,
        /// Rate part.
        rate: StrainRateMatrices,
    },
}

/// Internal stresses of a rod.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stresses {
    /// Internal stress per element, material frame (`n`).
    pub internal_stress: Vec<Vector3<f64>>,
    /// Internal couple per Voronoi domain, material frame (`n - 1`).
    pub internal_couple: Vec<Vector3<f64>>,
}

impl ConstitutiveModel {
    /// The elastic part of the model.
    #[must_use]
    pub fn elastic(&self) -> &LinearElastic {
        match self {
            Self::Linear(elastic) | Self::LinearWithStrainRate { elastic, .. } => elastic,
        }
    }

    /// Whether stresses depend on strain rates.
    #[must_use]
    pub fn is_rate_dependent(&self) -> bool {
        matches!(self, Self::LinearWithStrainRate { .. })
    }

    /// Check every matrix collection against the element count.
    ///
    /// # Errors
    ///
    /// Returns [`RodError::DimensionMismatch`](crate::RodError::DimensionMismatch)
    /// for a collection of the wrong length.
    pub fn validate(&self, n: usize) -> Result<()> {
        self.elastic().validate(n)?;
        if let Self::LinearWithStrainRate { rate, .. } = self {
            check_len("shear_rate_matrix", &rate.shear_rate_matrix, n)?;
            check_len("bend_rate_matrix", &rate.bend_rate_matrix, n.saturating_sub(1))?;
        }
        Ok(())
    }

    /// Evaluate internal stress and couple for the given strains.
    #[must_use]
    pub fn compute_stresses(&self, strains: &Strains) -> Stresses {
        let elastic = self.elastic();

        let shear_strain: Vec<Vector3<f64>> = strains
            .sigma
            .iter()
            .zip(&elastic.rest_sigma)
            .map(|(s, s0)| s - s0)
            .collect();
        let bend_strain: Vec<Vector3<f64>> = strains
            .kappa
            .iter()
            .zip(&elastic.rest_kappa)
            .map(|(k, k0)| k - k0)
            .collect();

        let mut internal_stress = batch_matvec(&elastic.shear_matrix, &shear_strain);
        let mut internal_couple = batch_matvec(&elastic.bend_matrix, &bend_strain);

        if let Self::LinearWithStrainRate { rate, .. } = self {
            let viscous_stress = batch_matvec(&rate.shear_rate_matrix, &strains.sigma_rate);
            let viscous_couple = batch_matvec(&rate.bend_rate_matrix, &strains.kappa_rate);
            for (n, d) in internal_stress.iter_mut().zip(&viscous_stress) {
                *n += d;
            }
            for (c, d) in internal_couple.iter_mut().zip(&viscous_couple) {
                *c += d;
            }
        }

        Stresses {
            internal_stress,
            internal_couple,
        }
    }
}

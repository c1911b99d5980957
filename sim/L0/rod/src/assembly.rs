//! Internal force and torque assembly.
//!
//! ```text
//! f   = Δ( Qᵀ n / e )                           nodes
//!
//! τ   = Δ( τ_c / ε³ )                           bend/twist
//!     + A( κ × τ_c · D0 / ε³ )                  curvature coupling
//!     + (Q t) × n · l0                          shear/stretch coupling
//!     + (J ω / e) × ω                           lagrangian transport
//!     + (J ω / e) ė / e                         unsteady dilatation
//! ```
//!
//! `Δ` is [`difference_kernel`] and `A` is [`quadrature_kernel`]. The five
//! torque terms are evaluated separately and summed in this order.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_simd::{batch_cross, batch_matvec, batch_matvec_transpose, batch_scale};

use crate::calculus::{difference_kernel, quadrature_kernel};
use crate::constitutive::Stresses;
use crate::state::{RodProperties, RodState};
use crate::strain::Strains;

/// Net internal loads of a rod.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InternalLoads {
    /// Internal force per node, lab frame (`n + 1`).
    pub forces: Vec<Vector3<f64>>,
    /// Internal torque per element, material frame (`n`).
    pub torques: Vec<Vector3<f64>>,
}

/// The five contributions to the internal torque, one entry per element.
#[derive(Debug, Clone, PartialEq)]
pub struct TorqueTerms {
    /// Divergence of the internal couple.
    pub bend_twist: Vec<Vector3<f64>>,
    /// Curvature crossed with the couple.
    pub curvature_coupling: Vec<Vector3<f64>>,
    /// Tangent crossed with the internal stress.
    pub shear_stretch: Vec<Vector3<f64>>,
    /// Gyroscopic term of the rotating frame.
    pub lagrangian_transport: Vec<Vector3<f64>>,
    /// Correction for a changing element length.
    pub unsteady_dilatation: Vec<Vector3<f64>>,
}

impl TorqueTerms {
    /// Sum of all five terms.
    #[must_use]
    pub fn total(&self) -> Vec<Vector3<f64>> {
        (0..self.bend_twist.len())
            .map(|i| {
                self.bend_twist[i]
                    + self.curvature_coupling[i]
                    + self.shear_stretch[i]
                    + self.lagrangian_transport[i]
                    + self.unsteady_dilatation[i]
            })
            .collect()
    }
}

/// Assemble internal forces and torques from strains and stresses.
#[must_use]
pub fn assemble(
    state: &RodState,
    properties: &RodProperties,
    strains: &Strains,
    stresses: &Stresses,
) -> InternalLoads {
    InternalLoads {
        forces: internal_forces(state, strains, stresses),
        torques: torque_terms(state, properties, strains, stresses).total(),
    }
}

/// Nodal internal forces `Δ(Qᵀ n / e)`.
#[must_use]
pub fn internal_forces(
    state: &RodState,
    strains: &Strains,
    stresses: &Stresses,
) -> Vec<Vector3<f64>> {
    let inv_dilatation: Vec<f64> = strains.dilatation.iter().map(|e| 1.0 / e).collect();
    let lab_stress = batch_matvec_transpose(&state.directors, &stresses.internal_stress);
    difference_kernel(&batch_scale(&inv_dilatation, &lab_stress))
}

/// Evaluate each internal torque term separately.
#[must_use]
pub fn torque_terms(
    state: &RodState,
    properties: &RodProperties,
    strains: &Strains,
    stresses: &Stresses,
) -> TorqueTerms {
    let inv_voronoi_cubed: Vec<f64> = strains
        .voronoi_dilatation
        .iter()
        .map(|e| 1.0 / (e * e * e))
        .collect();

    let bend_twist = difference_kernel(&batch_scale(&inv_voronoi_cubed, &stresses.internal_couple));

    let coupling_weight: Vec<f64> = inv_voronoi_cubed
        .iter()
        .zip(&properties.rest_voronoi_lengths)
        .map(|(w, d0)| w * d0)
        .collect();
    let curvature_coupling = quadrature_kernel(&batch_scale(
        &coupling_weight,
        &batch_cross(&strains.kappa, &stresses.internal_couple),
    ));

    let shear_stretch = batch_scale(
        &properties.rest_lengths,
        &batch_cross(
            &batch_matvec(&state.directors, &strains.tangents),
            &stresses.internal_stress,
        ),
    );

    let inv_dilatation: Vec<f64> = strains.dilatation.iter().map(|e| 1.0 / e).collect();
    let j_omega_upon_e = batch_scale(
        &inv_dilatation,
        &batch_matvec(&properties.mass_second_moment_of_inertia, &state.omegas),
    );
    let lagrangian_transport = batch_cross(&j_omega_upon_e, &state.omegas);

    let rate_over_e: Vec<f64> = strains
        .dilatation_rate
        .iter()
        .zip(&strains.dilatation)
        .map(|(de, e)| de / e)
        .collect();
    let unsteady_dilatation = batch_scale(&rate_over_e, &j_omega_upon_e);

    TorqueTerms {
        bend_twist,
        curvature_coupling,
        shear_stretch,
        lagrangian_transport,
        unsteady_dilatation,
    }
}

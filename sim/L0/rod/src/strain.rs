//! Strain and dilatation engine.
//!
//! Turns the kinematic state of a rod into the geometric quantities the
//! constitutive model and the force assembler work with:
//!
//! ```text
//! positions ──► lengths, tangents, radius, dilatation, voronoi dilatation
//! velocities ─► dilatation rate, sigma rate
//! directors ──► sigma (shear/stretch), kappa (bend/twist)
//! omegas ─────► sigma rate, kappa rate
//! ```
//!
//! Everything here is a pure function of the current state.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_simd::{batch_cross, batch_dot, batch_matvec, batch_norm, batch_scale};

use crate::error::{Result, RodError};
use crate::rotations::inv_rotate;
use crate::state::{RodProperties, RodState};

/// Material-frame axis that an undeformed element's tangent maps onto.
pub const REFERENCE_AXIS: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// Geometric and strain quantities derived from one rod state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Strains {
    /// Element lengths (`n`).
    pub lengths: Vec<f64>,
    /// Element unit tangents, lab frame (`n`).
    pub tangents: Vec<Vector3<f64>>,
    /// Element radii from volume conservation (`n`).
    pub radius: Vec<f64>,
    /// Element stretch ratios `l / l0` (`n`).
    pub dilatation: Vec<f64>,
    /// Voronoi stretch ratios (`n - 1`).
    pub voronoi_dilatation: Vec<f64>,
    /// Time derivative of the element dilatation (`n`).
    pub dilatation_rate: Vec<f64>,
    /// Shear/stretch strain, material frame (`n`).
    pub sigma: Vec<Vector3<f64>>,
    /// Bend/twist curvature, material frame (`n - 1`).
    pub kappa: Vec<Vector3<f64>>,
    /// Time derivative of `sigma` (`n`).
    pub sigma_rate: Vec<Vector3<f64>>,
    /// Time derivative of `kappa` (`n - 1`).
    pub kappa_rate: Vec<Vector3<f64>>,
}

impl Strains {
    /// Number of elements.
    #[must_use]
    pub fn n_elements(&self) -> usize {
        self.lengths.len()
    }
}

/// Compute all strains of a rod state.
///
/// # Errors
///
/// Returns [`RodError::DimensionMismatch`] if state and properties disagree
/// on the element count, [`RodError::NonFiniteState`] for `NaN`/infinite
/// state entries, and [`RodError::DegenerateElement`] when two consecutive
/// nodes coincide.
pub fn compute_strains(state: &RodState, properties: &RodProperties) -> Result<Strains> {
    state.check_dimensions()?;
    let n = state.n_elements();
    properties.validate(n)?;
    state.check_finite()?;

    let edges: Vec<Vector3<f64>> = state.positions.windows(2).map(|w| w[1] - w[0]).collect();
    let lengths = batch_norm(&edges);
    if let Some(index) = lengths.iter().position(|&l| !(l.is_finite() && l > 0.0)) {
        return Err(RodError::degenerate_element(index, lengths[index]));
    }

    let inv_lengths: Vec<f64> = lengths.iter().map(|l| 1.0 / l).collect();
    let tangents = batch_scale(&inv_lengths, &edges);

    let radius: Vec<f64> = properties
        .volume
        .iter()
        .zip(&lengths)
        .map(|(v, l)| (v / (l * std::f64::consts::PI)).sqrt())
        .collect();

    let dilatation: Vec<f64> = lengths
        .iter()
        .zip(&properties.rest_lengths)
        .map(|(l, l0)| l / l0)
        .collect();

    let voronoi_dilatation: Vec<f64> = lengths
        .windows(2)
        .zip(&properties.rest_voronoi_lengths)
        .map(|(l, d0)| 0.5 * (l[0] + l[1]) / d0)
        .collect();

    // d/dt (l² / 2) = Δx · Δv, so ė = (Δx · Δv) / (l l0)
    let velocity_differences: Vec<Vector3<f64>> =
        state.velocities.windows(2).map(|w| w[1] - w[0]).collect();
    let dilatation_rate: Vec<f64> = batch_dot(&edges, &velocity_differences)
        .iter()
        .zip(lengths.iter().zip(&properties.rest_lengths))
        .map(|(r_dot_v, (l, l0))| r_dot_v / (l * l0))
        .collect();

    let material_tangents = batch_matvec(&state.directors, &tangents);
    let sigma: Vec<Vector3<f64>> = material_tangents
        .iter()
        .zip(&dilatation)
        .map(|(t, e)| t * *e - REFERENCE_AXIS)
        .collect();

    let kappa: Vec<Vector3<f64>> = inv_rotate(&state.directors)
        .into_iter()
        .zip(&properties.rest_voronoi_lengths)
        .map(|(theta, d0)| theta / *d0)
        .collect();

    let sigma_rate = compute_sigma_rate(state, properties, &sigma, &velocity_differences);
    let kappa_rate = compute_kappa_rate(state, properties, &kappa);

    Ok(Strains {
        lengths,
        tangents,
        radius,
        dilatation,
        voronoi_dilatation,
        dilatation_rate,
        sigma,
        kappa,
        sigma_rate,
        kappa_rate,
    })
}

/// `σ̇ = Q Δv / l0 + (σ + e3) × ω`
fn compute_sigma_rate(
    state: &RodState,
    properties: &RodProperties,
    sigma: &[Vector3<f64>],
    velocity_differences: &[Vector3<f64>],
) -> Vec<Vector3<f64>> {
    let inv_rest: Vec<f64> = properties.rest_lengths.iter().map(|l0| 1.0 / l0).collect();
    let stretch_rate = batch_scale(&inv_rest, &batch_matvec(&state.directors, velocity_differences));

    let shifted: Vec<Vector3<f64>> = sigma.iter().map(|s| s + REFERENCE_AXIS).collect();
    let rotation_rate = batch_cross(&shifted, &state.omegas);

    stretch_rate
        .iter()
        .zip(&rotation_rate)
        .map(|(a, b)| a + b)
        .collect()
}

/// `κ̇ = Δω / D0 + κ × ω̄`
fn compute_kappa_rate(
    state: &RodState,
    properties: &RodProperties,
    kappa: &[Vector3<f64>],
) -> Vec<Vector3<f64>> {
    state
        .omegas
        .windows(2)
        .zip(kappa)
        .zip(&properties.rest_voronoi_lengths)
        .map(|((w, k), d0)| (w[1] - w[0]) / *d0 + k.cross(&((w[0] + w[1]) * 0.5)))
        .collect()
}

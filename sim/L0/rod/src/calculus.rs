//! Discrete calculus on the staggered rod grid.
//!
//! A rod with `n` elements has `n + 1` nodes and `n - 1` interior Voronoi
//! domains. Quantities move between these grids with the kernels below.
//!
//! ```text
//! nodes      ●─────●─────●─────●        n + 1
//! elements      0     1     2           n
//! voronoi          0     1              n - 1
//! ```
//!
//! [`difference_kernel`] and [`quadrature_kernel`] both lift a collection
//! of length `m` onto `m + 1` slots, padding with zero at the boundaries.

use nalgebra::Vector3;

/// Discrete divergence with zero boundary values.
///
/// `out[0] = in[0]`, `out[i] = in[i] - in[i-1]`, `out[m] = -in[m-1]`.
///
/// # Example
///
/// ```
/// use sim_rod::calculus::difference_kernel;
/// use nalgebra::Vector3;
///
/// let out = difference_kernel(&[Vector3::x(), Vector3::x()]);
/// assert_eq!(out, vec![Vector3::x(), Vector3::zeros(), -Vector3::x()]);
/// ```
#[must_use]
pub fn difference_kernel(input: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let mut out = vec![Vector3::zeros(); input.len() + 1];
    for (i, v) in input.iter().enumerate() {
        out[i] += v;
        out[i + 1] -= v;
    }
    out
}

/// Trapezoidal averaging with zero boundary values.
///
/// `out[0] = in[0] / 2`, `out[i] = (in[i] + in[i-1]) / 2`, `out[m] = in[m-1] / 2`.
#[must_use]
pub fn quadrature_kernel(input: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let mut out = vec![Vector3::zeros(); input.len() + 1];
    for (i, v) in input.iter().enumerate() {
        let half = v * 0.5;
        out[i] += half;
        out[i + 1] += half;
    }
    out
}

/// Element midpoints from node positions.
#[must_use]
pub fn node_to_element_position(positions: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    positions.windows(2).map(|w| (w[0] + w[1]) * 0.5).collect()
}

/// Element velocities as the mass-weighted average of the two end nodes.
#[must_use]
pub fn node_to_element_velocity(mass: &[f64], velocities: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    debug_assert_eq!(mass.len(), velocities.len());
    mass.windows(2)
        .zip(velocities.windows(2))
        .map(|(m, v)| (v[0] * m[0] + v[1] * m[1]) / (m[0] + m[1]))
        .collect()
}

/// Reduce nodal forces onto elements.
///
/// Each element takes half of each end node. The two end nodes have only
/// one neighbouring element, so their remaining half is folded into the
/// first and last element so no force is lost.
#[must_use]
pub fn node_to_element_force(forces: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let mut out: Vec<Vector3<f64>> = forces.windows(2).map(|w| (w[0] + w[1]) * 0.5).collect();
    if let (Some(first), Some(last)) = (forces.first(), forces.last()) {
        let n = out.len();
        if n > 0 {
            out[0] += first * 0.5;
            out[n - 1] += last * 0.5;
        }
    }
    out
}

/// Add element forces onto nodes, half to each end node.
pub fn elements_to_nodes_add(element_forces: &[Vector3<f64>], node_forces: &mut [Vector3<f64>]) {
    debug_assert_eq!(element_forces.len() + 1, node_forces.len());
    for (i, f) in element_forces.iter().enumerate() {
        let half = f * 0.5;
        node_forces[i] += half;
        node_forces[i + 1] += half;
    }
}

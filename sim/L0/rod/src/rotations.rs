//! Relative rotations between neighbouring director frames.

use nalgebra::{Matrix3, Vector3};

/// Rotation vectors between consecutive director frames.
///
/// Directors are stored as matrix rows. For every pair `(Q_k, Q_{k+1})` the
/// result is the axis-angle vector of `Q_k Q_{k+1}ᵀ`, expressed in the
/// material frame. Produces `directors.len() - 1` vectors.
///
/// A frame that is rotated by `+θ` about its own `d3` relative to its
/// predecessor yields `(0, 0, θ)`.
#[must_use]
pub fn inv_rotate(directors: &[Matrix3<f64>]) -> Vec<Vector3<f64>> {
    directors
        .windows(2)
        .map(|pair| relative_rotation_vector(&pair[0], &pair[1]))
        .collect()
}

fn relative_rotation_vector(current: &Matrix3<f64>, next: &Matrix3<f64>) -> Vector3<f64> {
    // r[(a, b)] = d_a(next) · d_b(current)
    let r = next * current.transpose();

    let axis = Vector3::new(
        r[(2, 1)] - r[(1, 2)],
        r[(0, 2)] - r[(2, 0)],
        r[(1, 0)] - r[(0, 1)],
    );

    let cos_theta = (0.5 * r.trace() - 0.5 - 1e-10).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();

    axis * (-0.5 * theta / (theta + 1e-14).sin())
}

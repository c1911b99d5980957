//! Batch operations over per-element vector and matrix collections.
//!
//! Every rod quantity lives in a collection indexed by node, element or
//! Voronoi domain. These kernels apply one small linear-algebra operation to
//! each index of such collections. Vector-vector kernels run through
//! [`Vec3x4`] in chunks of 4 with a scalar tail.

use nalgebra::{Matrix3, Vector3};

use crate::{LANES, Vec3x4};

// =============================================================================
// Matrix-Vector Operations
// =============================================================================

/// Per-element matrix-vector product: `out[k] = M[k] · v[k]`.
///
/// # Example
///
/// ```
/// use sim_simd::batch_matvec;
/// use nalgebra::{Matrix3, Vector3};
///
/// let mats = vec![Matrix3::identity() * 2.0, Matrix3::identity()];
/// let vecs = vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 3.0, 0.0)];
///
/// let out = batch_matvec(&mats, &vecs);
/// assert_eq!(out[0], Vector3::new(2.0, 0.0, 0.0));
/// assert_eq!(out[1], Vector3::new(0.0, 3.0, 0.0));
/// ```
#[must_use]
pub fn batch_matvec(matrices: &[Matrix3<f64>], vectors: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    debug_assert_eq!(matrices.len(), vectors.len());
    matrices.iter().zip(vectors).map(|(m, v)| m * v).collect()
}

/// Per-element transposed matrix-vector product: `out[k] = M[k]ᵀ · v[k]`.
///
/// With directors stored as matrix rows this maps material-frame vectors
/// back into the lab frame.
#[must_use]
pub fn batch_matvec_transpose(
    matrices: &[Matrix3<f64>],
    vectors: &[Vector3<f64>],
) -> Vec<Vector3<f64>> {
    debug_assert_eq!(matrices.len(), vectors.len());
    matrices.iter().zip(vectors).map(|(m, v)| m.tr_mul(v)).collect()
}

// =============================================================================
// Vector-Vector Operations
// =============================================================================

/// Per-element cross product: `out[k] = a[k] × b[k]`.
#[must_use]
pub fn batch_cross(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len().min(b.len());
    let mut result = vec![Vector3::zeros(); n];

    let chunks = n / LANES;
    for chunk_idx in 0..chunks {
        let base = chunk_idx * LANES;
        let lhs = Vec3x4::load(&a[base..]);
        let rhs = Vec3x4::load(&b[base..]);
        lhs.cross(&rhs).store(&mut result[base..base + LANES]);
    }

    for i in chunks * LANES..n {
        result[i] = a[i].cross(&b[i]);
    }

    result
}

/// Per-element dot product: `out[k] = a[k] · b[k]`.
#[must_use]
pub fn batch_dot(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len().min(b.len());
    let mut result = Vec::with_capacity(n);

    let chunks = n / LANES;
    for chunk_idx in 0..chunks {
        let base = chunk_idx * LANES;
        let dots = Vec3x4::load(&a[base..]).dot(&Vec3x4::load(&b[base..]));
        result.extend_from_slice(&dots);
    }

    for i in chunks * LANES..n {
        result.push(a[i].dot(&b[i]));
    }

    result
}

/// Per-element Euclidean norm: `out[k] = |v[k]|`.
#[must_use]
pub fn batch_norm(vectors: &[Vector3<f64>]) -> Vec<f64> {
    let n = vectors.len();
    let mut result = Vec::with_capacity(n);

    let chunks = n / LANES;
    for chunk_idx in 0..chunks {
        let base = chunk_idx * LANES;
        result.extend_from_slice(&Vec3x4::load(&vectors[base..]).norm());
    }

    for v in &vectors[chunks * LANES..] {
        result.push(v.norm());
    }

    result
}

// =============================================================================
// Scalar-Vector Operations
// =============================================================================

/// Per-element scalar-times-vector product: `out[k] = s[k] · v[k]`.
///
/// # Example
///
/// ```
/// use sim_simd::batch_scale;
/// use nalgebra::Vector3;
///
/// let lengths = [2.0, 0.5];
/// let tangents = [Vector3::x(), Vector3::z()];
///
/// let edges = batch_scale(&lengths, &tangents);
/// assert_eq!(edges[0], Vector3::new(2.0, 0.0, 0.0));
/// assert_eq!(edges[1], Vector3::new(0.0, 0.0, 0.5));
/// ```
#[must_use]
pub fn batch_scale(scalars: &[f64], vectors: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    debug_assert_eq!(scalars.len(), vectors.len());
    let n = scalars.len().min(vectors.len());
    let mut result = vec![Vector3::zeros(); n];

    let chunks = n / LANES;
    for chunk_idx in 0..chunks {
        let base = chunk_idx * LANES;
        let lanes = [
            scalars[base],
            scalars[base + 1],
            scalars[base + 2],
            scalars[base + 3],
        ];
        Vec3x4::load(&vectors[base..])
            .scale(&lanes)
            .store(&mut result[base..base + LANES]);
    }

    for i in chunks * LANES..n {
        result[i] = vectors[i] * scalars[i];
    }

    result
}

/// Accumulate one collection into another: `target[k] += source[k]`.
pub fn batch_add_assign(target: &mut [Vector3<f64>], source: &[Vector3<f64>]) {
    debug_assert_eq!(target.len(), source.len());
    for (t, s) in target.iter_mut().zip(source) {
        *t += s;
    }
}

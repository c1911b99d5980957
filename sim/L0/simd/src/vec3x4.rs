//! 4-wide `Vector3` batch type.
//!
//! [`Vec3x4`] stores 4 `Vector3<f64>` values in a structure-of-arrays (`SoA`)
//! layout so per-element rod kernels (cross products, dot products, scaling)
//! run lane-parallel on 256-bit registers (`AVX`/`AVX2`, two NEON registers).

use nalgebra::Vector3;

/// Number of lanes in a [`Vec3x4`].
pub const LANES: usize = 4;

/// A batch of 4 `Vector3<f64>` values stored in `SoA` (Structure of Arrays) layout.
///
/// # Memory Layout
///
/// ```text
/// xs: [x0, x1, x2, x3]
/// ys: [y0, y1, y2, y3]
/// zs: [z0, z1, z2, z3]
/// ```
///
/// # Example
///
/// ```
/// use sim_simd::Vec3x4;
/// use nalgebra::Vector3;
///
/// let a = Vec3x4::load(&[Vector3::x(), Vector3::y()]);
/// let b = Vec3x4::load(&[Vector3::y(), Vector3::z()]);
///
/// let mut out = [Vector3::zeros(); 2];
/// a.cross(&b).store(&mut out);
/// assert_eq!(out, [Vector3::z(), Vector3::x()]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(32))]
pub struct Vec3x4 {
    /// X components of all 4 vectors.
    pub xs: [f64; LANES],
    /// Y components of all 4 vectors.
    pub ys: [f64; LANES],
    /// Z components of all 4 vectors.
    pub zs: [f64; LANES],
}

impl Vec3x4 {
    #[inline]
    const fn zeros() -> Self {
        Self {
            xs: [0.0; LANES],
            ys: [0.0; LANES],
            zs: [0.0; LANES],
        }
    }

    /// Load up to 4 vectors from a slice, zero-filling unused lanes.
    #[must_use]
    #[inline]
    pub fn load(vectors: &[Vector3<f64>]) -> Self {
        let mut batch = Self::zeros();
        for (lane, v) in vectors.iter().take(LANES).enumerate() {
            batch.xs[lane] = v.x;
            batch.ys[lane] = v.y;
            batch.zs[lane] = v.z;
        }
        batch
    }

    /// Write the first `out.len()` lanes (at most 4) back into a slice.
    #[inline]
    pub fn store(&self, out: &mut [Vector3<f64>]) {
        for (lane, v) in out.iter_mut().take(LANES).enumerate() {
            *v = self.get(lane);
        }
    }

    /// Extract the vector in a given lane.
    #[must_use]
    #[inline]
    pub(crate) fn get(&self, lane: usize) -> Vector3<f64> {
        debug_assert!(lane < LANES);
        Vector3::new(self.xs[lane], self.ys[lane], self.zs[lane])
    }

    /// Lane-wise dot products: `[a0·b0, a1·b1, a2·b2, a3·b3]`.
    #[must_use]
    #[inline]
    pub fn dot(&self, other: &Self) -> [f64; LANES] {
        let mut result = [0.0; LANES];
        for i in 0..LANES {
            result[i] = self.xs[i] * other.xs[i];
        }
        for i in 0..LANES {
            result[i] += self.ys[i] * other.ys[i];
        }
        for i in 0..LANES {
            result[i] += self.zs[i] * other.zs[i];
        }
        result
    }

    /// Lane-wise cross products: `[a0×b0, a1×b1, a2×b2, a3×b3]`.
    #[must_use]
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let mut result = Self::zeros();
        for i in 0..LANES {
            result.xs[i] = self.ys[i] * other.zs[i] - self.zs[i] * other.ys[i];
        }
        for i in 0..LANES {
            result.ys[i] = self.zs[i] * other.xs[i] - self.xs[i] * other.zs[i];
        }
        for i in 0..LANES {
            result.zs[i] = self.xs[i] * other.ys[i] - self.ys[i] * other.xs[i];
        }
        result
    }

    /// Lane-wise Euclidean norms.
    #[must_use]
    #[inline]
    pub fn norm(&self) -> [f64; LANES] {
        let mut result = self.dot(self);
        for r in &mut result {
            *r = r.sqrt();
        }
        result
    }

    /// Scale each lane by its own scalar.
    #[must_use]
    #[inline]
    pub fn scale(&self, scalars: &[f64; LANES]) -> Self {
        let mut result = *self;
        for i in 0..LANES {
            result.xs[i] *= scalars[i];
            result.ys[i] *= scalars[i];
            result.zs[i] *= scalars[i];
        }
        result
    }
}

//! Closest points between two line segments.
//!
//! Segments are given as a start point and an edge vector:
//!
//! ```text
//! p(t) = x1 + t e1,   t ∈ [0, 1]
//! q(s) = x2 + s e2,   s ∈ [0, 1]
//! ```
//!
//! The solver minimises `|q(s) - p(t)|²`. Nearly parallel segments are
//! handled by projecting and clamping directly; otherwise the 2×2 normal
//! equations are solved in closed form and, if the unconstrained optimum
//! leaves the unit square, the four edges of the square are searched.

use nalgebra::Vector3;

/// Threshold on `1 - cos²(angle)` below which segments count as parallel.
pub const PARALLEL_TOLERANCE: f64 = 1e-6;

/// Result of a segment-segment distance query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProximity {
    /// Vector from the closest point on the first segment to the closest
    /// point on the second.
    pub separation: Vector3<f64>,
    /// Closest point on the first segment.
    pub point_on_first: Vector3<f64>,
    /// Closest point on the second segment.
    pub point_on_second: Vector3<f64>,
    /// Parameter of the closest point on the first segment.
    pub t: f64,
    /// Parameter of the closest point on the second segment.
    pub s: f64,
}

impl SegmentProximity {
    fn from_parameters(
        x1: &Vector3<f64>,
        e1: &Vector3<f64>,
        x2: &Vector3<f64>,
        e2: &Vector3<f64>,
        t: f64,
        s: f64,
    ) -> Self {
        let point_on_first = x1 + e1 * t;
        let point_on_second = x2 + e2 * s;
        Self {
            separation: point_on_second - point_on_first,
            point_on_first,
            point_on_second,
            t,
            s,
        }
    }

    /// Distance between the closest points.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.separation.norm()
    }
}

/// Find the closest points between segment `x1 + t e1` and segment `x2 + s e2`.
///
/// # Example
///
/// ```
/// use sim_contact::geometry::closest_points;
/// use nalgebra::Vector3;
///
/// // Two skew, perpendicular unit segments one unit apart
/// let hit = closest_points(
///     &Vector3::new(-0.5, 0.0, 0.0),
///     &Vector3::new(1.0, 0.0, 0.0),
///     &Vector3::new(0.0, -0.5, 1.0),
///     &Vector3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((hit.distance() - 1.0).abs() < 1e-12);
/// assert!(hit.point_on_first.norm() < 1e-12);
/// ```
#[must_use]
pub fn closest_points(
    x1: &Vector3<f64>,
    e1: &Vector3<f64>,
    x2: &Vector3<f64>,
    e2: &Vector3<f64>,
) -> SegmentProximity {
    // Floors keep zero-length edges from dividing by zero
    let e1e1 = e1.dot(e1).max(f64::MIN_POSITIVE);
    let e2e2 = e2.dot(e2).max(f64::MIN_POSITIVE);
    let e1e2 = e1.dot(e2);

    let x1e1 = x1.dot(e1);
    let x1e2 = x1.dot(e2);
    let x2e1 = x2.dot(e1);
    let x2e2 = x2.dot(e2);

    let parallel = (1.0 - e1e2 * e1e2 / (e1e1 * e2e2)).abs() < PARALLEL_TOLERANCE;
    if parallel {
        let t = ((x2e1 - x1e1) / e1e1).clamp(0.0, 1.0);
        let s = ((x1e2 + t * e1e2 - x2e2) / e2e2).clamp(0.0, 1.0);
        return SegmentProximity::from_parameters(x1, e1, x2, e2, t, s);
    }

    // Cauchy-Binet solution of the normal equations
    let s = (e1e1 * (x1e2 - x2e2) + e1e2 * (x2e1 - x1e1)) / (e1e1 * e2e2 - e1e2 * e1e2);
    let t = (e1e2 * s + x2e1 - x1e1) / e1e1;

    if (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
        return SegmentProximity::from_parameters(x1, e1, x2, e2, t, s);
    }

    // Boundary candidates: s = 0, s = 1, t = 0, t = 1
    let candidates = [
        (((x2e1 - x1e1) / e1e1).clamp(0.0, 1.0), 0.0),
        (((x2e1 + e1e2 - x1e1) / e1e1).clamp(0.0, 1.0), 1.0),
        (0.0, ((x1e2 - x2e2) / e2e2).clamp(0.0, 1.0)),
        (1.0, ((x1e2 + e1e2 - x2e2) / e2e2).clamp(0.0, 1.0)),
    ];

    let (t0, s0) = candidates[0];
    let mut best = SegmentProximity::from_parameters(x1, e1, x2, e2, t0, s0);
    let mut best_distance = best.distance();
    for &(t, s) in &candidates[1..] {
        let candidate = SegmentProximity::from_parameters(x1, e1, x2, e2, t, s);
        let distance = candidate.distance();
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parallel_offset_segments() {
        let hit = closest_points(
            &Vector3::zeros(),
            &Vector3::new(1.0, 0.0, 0.0),
            &Vector3::new(0.25, 0.3, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
        );

        assert_relative_eq!(hit.distance(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(hit.separation, Vector3::new(0.0, 0.3, 0.0), epsilon = 1e-12);
        assert_relative_eq!(hit.t, 0.25);
        assert_eq!(hit.s, 0.0);
    }

    #[test]
    fn test_antiparallel_segments() {
        let hit = closest_points(
            &Vector3::zeros(),
            &Vector3::new(0.0, 0.0, 2.0),
            &Vector3::new(0.5, 0.0, 2.0),
            &Vector3::new(0.0, 0.0, -2.0),
        );
        assert_relative_eq!(hit.distance(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_crossing_segments_intersect() {
        let hit = closest_points(
            &Vector3::new(-1.0, 0.0, 0.0),
            &Vector3::new(2.0, 0.0, 0.0),
            &Vector3::new(0.0, -1.0, 0.0),
            &Vector3::new(0.0, 2.0, 0.0),
        );
        assert_relative_eq!(hit.distance(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(hit.t, 0.5);
        assert_relative_eq!(hit.s, 0.5);
    }

    #[test]
    fn test_perpendicular_skew_segments() {
        // First segment along x from the origin, second along y passing over x = 0.7
        let hit = closest_points(
            &Vector3::zeros(),
            &Vector3::new(1.0, 0.0, 0.0),
            &Vector3::new(0.7, -0.5, 2.0),
            &Vector3::new(0.0, 1.0, 0.0),
        );

        assert_relative_eq!(hit.point_on_first, Vector3::new(0.7, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(hit.point_on_second, Vector3::new(0.7, 0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(hit.distance(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_optimum_outside_square_uses_boundary() {
        // Infinite lines cross at x = 3, beyond the end of the first segment
        let hit = closest_points(
            &Vector3::zeros(),
            &Vector3::new(1.0, 0.0, 0.0),
            &Vector3::new(3.0, -1.0, 0.0),
            &Vector3::new(0.0, 2.0, 0.0),
        );

        assert_eq!(hit.t, 1.0);
        assert_relative_eq!(hit.s, 0.5, epsilon = 1e-12);
        assert_relative_eq!(hit.distance(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_closest_point_on_first_is_forward() {
        let hit = closest_points(
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &Vector3::new(2.0, 1.0, 1.5),
            &Vector3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(hit.point_on_first, Vector3::new(1.0, 1.0, 1.5), epsilon = 1e-12);
        assert_relative_eq!(hit.point_on_first + hit.separation, hit.point_on_second);
    }

    #[test]
    fn test_zero_length_segment() {
        let hit = closest_points(
            &Vector3::new(0.5, 1.0, 0.0),
            &Vector3::zeros(),
            &Vector3::zeros(),
            &Vector3::new(1.0, 0.0, 0.0),
        );
        assert!(hit.distance().is_finite());
        assert_relative_eq!(hit.distance(), 1.0, epsilon = 1e-12);
    }
}

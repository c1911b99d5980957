//! Axis-aligned bounding boxes for rejecting distant contact pairs.
//!
//! Boxes are conservative: a pair whose boxes are separated along any
//! world axis cannot touch, so the narrow phase is skipped. Overlapping
//! boxes say nothing; the narrow phase decides.
//!
//! ```text
//!   rod box        = node bounds ± (max radius + max element length)
//!   cylinder box   = centre ± Σ_j |Q_ji| h_j,   h = (R, R, L/2)
//! ```

use nalgebra::{Point3, Vector3};

use sim_rod::CosseratRod;

use crate::bodies::RigidCylinder;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3<f64>,
    /// Maximum corner of the bounding box.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with the given half-extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounds of a rod, padded by its largest radius plus largest element
    /// length.
    ///
    /// Radii and lengths are the cached values of the rod's last strain
    /// evaluation.
    #[must_use]
    pub fn from_rod(rod: &CosseratRod) -> Self {
        let (min, max) = rod.bounding_box();
        let strains = rod.strains();
        let max_radius = strains.radius.iter().copied().fold(0.0, f64::max);
        let max_length = strains.lengths.iter().copied().fold(0.0, f64::max);
        Self::new(min, max).expanded(max_radius + max_length)
    }

    /// Bounds of a rigid cylinder in any orientation.
    #[must_use]
    pub fn from_cylinder(cylinder: &RigidCylinder) -> Self {
        let half = Vector3::new(cylinder.radius, cylinder.radius, 0.5 * cylinder.length);
        // Rows of the director are the body axes in world coordinates.
        let half_extents = cylinder.director.abs().transpose() * half;
        Self::from_center(Point3::from(cylinder.position), half_extents)
    }

    /// Check if this AABB overlaps with another AABB.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Check if the boxes are disjoint along at least one axis.
    #[must_use]
    pub fn separated(&self, other: &Self) -> bool {
        !self.overlaps(other)
    }

    /// Expand this AABB by a margin on all sides.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let margin = Vector3::repeat(margin);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Whether a point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|k| self.min[k] <= point[k] && point[k] <= self.max[k])
    }
}

//! Penalty contact force laws.
//!
//! Every law follows the same per-step structure:
//!
//! ```text
//! broad phase (AABB) ──reject──► return
//!        │
//!        ▼
//! for each candidate element pair
//!   bounding-sphere reject
//!   closest points on the two centre-line segments
//!   γ = r₁ + r₂ − d        (γ < −1e-5 ⇒ skip)
//!   F = spring + damping [+ friction], active only for γ > 0
//!   redistribute F onto nodes
//! ```
//!
//! Contact forces are written into the external force accumulators of the
//! participants. Lengths, tangents and radii come from the rod's cached
//! strains, so the internal force pipeline must have run for the current
//! state before contact is applied.

mod anisotropic;
mod plane;
mod rod_cylinder;
mod rod_rod;
mod rod_self;

pub use anisotropic::AnisotropicFrictionPlane;
pub use plane::{CylinderPlaneContact, PlaneResponse, RodPlaneContact};
pub use rod_cylinder::RodCylinderContact;
pub use rod_rod::RodRodContact;
pub use rod_self::RodSelfContact;

use nalgebra::Vector3;
use tracing::warn;

use sim_rod::CosseratRod;

use crate::geometry::SegmentProximity;

/// Penetration below which a pair is treated as separated.
///
/// Pairs with `γ` between `-PENETRATION_TOLERANCE` and zero are evaluated
/// but produce no spring or damping force.
pub const PENETRATION_TOLERANCE: f64 = 1e-5;

/// Default clearance above a plane still treated as contact.
pub const DEFAULT_SURFACE_TOLERANCE: f64 = 1e-4;

/// Node weights for a force acting on element `index` of `n`.
///
/// The element force is applied as `w₀ F` to its first node and `w₁ F` to
/// its second. Interior elements use `(1, 1)`; the end elements use
/// `(2/3, 4/3)` and `(4/3, 2/3)` so that the boundary node, which carries
/// only half a Voronoi domain of mass, is not over-driven. A single element
/// counts as the first.
#[must_use]
pub fn boundary_weights(index: usize, n: usize) -> (f64, f64) {
    if index == 0 {
        (2.0 / 3.0, 4.0 / 3.0)
    } else if index + 1 == n {
        (4.0 / 3.0, 2.0 / 3.0)
    } else {
        (1.0, 1.0)
    }
}

/// Add `force` to the two nodes of element `index` with boundary weights.
pub(crate) fn spread_to_nodes(nodes: &mut [Vector3<f64>], index: usize, force: &Vector3<f64>) {
    let (w0, w1) = boundary_weights(index, nodes.len() - 1);
    nodes[index] += force * w0;
    nodes[index + 1] += force * w1;
}

/// Mean of the total nodal force over the two nodes of element `index`.
pub(crate) fn element_force(rod: &CosseratRod, index: usize) -> Vector3<f64> {
    let internal = rod.internal_forces();
    let external = rod.external_forces();
    (external[index] + external[index + 1] + internal[index] + internal[index + 1]) * 0.5
}

/// Mean velocity of the two nodes of element `index`.
pub(crate) fn element_velocity(rod: &CosseratRod, index: usize) -> Vector3<f64> {
    let v = &rod.state().velocities;
    (v[index] + v[index + 1]) * 0.5
}

/// Element edge vectors `l t` from the cached strains.
pub(crate) fn element_edges(rod: &CosseratRod) -> Vec<Vector3<f64>> {
    let strains = rod.strains();
    sim_simd::batch_scale(&strains.lengths, &strains.tangents)
}

/// Unit normal from the first segment to the second, with the centre-line
/// distance.
///
/// Returns `None` for coincident centre-lines, which have no normal.
pub(crate) fn contact_normal(
    proximity: &SegmentProximity,
    first: usize,
    second: usize,
) -> Option<(Vector3<f64>, f64)> {
    let distance = proximity.distance();
    if distance < f64::EPSILON {
        warn!(first, second, "coincident contact segments, skipping pair");
        return None;
    }
    Some((proximity.separation / distance, distance))
}

/// Heaviside activation of the penalty terms.
pub(crate) fn penetration_mask(gamma: f64) -> f64 {
    if gamma > 0.0 { 1.0 } else { 0.0 }
}

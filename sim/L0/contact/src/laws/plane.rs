//! Normal response of a plane against rods and rigid cylinders.
//!
//! A plane can only push. Its response on an element has three parts:
//!
//! ```text
//! reaction  = -(n·F) n          where n·F < 0    (cancels load into the plane)
//! elastic   = -k min(d - r, 0) n                 (penetration spring)
//! damping   = -ν (n·v) n                         (normal velocity)
//! ```
//!
//! All parts vanish for elements more than `surface_tol` above the plane.
//! Planes are never pruned by the broad phase.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_rod::CosseratRod;
use sim_rod::calculus::{
    elements_to_nodes_add, node_to_element_force, node_to_element_position,
    node_to_element_velocity,
};

use super::DEFAULT_SURFACE_TOLERANCE;
use crate::bodies::{Plane, RigidCylinder};
use crate::error::{Result, non_negative, positive};

/// Per-element outcome of a plane contact evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaneResponse {
    /// Magnitude of the reaction part of the response per element.
    pub magnitudes: Vec<f64>,
    /// Indices of elements not touching the plane.
    pub no_contact: Vec<usize>,
}

impl PlaneResponse {
    /// Whether element `index` touches the plane.
    #[must_use]
    pub fn in_contact(&self, index: usize) -> bool {
        self.no_contact.binary_search(&index).is_err()
    }
}

/// Evaluate the plane response for a set of elements.
///
/// Returns the total response per element alongside the reaction-only
/// magnitudes and the non-contacting indices.
#[allow(clippy::too_many_arguments)]
fn respond(
    plane: &Plane,
    k: f64,
    nu: f64,
    surface_tol: f64,
    loads: &[Vector3<f64>],
    centres: &[Vector3<f64>],
    velocities: &[Vector3<f64>],
    clearance: impl Fn(usize) -> f64,
) -> (Vec<Vector3<f64>>, PlaneResponse) {
    let normal = plane.normal();
    let n = loads.len();

    let mut total = Vec::with_capacity(n);
    let mut response = PlaneResponse {
        magnitudes: Vec::with_capacity(n),
        no_contact: Vec::new(),
    };

    for i in 0..n {
        let gap = plane.signed_distance(&centres[i]) - clearance(i);
        if gap > surface_tol {
            total.push(Vector3::zeros());
            response.magnitudes.push(0.0);
            response.no_contact.push(i);
            continue;
        }

        let load = normal.dot(&loads[i]);
        let reaction = if load > 0.0 {
            Vector3::zeros()
        } else {
            -normal * load
        };
        let elastic = -normal * (k * gap.min(0.0));
        let damping = -normal * (nu * normal.dot(&velocities[i]));

        total.push(reaction + elastic + damping);
        response.magnitudes.push(reaction.norm());
    }

    (total, response)
}

// =============================================================================
// Rod on plane
// =============================================================================

/// Normal contact between a rod and a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodPlaneContact {
    /// Penetration stiffness.
    pub k: f64,
    /// Normal damping coefficient.
    pub nu: f64,
    /// Clearance still treated as contact.
    pub surface_tol: f64,
}

impl RodPlaneContact {
    /// Name used in error messages.
    pub const NAME: &'static str = "rod-plane contact";

    /// Create a contact law with the default surface tolerance.
    #[must_use]
    pub const fn new(k: f64, nu: f64) -> Self {
        Self {
            k,
            nu,
            surface_tol: DEFAULT_SURFACE_TOLERANCE,
        }
    }

    /// Set the penetration stiffness.
    #[must_use]
    pub const fn with_stiffness(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set the damping coefficient.
    #[must_use]
    pub const fn with_damping(mut self, nu: f64) -> Self {
        self.nu = nu;
        self
    }

    /// Set the surface tolerance.
    #[must_use]
    pub const fn with_surface_tolerance(mut self, surface_tol: f64) -> Self {
        self.surface_tol = surface_tol;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is negative or the tolerance is
    /// not positive.
    pub fn validate(&self) -> Result<()> {
        non_negative("k", self.k)?;
        non_negative("nu", self.nu)?;
        positive("surface_tol", self.surface_tol)
    }

    /// Accumulate the plane response into the rod's external forces.
    ///
    /// Element loads are the internal plus external nodal forces reduced
    /// onto elements; element velocities are mass-weighted.
    pub fn apply(&self, rod: &mut CosseratRod, plane: &Plane) -> PlaneResponse {
        let loads = node_to_element_force(&rod.total_forces());
        let centres = node_to_element_position(&rod.state().positions);
        let velocities = node_to_element_velocity(&rod.properties().mass, &rod.state().velocities);
        let radius = &rod.strains().radius;

        let (total, response) = respond(
            plane,
            self.k,
            self.nu,
            self.surface_tol,
            &loads,
            &centres,
            &velocities,
            |i| radius[i],
        );

        elements_to_nodes_add(&total, rod.external_forces_mut());
        response
    }
}

// =============================================================================
// Rigid cylinder on plane
// =============================================================================

/// Normal contact between a rigid cylinder standing on its base and a plane.
///
/// The cylinder's clearance is half its length and its own external force
/// decides whether it is already being pulled off the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CylinderPlaneContact {
    /// Penetration stiffness.
    pub k: f64,
    /// Normal damping coefficient.
    pub nu: f64,
    /// Clearance still treated as contact.
    pub surface_tol: f64,
}

impl CylinderPlaneContact {
    /// Name used in error messages.
    pub const NAME: &'static str = "cylinder-plane contact";

    /// Create a contact law with the default surface tolerance.
    #[must_use]
    pub const fn new(k: f64, nu: f64) -> Self {
        Self {
            k,
            nu,
            surface_tol: DEFAULT_SURFACE_TOLERANCE,
        }
    }

    /// Set the surface tolerance.
    #[must_use]
    pub const fn with_surface_tolerance(mut self, surface_tol: f64) -> Self {
        self.surface_tol = surface_tol;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is negative or the tolerance is
    /// not positive.
    pub fn validate(&self) -> Result<()> {
        non_negative("k", self.k)?;
        non_negative("nu", self.nu)?;
        positive("surface_tol", self.surface_tol)
    }

    /// Accumulate the plane response into the cylinder's external force.
    pub fn apply(&self, cylinder: &mut RigidCylinder, plane: &Plane) -> PlaneResponse {
        let half_length = 0.5 * cylinder.length;
        let (total, response) = respond(
            plane,
            self.k,
            self.nu,
            self.surface_tol,
            &[cylinder.external_forces],
            &[cylinder.position],
            &[cylinder.velocity],
            |_| half_length,
        );

        for force in &total {
            cylinder.external_forces += force;
        }
        response
    }
}

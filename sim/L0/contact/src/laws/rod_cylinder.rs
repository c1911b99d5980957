//! Contact between a rod and a rigid cylinder, with friction.

use nalgebra::Vector3;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_rod::CosseratRod;

use super::{
    PENETRATION_TOLERANCE, contact_normal, element_edges, element_force, element_velocity,
    penetration_mask, spread_to_nodes,
};
use crate::bodies::RigidCylinder;
use crate::broad_phase::Aabb;
use crate::error::{Result, non_negative};
use crate::friction::ViscousCoulombFriction;
use crate::geometry::closest_points;

/// Spring-damper contact between a rod and a rigid cylinder.
///
/// The cylinder is treated as a thick segment along its axis. Slip between
/// the contact surfaces is resisted by [`ViscousCoulombFriction`]. The
/// cylinder receives the reaction force at its centre and the matching
/// moment about its centre, stored in the body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodCylinderContact {
    /// Contact spring stiffness.
    pub k: f64,
    /// Contact damping coefficient.
    pub nu: f64,
    /// Tangential friction at the contact.
    pub friction: ViscousCoulombFriction,
}

impl RodCylinderContact {
    /// Name used in error messages.
    pub const NAME: &'static str = "rod-cylinder contact";

    /// Create a frictionless contact law.
    #[must_use]
    pub const fn new(k: f64, nu: f64) -> Self {
        Self {
            k,
            nu,
            friction: ViscousCoulombFriction::frictionless(),
        }
    }

    /// Set the spring stiffness.
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

    /// Set the friction law.
    #[must_use]
    pub const fn with_friction(mut self, friction: ViscousCoulombFriction) -> Self {
        self.friction = friction;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        non_negative("k", self.k)?;
        non_negative("nu", self.nu)?;
        self.friction.validate()
    }

    /// Accumulate contact forces into the rod and the cylinder.
    pub fn apply(&self, rod: &mut CosseratRod, cylinder: &mut RigidCylinder) {
        if Aabb::from_rod(rod).separated(&Aabb::from_cylinder(cylinder)) {
            trace!(rod = rod.name(), "rod-cylinder pair pruned");
            return;
        }

        let cylinder_start = cylinder.start();
        let cylinder_edge = cylinder.axis_edge();
        let edges = element_edges(rod);

        let mut total_force = Vector3::zeros();
        let mut total_torque = Vector3::zeros();

        for (i, edge) in edges.iter().enumerate() {
            let x = rod.state().positions[i];
            let radii_sum = rod.strains().radius[i] + cylinder.radius;
            let length_sum = rod.strains().lengths[i] + cylinder.length;

            if (x - cylinder_start).norm() >= radii_sum + length_sum {
                continue;
            }

            let proximity = closest_points(&x, edge, &cylinder_start, &cylinder_edge);
            let Some((normal, distance)) = contact_normal(&proximity, i, 0) else {
                continue;
            };
            let gamma = radii_sum - distance;
            if gamma < -PENETRATION_TOLERANCE {
                continue;
            }

            let equilibrium = cylinder.external_forces - element_force(rod, i);
            let normal_force = equilibrium.dot(&normal).min(0.0).abs();

            let velocity = cylinder.velocity - element_velocity(rod, i);
            let normal_velocity = normal * velocity.dot(&normal);
            let spring = normal * (self.k * gamma);
            let damping = -normal_velocity * self.nu;

            let mut net =
                (spring + damping) * (0.5 * penetration_mask(gamma)) + normal * normal_force;

            let slip = velocity - normal_velocity;
            net += self.friction.compute_force(&slip, net.norm());

            let arm = proximity.point_on_second - cylinder.position;
            total_force += net * 2.0;
            total_torque += arm.cross(&(net * 2.0));

            spread_to_nodes(rod.external_forces_mut(), i, &(-net));
        }

        cylinder.external_forces += total_force;
        cylinder.external_torques += cylinder.director * total_torque;
    }
}

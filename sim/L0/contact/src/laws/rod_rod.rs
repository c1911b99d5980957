//! Contact between two distinct rods.

use nalgebra::Vector3;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_rod::CosseratRod;

use super::{
    PENETRATION_TOLERANCE, contact_normal, element_edges, element_force, element_velocity,
    penetration_mask, spread_to_nodes,
};
use crate::broad_phase::Aabb;
use crate::error::{Result, non_negative};
use crate::geometry::closest_points;

/// Spring-damper contact between two rods.
///
/// For each element pair in contact the normal force is
///
/// ```text
/// F = (N_eq + ½ H(γ) (k γ + ν v·n)) n
/// ```
///
/// where `N_eq` cancels the part of the existing nodal loads that pushes
/// the elements into each other, `v` is the approach velocity and `n`
/// points from the first rod to the second.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodRodContact {
    /// Contact spring stiffness.
    pub k: f64,
    /// Contact damping coefficient.
    pub nu: f64,
}

impl RodRodContact {
    /// Name used in error messages.
    pub const NAME: &'static str = "rod-rod contact";

    /// Create a contact law.
    #[must_use]
    pub const fn new(k: f64, nu: f64) -> Self {
        Self { k, nu }
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

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        non_negative("k", self.k)?;
        non_negative("nu", self.nu)
    }

    /// Accumulate contact forces into both rods' external forces.
    pub fn apply(&self, first: &mut CosseratRod, second: &mut CosseratRod) {
        if Aabb::from_rod(first).separated(&Aabb::from_rod(second)) {
            trace!(first = first.name(), second = second.name(), "rod-rod pair pruned");
            return;
        }

        let edges_one = element_edges(first);
        let edges_two = element_edges(second);

        for (i, edge_one) in edges_one.iter().enumerate() {
            let x1 = first.state().positions[i];
            let r1 = first.strains().radius[i];
            let l1 = first.strains().lengths[i];

            for (j, edge_two) in edges_two.iter().enumerate() {
                let x2 = second.state().positions[j];
                let radii_sum = r1 + second.strains().radius[j];
                let length_sum = l1 + second.strains().lengths[j];

                if (x1 - x2).norm() >= radii_sum + length_sum {
                    continue;
                }

                let proximity = closest_points(&x1, edge_one, &x2, edge_two);
                let Some((normal, distance)) = contact_normal(&proximity, i, j) else {
                    continue;
                };
                let gamma = radii_sum - distance;
                if gamma < -PENETRATION_TOLERANCE {
                    continue;
                }

                let equilibrium = element_force(second, j) - element_force(first, i);
                let normal_force = equilibrium.dot(&normal).min(0.0).abs();

                let approach = element_velocity(first, i) - element_velocity(second, j);
                let damping = self.nu * approach.dot(&normal);

                let net: Vector3<f64> = normal
                    * (normal_force + 0.5 * penetration_mask(gamma) * (self.k * gamma + damping));

                spread_to_nodes(first.external_forces_mut(), i, &(-net));
                spread_to_nodes(second.external_forces_mut(), j, &net);
            }
        }
    }
}

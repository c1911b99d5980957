//! Contact between distant elements of the same rod.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_rod::CosseratRod;

use super::{
    PENETRATION_TOLERANCE, contact_normal, element_edges, element_velocity, penetration_mask,
    spread_to_nodes,
};
use crate::error::{Result, non_negative};
use crate::geometry::closest_points;

/// Spring-damper self contact of a rod.
///
/// Element `i` is tested against elements `j ≤ i - skip(i)` with
///
/// ```text
/// skip(i) = 1 + ⌈0.8 π r_i / l_i⌉
/// ```
///
/// so neighbours along a smoothly curved rod never push each other apart.
/// There is no equilibrium term; the force is `½ H(γ) (k γ + ν v·n) n`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodSelfContact {
    /// Contact spring stiffness.
    pub k: f64,
    /// Contact damping coefficient.
    pub nu: f64,
}

impl RodSelfContact {
    /// Name used in error messages.
    pub const NAME: &'static str = "rod self contact";

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

    /// Number of neighbouring elements excluded from contact with element
    /// of the given radius and length.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn skip_window(radius: f64, length: f64) -> usize {
        1 + (0.8 * std::f64::consts::PI * radius / length).ceil() as usize
    }

    /// Accumulate self-contact forces into the rod's external forces.
    pub fn apply(&self, rod: &mut CosseratRod) {
        let edges = element_edges(rod);

        for i in 0..edges.len() {
            let x1 = rod.state().positions[i];
            let r1 = rod.strains().radius[i];
            let l1 = rod.strains().lengths[i];
            let Some(last) = i.checked_sub(Self::skip_window(r1, l1)) else {
                continue;
            };

            for j in (0..=last).rev() {
                let x2 = rod.state().positions[j];
                let radii_sum = r1 + rod.strains().radius[j];
                let length_sum = l1 + rod.strains().lengths[j];

                if (x1 - x2).norm() >= radii_sum + length_sum {
                    continue;
                }

                let proximity = closest_points(&x1, &edges[i], &x2, &edges[j]);
                let Some((normal, distance)) = contact_normal(&proximity, i, j) else {
                    continue;
                };
                let gamma = radii_sum - distance;
                if gamma < -PENETRATION_TOLERANCE {
                    continue;
                }

                let approach = element_velocity(rod, i) - element_velocity(rod, j);
                let damping = self.nu * approach.dot(&normal);
                let net: Vector3<f64> =
                    normal * (0.5 * penetration_mask(gamma) * (self.k * gamma + damping));

                let forces = rod.external_forces_mut();
                spread_to_nodes(forces, i, &(-net));
                spread_to_nodes(forces, j, &net);
            }
        }
    }
}

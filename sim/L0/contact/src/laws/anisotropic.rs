//! Rod on a plane with direction-dependent Coulomb friction.
//!
//! Friction acts in the plane along two directions per element:
//!
//! ```text
//! axial   a = t∥ / |t∥|       (tangent projected into the plane)
//! rolling b = a × n
//! ```
//!
//! Axial friction uses the forward or backward coefficient depending on the
//! sign of the axial velocity (kinetic) or axial load (static). Rolling
//! friction uses the sideways coefficient and also produces a torque
//! `Q (arm × F)` about the contact point `arm = -r n`. A slip function blends
//! between the static regime (slip speed at or below the tolerance) and the
//! kinetic regime (slip speed above twice the tolerance).

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_rod::CosseratRod;
use sim_rod::calculus::{elements_to_nodes_add, node_to_element_force, node_to_element_velocity};
use sim_simd::{batch_add_assign, batch_cross, batch_matvec, batch_matvec_transpose};

use super::{DEFAULT_SURFACE_TOLERANCE, PlaneResponse, RodPlaneContact};
use crate::bodies::Plane;
use crate::error::{Result, positive};
use crate::friction::{DirectionalFriction, SLIP_EPSILON, sign, slip_function};

/// Plane contact with anisotropic static and kinetic friction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnisotropicFrictionPlane {
    /// Penetration stiffness.
    pub k: f64,
    /// Normal damping coefficient.
    pub nu: f64,
    /// Clearance still treated as contact.
    pub surface_tol: f64,
    /// Slip speed separating the static and kinetic regimes.
    pub slip_velocity_tol: f64,
    /// Static coefficients.
    pub static_mu: DirectionalFriction,
    /// Kinetic coefficients.
    pub kinetic_mu: DirectionalFriction,
}

impl AnisotropicFrictionPlane {
    /// Name used in error messages.
    pub const NAME: &'static str = "anisotropic friction plane";

    /// Create a friction plane with the default surface tolerance.
    #[must_use]
    pub const fn new(
        k: f64,
        nu: f64,
        slip_velocity_tol: f64,
        static_mu: DirectionalFriction,
        kinetic_mu: DirectionalFriction,
    ) -> Self {
        Self {
            k,
            nu,
            surface_tol: DEFAULT_SURFACE_TOLERANCE,
            slip_velocity_tol,
            static_mu,
            kinetic_mu,
        }
    }

    /// Set the surface tolerance.
    #[must_use]
    pub const fn with_surface_tolerance(mut self, surface_tol: f64) -> Self {
        self.surface_tol = surface_tol;
        self
    }

    /// Set the slip velocity tolerance.
    #[must_use]
    pub const fn with_slip_velocity_tolerance(mut self, slip_velocity_tol: f64) -> Self {
        self.slip_velocity_tol = slip_velocity_tol;
        self
    }

    /// Set the static coefficients.
    #[must_use]
    pub const fn with_static_friction(mut self, static_mu: DirectionalFriction) -> Self {
        self.static_mu = static_mu;
        self
    }

    /// Set the kinetic coefficients.
    #[must_use]
    pub const fn with_kinetic_friction(mut self, kinetic_mu: DirectionalFriction) -> Self {
        self.kinetic_mu = kinetic_mu;
        self
    }

    /// The normal response part of this law.
    #[must_use]
    pub const fn normal_contact(&self) -> RodPlaneContact {
        RodPlaneContact {
            k: self.k,
            nu: self.nu,
            surface_tol: self.surface_tol,
        }
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is negative or a tolerance is not
    /// positive.
    pub fn validate(&self) -> Result<()> {
        self.normal_contact().validate()?;
        positive("slip_velocity_tol", self.slip_velocity_tol)?;
        self.static_mu.validate()?;
        self.kinetic_mu.validate()
    }

    /// Apply the normal response, then kinetic and static friction.
    ///
    /// Static friction is evaluated against the loads after the normal
    /// response and kinetic friction have been added.
    pub fn apply(&self, rod: &mut CosseratRod, plane: &Plane) -> PlaneResponse {
        let response = self.normal_contact().apply(rod, plane);
        let normal = plane.normal();
        let n = rod.n_elements();
        let tol = self.slip_velocity_tol;

        let mut touching = vec![true; n];
        for &i in &response.no_contact {
            touching[i] = false;
        }

        let strains = rod.strains();
        let axial: Vec<Vector3<f64>> = strains
            .tangents
            .iter()
            .map(|t| {
                let in_plane = t - normal * normal.dot(t);
                in_plane / (in_plane.norm() + SLIP_EPSILON)
            })
            .collect();
        let rolling: Vec<Vector3<f64>> = axial.iter().map(|a| a.cross(&normal)).collect();
        let radius = strains.radius.clone();
        let arms: Vec<Vector3<f64>> = radius.iter().map(|r| -normal * *r).collect();

        let state = rod.state();
        let velocities = node_to_element_velocity(&rod.properties().mass, &state.velocities);
        let spin = batch_matvec_transpose(
            &state.directors,
            &batch_cross(&state.omegas, &batch_matvec(&state.directors, &arms)),
        );

        // Kinetic friction
        let mut slip_axial = Vec::with_capacity(n);
        let mut slip_rolling = Vec::with_capacity(n);
        let mut kinetic_axial = vec![Vector3::zeros(); n];
        let mut kinetic_rolling = vec![Vector3::zeros(); n];
        for i in 0..n {
            let axial_speed = velocities[i].dot(&axial[i]);
            let axial_velocity = axial[i] * axial_speed;
            let f_axial = slip_function(axial_velocity.norm(), tol);

            let rolling_speed = velocities[i].dot(&rolling[i]) + spin[i].dot(&rolling[i]);
            let rolling_velocity = rolling[i] * rolling_speed;
            let f_rolling = slip_function(rolling_velocity.norm(), tol);

            slip_axial.push(f_axial);
            slip_rolling.push(f_rolling);
            if !touching[i] {
                continue;
            }

            let slip = rolling_velocity + axial_velocity;
            let direction = slip / (slip + Vector3::repeat(SLIP_EPSILON)).norm();
            let normal_force = response.magnitudes[i];
            let mu = self.kinetic_mu.axial(sign(axial_speed));

            kinetic_axial[i] =
                -axial[i] * ((1.0 - f_axial) * mu * normal_force * direction.dot(&axial[i]));
            kinetic_rolling[i] = -rolling[i]
                * ((1.0 - f_rolling)
                    * self.kinetic_mu.sideways
                    * normal_force
                    * direction.dot(&rolling[i]));
        }

        elements_to_nodes_add(&kinetic_axial, rod.external_forces_mut());
        elements_to_nodes_add(&kinetic_rolling, rod.external_forces_mut());
        let torques = batch_matvec(&rod.state().directors, &batch_cross(&arms, &kinetic_rolling));
        batch_add_assign(rod.external_torques_mut(), &torques);

        // Static friction
        let loads = node_to_element_force(&rod.total_forces());
        let body_torques = batch_matvec_transpose(&rod.state().directors, &rod.total_torques());

        let mut static_axial = vec![Vector3::zeros(); n];
        let mut static_rolling = vec![Vector3::zeros(); n];
        for i in (0..n).filter(|&i| touching[i]) {
            let normal_force = response.magnitudes[i];

            let axial_load = loads[i].dot(&axial[i]);
            let axial_sign = sign(axial_load);
            let cap = slip_axial[i] * self.static_mu.axial(axial_sign) * normal_force;
            static_axial[i] = -axial[i] * (axial_load.abs().min(cap) * axial_sign);

            let axial_torque = body_torques[i].dot(&axial[i]);
            let rolling_load = loads[i].dot(&rolling[i]);
            let no_slip = -(radius[i] * rolling_load - 2.0 * axial_torque) / (3.0 * radius[i]);
            let cap = slip_rolling[i] * self.static_mu.sideways * normal_force;
            static_rolling[i] = rolling[i] * (no_slip.abs().min(cap) * sign(no_slip));
        }

        elements_to_nodes_add(&static_axial, rod.external_forces_mut());
        elements_to_nodes_add(&static_rolling, rod.external_forces_mut());
        let torques = batch_matvec(&rod.state().directors, &batch_cross(&arms, &static_rolling));
        batch_add_assign(rod.external_torques_mut(), &torques);

        response
    }
}

//! Integration tests for contact registration and the force laws.
//!
//! Run with: cargo test -p sim-contact --test contact_laws

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use sim_contact::{
    AnisotropicFrictionPlane, ContactError, ContactPair, ContactSystem, CylinderPlaneContact,
    DirectionalFriction, Plane, RigidCylinder, RodCylinderContact, RodPlaneContact,
    RodRodContact, RodSelfContact, SystemKind, ViscousCoulombFriction, apply_all,
};
use sim_rod::{CosseratRod, RodConfig};

fn rod_along_x(start: Point3<f64>, length: f64, n: usize, radius: f64) -> CosseratRod {
    CosseratRod::straight(
        "rod",
        start,
        start + Vector3::new(length, 0.0, 0.0),
        Vector3::z(),
        n,
        &RodConfig::soft_filament(radius),
    )
    .unwrap()
}

fn sum(values: &[Vector3<f64>]) -> Vector3<f64> {
    values.iter().sum()
}

fn moment(positions: &[Vector3<f64>], forces: &[Vector3<f64>]) -> Vector3<f64> {
    positions.iter().zip(forces).map(|(x, f)| x.cross(f)).sum()
}

fn as_rod(system: &ContactSystem) -> &CosseratRod {
    system.as_rod().unwrap()
}

// =============================================================================
// Rod-rod
// =============================================================================

#[test]
fn test_parallel_rods_spring_force() {
    // Radii 0.1 each, centre-lines 0.1 apart: γ = 0.1
    let mut systems: Vec<ContactSystem> = vec![
        rod_along_x(Point3::origin(), 1.0, 1, 0.1).into(),
        rod_along_x(Point3::new(0.0, 0.1, 0.0), 1.0, 1, 0.1).into(),
    ];
    let pair = ContactPair::new(RodRodContact::new(100.0, 0.0), &systems, 0, 1).unwrap();
    pair.apply(&mut systems).unwrap();

    let on_first = sum(as_rod(&systems[0]).external_forces());
    let on_second = sum(as_rod(&systems[1]).external_forces());
    assert_relative_eq!(on_second, Vector3::new(0.0, 10.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(on_first, -on_second, epsilon = 1e-12);
}

#[test]
fn test_no_force_without_penetration() {
    let mut systems: Vec<ContactSystem> = vec![
        rod_along_x(Point3::origin(), 1.0, 5, 0.05).into(),
        rod_along_x(Point3::new(0.0, 0.0, 0.1 + 1e-6), 1.0, 5, 0.05).into(),
    ];
    let pair = ContactPair::new(RodRodContact::new(1e4, 10.0), &systems, 0, 1).unwrap();
    pair.apply(&mut systems).unwrap();

    assert_eq!(sum(as_rod(&systems[0]).external_forces()), Vector3::zeros());
    assert_eq!(sum(as_rod(&systems[1]).external_forces()), Vector3::zeros());
}

#[test]
fn test_equilibrium_term_cancels_pressing_load() {
    let mut lower = rod_along_x(Point3::origin(), 1.0, 1, 0.1);
    let upper = rod_along_x(Point3::new(0.0, 0.0, 0.15), 1.0, 1, 0.1);
    // Press the lower rod into the upper one
    for f in lower.external_forces_mut() {
        *f = Vector3::new(0.0, 0.0, 3.0);
    }

    let mut systems: Vec<ContactSystem> = vec![lower.into(), upper.into()];
    ContactPair::new(RodRodContact::new(0.0, 0.0), &systems, 0, 1)
        .unwrap()
        .apply(&mut systems)
        .unwrap();

    // The pressing load is cancelled and handed to the upper rod
    assert_relative_eq!(sum(as_rod(&systems[0]).external_forces()).z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(sum(as_rod(&systems[1]).external_forces()).z, 6.0, epsilon = 1e-9);
}

#[test]
fn test_interior_redistribution_preserves_moment() {
    // Crossing rod touches the middle of element 2 of 5
    let mut lower = rod_along_x(Point3::origin(), 1.0, 5, 0.05);
    let mut cross = CosseratRod::straight(
        "cross",
        Point3::new(0.5, -0.5, 0.09),
        Point3::new(0.5, 0.5, 0.09),
        Vector3::z(),
        1,
        &RodConfig::soft_filament(0.05),
    )
    .unwrap();

    RodRodContact::new(100.0, 0.0).apply(&mut lower, &mut cross);

    let forces = lower.external_forces();
    let total = sum(forces);
    assert_relative_eq!(total, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-9);

    let contact_point = Vector3::new(0.5, 0.0, 0.0);
    assert_relative_eq!(
        moment(&lower.state().positions, forces),
        contact_point.cross(&total),
        epsilon = 1e-9
    );
}

#[test]
fn test_end_element_redistribution_point() {
    // Contact on the first element lands at x0 + 2/3 e under the linear shape functions
    let mut lower = rod_along_x(Point3::origin(), 1.0, 5, 0.05);
    let mut cross = CosseratRod::straight(
        "cross",
        Point3::new(0.1, -0.5, 0.09),
        Point3::new(0.1, 0.5, 0.09),
        Vector3::z(),
        1,
        &RodConfig::soft_filament(0.05),
    )
    .unwrap();

    RodRodContact::new(100.0, 0.0).apply(&mut lower, &mut cross);

    let forces = lower.external_forces();
    let total = sum(forces);
    assert_relative_eq!(total.z, -1.0, epsilon = 1e-9);

    let equivalent_point = Vector3::new(0.2 * 2.0 / 3.0, 0.0, 0.0);
    assert_relative_eq!(
        moment(&lower.state().positions, forces),
        equivalent_point.cross(&total),
        epsilon = 1e-9
    );
}

// =============================================================================
// Self contact
// =============================================================================

#[test]
fn test_self_contact_ignores_neighbours() {
    // Thick elements overlap their neighbours but stay inside the skip window
    let mut rod = rod_along_x(Point3::origin(), 1.0, 10, 0.05);
    assert_eq!(RodSelfContact::skip_window(0.05, 0.1), 3);

    RodSelfContact::new(1e4, 10.0).apply(&mut rod);

    assert!(rod.external_forces().iter().all(|f| *f == Vector3::zeros()));
}

#[test]
fn test_self_contact_on_hairpin() {
    let mut hairpin = rod_along_x(Point3::origin(), 1.0, 10, 0.05);
    {
        let positions = &mut hairpin.state_mut().positions;
        for (k, p) in positions.iter_mut().enumerate() {
            *p = match k {
                0..=5 => Vector3::new(0.1 * k as f64, 0.0, 0.0),
                _ => Vector3::new(0.1 * (11 - k) as f64, 0.08, 0.0),
            };
        }
    }
    hairpin.compute_internal_forces_and_torques().unwrap();

    let mut systems: Vec<ContactSystem> = vec![hairpin.into()];
    ContactPair::new(RodSelfContact::new(100.0, 0.0), &systems, 0, 0)
        .unwrap()
        .apply(&mut systems)
        .unwrap();

    let forces = as_rod(&systems[0]).external_forces();
    assert_relative_eq!(sum(forces), Vector3::zeros(), epsilon = 1e-9);
    assert!(forces[10].y > 0.0);
    assert!(forces[0].y < 0.0);
}

/// Two-turn helix about z with 16 elements per turn, coil radius 0.2 and
/// rod radius 0.05, rebuilt so that rest lengths match the coiled elements.
fn helix(pitch: f64) -> CosseratRod {
    const PER_TURN: usize = 16;
    const COIL_RADIUS: f64 = 0.2;
    let n = 2 * PER_TURN;
    let step = std::f64::consts::TAU / PER_TURN as f64;
    let chord = 2.0 * COIL_RADIUS * (0.5 * step).sin();
    let rise = pitch / PER_TURN as f64;
    let element_length = chord.hypot(rise);

    let mut rod = rod_along_x(Point3::origin(), n as f64 * element_length, n, 0.05);
    for (k, p) in rod.state_mut().positions.iter_mut().enumerate() {
        let angle = step * k as f64;
        *p = Vector3::new(
            COIL_RADIUS * angle.cos(),
            COIL_RADIUS * angle.sin(),
            rise * k as f64,
        );
    }
    rod.compute_internal_forces_and_torques().unwrap();
    rod
}

#[test]
fn test_loose_coil_has_no_self_contact() {
    // Neighbouring elements overlap, every pair outside the skip window is
    // at least 0.15 apart
    let mut coil = helix(0.3);
    let strains = coil.strains();
    assert_eq!(RodSelfContact::skip_window(strains.radius[5], strains.lengths[5]), 3);
    assert!(strains.lengths[5] < 2.0 * strains.radius[5]);

    RodSelfContact::new(1e3, 0.0).apply(&mut coil);

    assert!(coil.external_forces().iter().all(|f| *f == Vector3::zeros()));
}

#[test]
fn test_touching_coil_turns_push_apart() {
    // Turns 0.09 apart overlap by at least 0.01
    let mut coil = helix(0.09);
    RodSelfContact::new(1e3, 0.0).apply(&mut coil);
    let forces = coil.external_forces();

    assert_relative_eq!(sum(forces), Vector3::zeros(), epsilon = 1e-9);
    assert!(forces[0].z < -10.0);

    // A half turn about x through node 16 maps the coil onto itself
    let mirrored = Vector3::new(forces[0].x, -forces[0].y, -forces[0].z);
    assert_relative_eq!(forces[32], mirrored, epsilon = 1e-9);

    let lower_turn: f64 = forces[..=8].iter().map(|f| f.z).sum();
    let upper_turn: f64 = forces[24..].iter().map(|f| f.z).sum();
    assert!(lower_turn < 0.0);
    assert!(upper_turn > 0.0);
}

// =============================================================================
// Rod-cylinder
// =============================================================================

#[test]
fn test_rod_cylinder_through_pair() {
    let rod_system = rod_along_x(Point3::origin(), 1.0, 5, 0.01);
    let mut cylinder = RigidCylinder::new(
        Point3::new(0.5, -1.0, 0.2),
        Vector3::y(),
        Vector3::z(),
        2.0,
        0.2,
        1000.0,
    )
    .unwrap();
    cylinder.velocity = Vector3::new(0.0, 0.0, -1.0);

    let mut systems: Vec<ContactSystem> = vec![rod_system.into(), cylinder.into()];
    let law = RodCylinderContact::new(100.0, 2.0)
        .with_friction(ViscousCoulombFriction::new(10.0, 0.3));
    ContactPair::new(law, &systems, 0, 1)
        .unwrap()
        .apply(&mut systems)
        .unwrap();

    // Spring k γ = 1 plus damping ν |v| = 2
    let cylinder = systems[1].as_cylinder().unwrap();
    assert_relative_eq!(cylinder.external_forces, Vector3::new(0.0, 0.0, 3.0), epsilon = 1e-9);
    // Contact at the centre: no moment
    assert_relative_eq!(cylinder.external_torques, Vector3::zeros(), epsilon = 1e-9);
    assert_relative_eq!(
        sum(as_rod(&systems[0]).external_forces()),
        -cylinder.external_forces,
        epsilon = 1e-9
    );
}

// =============================================================================
// Planes
// =============================================================================

#[test]
fn test_rod_and_cylinder_on_ground() {
    let mut rod_system = rod_along_x(Point3::new(0.0, 0.0, 0.01), 1.0, 4, 0.01);
    for f in rod_system.external_forces_mut() {
        *f = Vector3::new(0.0, 0.0, -0.5);
    }
    let mut cylinder = RigidCylinder::new(
        Point3::new(3.0, 0.0, 0.0),
        Vector3::z(),
        Vector3::x(),
        0.5,
        0.1,
        1.0,
    )
    .unwrap();
    cylinder.external_forces = Vector3::new(0.0, 0.0, -4.0);

    let mut systems: Vec<ContactSystem> =
        vec![rod_system.into(), cylinder.into(), Plane::ground().into()];
    let pairs = [
        ContactPair::new(RodPlaneContact::new(1e3, 0.0), &systems, 0, 2).unwrap(),
        ContactPair::new(CylinderPlaneContact::new(1e3, 0.0), &systems, 1, 2).unwrap(),
    ];
    apply_all(&pairs, &mut systems).unwrap();

    // Both bodies rest exactly on the plane, so the reaction balances the load
    assert_relative_eq!(sum(as_rod(&systems[0]).external_forces()), Vector3::zeros(), epsilon = 1e-9);
    assert_relative_eq!(
        systems[1].as_cylinder().unwrap().external_forces,
        Vector3::zeros(),
        epsilon = 1e-9
    );
}

#[test]
fn test_tilted_plane_pushes_along_normal() {
    let normal = Vector3::new(0.0, 1.0, 1.0);
    let plane = Plane::new(Point3::origin(), normal).unwrap();
    let mut rod_system = rod_along_x(Point3::new(0.0, -0.1, -0.1), 1.0, 4, 0.01);

    RodPlaneContact::new(10.0, 0.0).apply(&mut rod_system, &plane);

    let total = sum(rod_system.external_forces());
    assert!(total.norm() > 0.0);
    assert_relative_eq!(total.normalize(), normal.normalize(), epsilon = 1e-9);
}

#[test]
fn test_anisotropic_plane_through_pair() {
    let mut rod_system = rod_along_x(Point3::new(0.0, 0.0, 0.01), 1.0, 4, 0.01);
    for f in rod_system.external_forces_mut() {
        *f = Vector3::new(0.0, 0.0, -1.0);
    }
    for v in &mut rod_system.state_mut().velocities {
        *v = Vector3::new(0.0, 1.0, 0.0);
    }

    let mut systems: Vec<ContactSystem> = vec![rod_system.into(), Plane::ground().into()];
    let law = AnisotropicFrictionPlane::new(
        1e3,
        0.0,
        1e-4,
        DirectionalFriction::isotropic(0.0),
        DirectionalFriction::new(0.0, 0.0, 0.4),
    );
    ContactPair::new(law, &systems, 0, 1)
        .unwrap()
        .apply(&mut systems)
        .unwrap();

    // Sideways kinetic friction 0.4 × total normal load 5 opposes the motion
    let total = sum(as_rod(&systems[0]).external_forces());
    assert_relative_eq!(total.y, -2.0, epsilon = 1e-9);
}

// =============================================================================
// Registration errors
// =============================================================================

#[test]
fn test_registration_errors() {
    let cylinder =
        RigidCylinder::new(Point3::origin(), Vector3::z(), Vector3::x(), 1.0, 0.1, 1.0).unwrap();
    let systems: Vec<ContactSystem> = vec![
        rod_along_x(Point3::origin(), 1.0, 3, 0.01).into(),
        rod_along_x(Point3::new(0.0, 1.0, 0.0), 1.0, 3, 0.01).into(),
        cylinder.into(),
        Plane::ground().into(),
    ];

    let err = ContactPair::new(RodPlaneContact::new(1.0, 0.0), &systems, 3, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rod-plane contact cannot act between a surface and a rod"
    );

    let err = ContactPair::new(CylinderPlaneContact::new(1.0, 0.0), &systems, 0, 3).unwrap_err();
    assert_eq!(
        err,
        ContactError::InvalidOrder {
            law: CylinderPlaneContact::NAME,
            first: SystemKind::Rod,
            second: SystemKind::Surface,
        }
    );

    assert!(matches!(
        ContactPair::new(RodRodContact::new(1.0, 0.0), &systems, 0, 0),
        Err(ContactError::IdenticalSystems { .. })
    ));
    assert!(matches!(
        ContactPair::new(RodSelfContact::new(1.0, 0.0), &systems, 0, 1),
        Err(ContactError::SelfContactMismatch { first: 0, second: 1 })
    ));
    assert!(matches!(
        ContactPair::new(RodSelfContact::new(1.0, 0.0), &systems, 2, 2),
        Err(ContactError::InvalidOrder { .. })
    ));
}

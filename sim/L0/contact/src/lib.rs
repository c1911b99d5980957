//! Penalty contact between Cosserat rods, rigid cylinders and planes.
//!
//! Contact is resolved with stiff springs and dampers that activate when
//! bodies interpenetrate, plus Coulomb-type friction where the law asks for
//! it. There is no persistent contact manifold; every call recomputes the
//! loads from the current state and adds them to the participants'
//! external force and torque accumulators.
//!
//! # Pipeline
//!
//! ```text
//! ContactPair::apply
//!     │
//!     ├─ broad phase   Aabb::from_rod / Aabb::from_cylinder   (reject whole pair)
//!     ├─ per element   bounding-sphere reject
//!     ├─ narrow phase  geometry::closest_points                (segment vs segment)
//!     └─ force law     spring + damping [+ friction] ─► node redistribution
//! ```
//!
//! Planes skip the broad phase and are evaluated element by element.
//!
//! # Quick Start
//!
//! ```
//! use sim_contact::{ContactPair, ContactSystem, RodRodContact};
//! use sim_rod::{CosseratRod, RodConfig};
//! use nalgebra::{Point3, Vector3};
//!
//! let config = RodConfig::soft_filament(0.05);
//! let rod = |z: f64| {
//!     CosseratRod::straight(
//!         "rod",
//!         Point3::new(0.0, 0.0, z),
//!         Point3::new(1.0, 0.0, z),
//!         Vector3::y(),
//!         10,
//!         &config,
//!     )
//! };
//!
//! // Two rods whose surfaces overlap by 0.02
//! let mut systems: Vec<ContactSystem> = vec![rod(0.0)?.into(), rod(0.08)?.into()];
//! let pair = ContactPair::new(RodRodContact::new(1e3, 1.0), &systems, 0, 1)?;
//! pair.apply(&mut systems)?;
//!
//! let lift: f64 = systems[1]
//!     .as_rod()
//!     .map(|rod| rod.external_forces().iter().map(|f| f.z).sum())
//!     .unwrap_or_default();
//! assert!(lift > 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Ordering
//!
//! Laws take their participants in the order rod, rigid body, surface.
//! [`ContactPair::new`] rejects any other order with
//! [`ContactError::InvalidOrder`].
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![doc(html_root_url = "https://docs.rs/sim-contact/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::uninlined_format_args, clippy::float_cmp))]

pub mod bodies;
pub mod broad_phase;
pub mod error;
pub mod friction;
pub mod geometry;
pub mod laws;
pub mod pair;

pub use bodies::{ContactSystem, Plane, RigidCylinder, SystemKind};
pub use broad_phase::Aabb;
pub use error::{ContactError, Result};
pub use friction::{DirectionalFriction, ViscousCoulombFriction};
pub use geometry::{SegmentProximity, closest_points};
pub use laws::{
    AnisotropicFrictionPlane, CylinderPlaneContact, PlaneResponse, RodCylinderContact,
    RodPlaneContact, RodRodContact, RodSelfContact, boundary_weights,
};
pub use pair::{ContactLaw, ContactPair, apply_all};

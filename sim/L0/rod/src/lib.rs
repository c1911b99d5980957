//! Cosserat rod mechanics: strains, constitutive laws and internal loads.
//!
//! A Cosserat rod is a slender body described by a centreline and an
//! orthonormal director frame per cross-section. It resists stretch,
//! shear, bending and twist. This crate evaluates the internal force and
//! torque of a discretized rod for a given kinematic state; time
//! integration is left to the caller.
//!
//! # Discretization
//!
//! ```text
//!   x0      x1      x2      x3          nodes: position, velocity, mass
//!   ●───────●───────●───────●
//!     Q0,ω0   Q1,ω1   Q2,ω2             elements: directors, angular velocity
//!         κ0      κ1                    voronoi: curvature, couple
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RodState ──compute_strains──► Strains ──ConstitutiveModel──► Stresses
//!     │                            │                              │
//!     └────────────────────────────┴──────────assemble────────────┴──► InternalLoads
//! ```
//!
//! Each stage is a pure function. [`CosseratRod`] bundles the state with its
//! properties and model and runs all three stages in
//! [`CosseratRod::compute_internal_forces_and_torques`].
//!
//! # Quick Start
//!
//! ```
//! use sim_rod::{CosseratRod, RodConfig};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut rod = CosseratRod::straight(
//!     "filament",
//!     Point3::origin(),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Vector3::x(),
//!     20,
//!     &RodConfig::soft_filament(0.01),
//! )?;
//!
//! // Stretch the last node and evaluate internal loads
//! rod.state_mut().positions[20].z += 0.01;
//! rod.compute_internal_forces_and_torques()?;
//!
//! assert!(rod.internal_forces()[20].z < 0.0);
//! # Ok::<(), sim_rod::RodError>(())
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![doc(html_root_url = "https://docs.rs/sim-rod/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
// Allow precision loss when converting indices to f64 - these are small values
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::uninlined_format_args, clippy::float_cmp))]

pub mod assembly;
pub mod calculus;
pub mod config;
pub mod constitutive;
pub mod error;
pub mod rod;
pub mod rotations;
pub mod state;
pub mod strain;

pub use assembly::{InternalLoads, TorqueTerms, assemble, torque_terms};
pub use config::RodConfig;
pub use constitutive::{ConstitutiveModel, LinearElastic, StrainRateMatrices, Stresses};
pub use error::{Result, RodError};
pub use rod::CosseratRod;
#[cfg(feature = "parallel")]
pub use rod::compute_internal_loads_parallel;
pub use state::{MASS_CONSISTENCY_TOLERANCE, RodProperties, RodState};
pub use strain::{Strains, compute_strains};

//! Batched per-element math kernels for rod simulation.
//!
//! Discretized rods carry all of their state as collections: one vector per
//! node, one vector or frame per element, one vector or matrix per Voronoi
//! domain. This crate provides the batch kernels the rod mechanics and the
//! contact laws are written in terms of.
//!
//! # Architecture
//!
//! - [`Vec3x4`] - 4 `Vector3<f64>` values in structure-of-arrays layout
//! - Slice kernels ([`batch_cross`], [`batch_dot`], [`batch_norm`],
//!   [`batch_scale`]) that stream through `Vec3x4` chunks and finish the
//!   remainder with scalar code
//! - [`batch_add_assign`] accumulating one collection into another
//! - Matrix kernels ([`batch_matvec`], [`batch_matvec_transpose`]) applying
//!   one 3x3 matrix per element
//!
//! # Example
//!
//! ```
//! use sim_simd::{batch_cross, batch_matvec};
//! use nalgebra::{Matrix3, Vector3};
//!
//! let directors = vec![Matrix3::identity(); 3];
//! let tangents = vec![Vector3::z(); 3];
//!
//! // Tangents expressed in each element's material frame
//! let local = batch_matvec(&directors, &tangents);
//! assert_eq!(local[1], Vector3::z());
//!
//! let torque = batch_cross(&local, &vec![Vector3::x(); 3]);
//! assert_eq!(torque[2], Vector3::y());
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]
// Indexed loops keep the lane structure visible to the auto-vectorizer
#![allow(clippy::needless_range_loop)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]

mod batch_ops;
mod vec3x4;

pub use batch_ops::*;
pub use vec3x4::*;

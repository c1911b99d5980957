//! Contact participants: rods, rigid cylinders and planes.

use std::fmt;

use nalgebra::{Matrix3, Point3, Vector3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sim_rod::CosseratRod;

use crate::error::{ContactError, Result, positive};

/// Category of a contact participant.
///
/// Contact pairs are ordered `Rod` → `RigidBody` → `Surface`: a rod may
/// touch anything, a rigid body may touch rigid bodies and surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SystemKind {
    /// A Cosserat rod.
    Rod,
    /// A rigid body.
    RigidBody,
    /// A static surface.
    Surface,
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rod => write!(f, "rod"),
            Self::RigidBody => write!(f, "rigid body"),
            Self::Surface => write!(f, "surface"),
        }
    }
}

// =============================================================================
// Rigid cylinder
// =============================================================================

/// A rigid cylinder.
///
/// The director stores `d1`, `d2`, `d3` as rows with `d3` along the axis.
/// External torques are accumulated in the body frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigidCylinder {
    /// Centre of the cylinder.
    pub position: Vector3<f64>,
    /// Orientation (rows are `d1`, `d2`, `d3`).
    pub director: Matrix3<f64>,
    /// Linear velocity of the centre.
    pub velocity: Vector3<f64>,
    /// Angular velocity (body frame).
    pub omega: Vector3<f64>,
    /// Radius.
    pub radius: f64,
    /// Length along `d3`.
    pub length: f64,
    /// Mass.
    pub mass: f64,
    /// External force accumulator (lab frame).
    pub external_forces: Vector3<f64>,
    /// External torque accumulator (body frame).
    pub external_torques: Vector3<f64>,
}

impl RigidCylinder {
    /// Create a cylinder at rest whose base is centred on `start`.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive length, radius or density, a zero
    /// direction, or a normal parallel to the direction.
    pub fn new(
        start: Point3<f64>,
        direction: Vector3<f64>,
        normal: Vector3<f64>,
        length: f64,
        radius: f64,
        density: f64,
    ) -> Result<Self> {
        positive("cylinder length", length)?;
        positive("cylinder radius", radius)?;
        positive("cylinder density", density)?;

        let axis = direction
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| ContactError::invalid_params("cylinder direction must be non-zero"))?;
        let d1 = (normal - axis * axis.dot(&normal))
            .try_normalize(1e-12)
            .ok_or_else(|| {
                ContactError::invalid_params("cylinder normal must not be parallel to its axis")
            })?;
        let d2 = axis.cross(&d1);

        let mass = density * std::f64::consts::PI * radius * radius * length;
        debug!(length, radius, mass, "created rigid cylinder");

        Ok(Self {
            position: start.coords + axis * (0.5 * length),
            director: Matrix3::from_rows(&[d1.transpose(), d2.transpose(), axis.transpose()]),
            velocity: Vector3::zeros(),
            omega: Vector3::zeros(),
            radius,
            length,
            mass,
            external_forces: Vector3::zeros(),
            external_torques: Vector3::zeros(),
        })
    }

    /// Unit axis `d3`.
    #[must_use]
    pub fn axis(&self) -> Vector3<f64> {
        self.director.row(2).transpose()
    }

    /// Centre of the base face, `position - L/2 d3`.
    #[must_use]
    pub fn start(&self) -> Vector3<f64> {
        self.position - self.axis() * (0.5 * self.length)
    }

    /// Axis segment from base to tip, `L d3`.
    #[must_use]
    pub fn axis_edge(&self) -> Vector3<f64> {
        self.axis() * self.length
    }

    /// Zero the external force and torque accumulators.
    pub fn reset_external_loads(&mut self) {
        self.external_forces = Vector3::zeros();
        self.external_torques = Vector3::zeros();
    }
}

// =============================================================================
// Plane
// =============================================================================

/// An infinite static plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    origin: Vector3<f64>,
    normal: Vector3<f64>,
}

impl Plane {
    /// Create a plane through `origin` with the given normal.
    ///
    /// The normal is normalised; bodies are pushed towards `+normal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero or not finite.
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Result<Self> {
        let normal = normal
            .try_normalize(f64::EPSILON)
            .filter(|n| n.iter().all(|x| x.is_finite()))
            .ok_or_else(|| ContactError::invalid_params("plane normal must be non-zero"))?;
        Ok(Self {
            origin: origin.coords,
            normal,
        })
    }

    /// The ground plane `z = 0` facing `+z`.
    #[must_use]
    pub fn ground() -> Self {
        Self {
            origin: Vector3::zeros(),
            normal: Vector3::z(),
        }
    }

    /// A point on the plane.
    #[must_use]
    pub fn origin(&self) -> Vector3<f64> {
        self.origin
    }

    /// Unit normal.
    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Signed distance of a point above the plane.
    #[must_use]
    pub fn signed_distance(&self, point: &Vector3<f64>) -> f64 {
        self.normal.dot(&(point - self.origin))
    }
}

// =============================================================================
// Registered systems
// =============================================================================

/// A participant registered for contact.
#[derive(Debug, Clone)]
pub enum ContactSystem {
    /// A Cosserat rod.
    Rod(CosseratRod),
    /// A rigid cylinder.
    Cylinder(RigidCylinder),
    /// A static plane.
    Plane(Plane),
}

impl ContactSystem {
    /// Category of this participant.
    #[must_use]
    pub fn kind(&self) -> SystemKind {
        match self {
            Self::Rod(_) => SystemKind::Rod,
            Self::Cylinder(_) => SystemKind::RigidBody,
            Self::Plane(_) => SystemKind::Surface,
        }
    }

    /// The rod, if this is one.
    #[must_use]
    pub fn as_rod(&self) -> Option<&CosseratRod> {
        match self {
            Self::Rod(rod) => Some(rod),
            _ => None,
        }
    }

    /// The rod, mutably, if this is one.
    pub fn as_rod_mut(&mut self) -> Option<&mut CosseratRod> {
        match self {
            Self::Rod(rod) => Some(rod),
            _ => None,
        }
    }

    /// The cylinder, if this is one.
    #[must_use]
    pub fn as_cylinder(&self) -> Option<&RigidCylinder> {
        match self {
            Self::Cylinder(cylinder) => Some(cylinder),
            _ => None,
        }
    }

    /// The cylinder, mutably, if this is one.
    pub fn as_cylinder_mut(&mut self) -> Option<&mut RigidCylinder> {
        match self {
            Self::Cylinder(cylinder) => Some(cylinder),
            _ => None,
        }
    }

    /// The plane, if this is one.
    #[must_use]
    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            Self::Plane(plane) => Some(plane),
            _ => None,
        }
    }
}

impl From<CosseratRod> for ContactSystem {
    fn from(rod: CosseratRod) -> Self {
        Self::Rod(rod)
    }
}

impl From<RigidCylinder> for ContactSystem {
    fn from(cylinder: RigidCylinder) -> Self {
        Self::Cylinder(cylinder)
    }
}

impl From<Plane> for ContactSystem {
    fn from(plane: Plane) -> Self {
        Self::Plane(plane)
    }
}

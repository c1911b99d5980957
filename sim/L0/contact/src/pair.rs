//! Registration and dispatch of contact pairs.
//!
//! A [`ContactPair`] binds a [`ContactLaw`] to two entries of a system
//! slice. Kinds, order and identity are checked once when the pair is
//! created; applying the pair afterwards only looks the systems up again.
//!
//! ```text
//! allowed order:   Rod  ──►  RigidBody  ──►  Surface
//!
//! RodRod               Rod        Rod        (distinct)
//! RodSelf              Rod        Rod        (same index)
//! RodCylinder          Rod        RigidBody
//! RodPlane             Rod        Surface
//! RodPlaneAnisotropic  Rod        Surface
//! CylinderPlane        RigidBody  Surface
//! ```

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bodies::{ContactSystem, SystemKind};
use crate::error::{ContactError, Result};
use crate::laws::{
    AnisotropicFrictionPlane, CylinderPlaneContact, RodCylinderContact, RodPlaneContact,
    RodRodContact, RodSelfContact,
};

/// A contact law with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactLaw {
    /// Two distinct rods.
    RodRod(RodRodContact),
    /// A rod with itself.
    RodSelf(RodSelfContact),
    /// A rod and a rigid cylinder.
    RodCylinder(RodCylinderContact),
    /// A rod and a plane, normal response only.
    RodPlane(RodPlaneContact),
    /// A rod and a plane with anisotropic friction.
    RodPlaneAnisotropic(AnisotropicFrictionPlane),
    /// A rigid cylinder and a plane.
    CylinderPlane(CylinderPlaneContact),
}

impl ContactLaw {
    /// Name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RodRod(_) => RodRodContact::NAME,
            Self::RodSelf(_) => RodSelfContact::NAME,
            Self::RodCylinder(_) => RodCylinderContact::NAME,
            Self::RodPlane(_) => RodPlaneContact::NAME,
            Self::RodPlaneAnisotropic(_) => AnisotropicFrictionPlane::NAME,
            Self::CylinderPlane(_) => CylinderPlaneContact::NAME,
        }
    }

    /// Kinds of the first and second participant.
    #[must_use]
    pub const fn participants(&self) -> (SystemKind, SystemKind) {
        match self {
            Self::RodRod(_) | Self::RodSelf(_) => (SystemKind::Rod, SystemKind::Rod),
            Self::RodCylinder(_) => (SystemKind::Rod, SystemKind::RigidBody),
            Self::RodPlane(_) | Self::RodPlaneAnisotropic(_) => {
                (SystemKind::Rod, SystemKind::Surface)
            }
            Self::CylinderPlane(_) => (SystemKind::RigidBody, SystemKind::Surface),
        }
    }

    /// Validate the law's parameters.
    ///
    /// # Errors
    ///
    /// Returns the law's parameter error.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RodRod(law) => law.validate(),
            Self::RodSelf(law) => law.validate(),
            Self::RodCylinder(law) => law.validate(),
            Self::RodPlane(law) => law.validate(),
            Self::RodPlaneAnisotropic(law) => law.validate(),
            Self::CylinderPlane(law) => law.validate(),
        }
    }
}

macro_rules! impl_from_law {
    ($($law:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$law> for ContactLaw {
                fn from(law: $law) -> Self {
                    Self::$variant(law)
                }
            }
        )*
    };
}

impl_from_law! {
    RodRodContact => RodRod,
    RodSelfContact => RodSelf,
    RodCylinderContact => RodCylinder,
    RodPlaneContact => RodPlane,
    AnisotropicFrictionPlane => RodPlaneAnisotropic,
    CylinderPlaneContact => CylinderPlane,
}

/// A contact law bound to two registered systems.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPair {
    law: ContactLaw,
    first: usize,
    second: usize,
}

impl ContactPair {
    /// Bind `law` to `systems[first]` and `systems[second]`.
    ///
    /// # Errors
    ///
    /// - [`ContactError::UnknownSystem`] if an index is out of range.
    /// - [`ContactError::InvalidOrder`] if the kinds do not match the law
    ///   or are given out of the rod, rigid body, surface order.
    /// - [`ContactError::IdenticalSystems`] for rod-rod contact of a rod
    ///   with itself.
    /// - [`ContactError::SelfContactMismatch`] for self contact between two
    ///   different systems.
    /// - [`ContactError::InvalidParams`] if the law's parameters are invalid.
    pub fn new(
        law: impl Into<ContactLaw>,
        systems: &[ContactSystem],
        first: usize,
        second: usize,
    ) -> Result<Self> {
        let law = law.into();
        let pair = Self { law, first, second };
        pair.check_participants(systems)?;

        match law {
            ContactLaw::RodRod(_) if first == second => {
                return Err(ContactError::IdenticalSystems { law: law.name() });
            }
            ContactLaw::RodSelf(_) if first != second => {
                return Err(ContactError::SelfContactMismatch { first, second });
            }
            _ => {}
        }
        law.validate()?;

        debug!(law = law.name(), first, second, "registered contact pair");
        Ok(pair)
    }

    /// The contact law.
    #[must_use]
    pub const fn law(&self) -> &ContactLaw {
        &self.law
    }

    /// Index of the first participant.
    #[must_use]
    pub const fn first(&self) -> usize {
        self.first
    }

    /// Index of the second participant.
    #[must_use]
    pub const fn second(&self) -> usize {
        self.second
    }

    /// Accumulate this pair's contact loads into the participants.
    ///
    /// # Errors
    ///
    /// Returns an error if `systems` no longer holds participants of the
    /// registered kinds at the registered indices.
    pub fn apply(&self, systems: &mut [ContactSystem]) -> Result<()> {
        self.check_participants(systems)?;

        match self.law {
            ContactLaw::RodRod(law) => {
                if let (ContactSystem::Rod(a), ContactSystem::Rod(b)) = self.pair_mut(systems)? {
                    law.apply(a, b);
                }
            }
            ContactLaw::RodSelf(law) => {
                if let ContactSystem::Rod(rod) = &mut systems[self.first] {
                    law.apply(rod);
                }
            }
            ContactLaw::RodCylinder(law) => {
                if let (ContactSystem::Rod(rod), ContactSystem::Cylinder(cylinder)) =
                    self.pair_mut(systems)?
                {
                    law.apply(rod, cylinder);
                }
            }
            ContactLaw::RodPlane(law) => {
                if let (ContactSystem::Rod(rod), ContactSystem::Plane(plane)) =
                    self.pair_mut(systems)?
                {
                    law.apply(rod, plane);
                }
            }
            ContactLaw::RodPlaneAnisotropic(law) => {
                if let (ContactSystem::Rod(rod), ContactSystem::Plane(plane)) =
                    self.pair_mut(systems)?
                {
                    law.apply(rod, plane);
                }
            }
            ContactLaw::CylinderPlane(law) => {
                if let (ContactSystem::Cylinder(cylinder), ContactSystem::Plane(plane)) =
                    self.pair_mut(systems)?
                {
                    law.apply(cylinder, plane);
                }
            }
        }
        Ok(())
    }

    fn kind_at(systems: &[ContactSystem], index: usize) -> Result<SystemKind> {
        systems
            .get(index)
            .map(ContactSystem::kind)
            .ok_or(ContactError::UnknownSystem { index })
    }

    fn check_participants(&self, systems: &[ContactSystem]) -> Result<()> {
        let first = Self::kind_at(systems, self.first)?;
        let second = Self::kind_at(systems, self.second)?;
        if (first, second) != self.law.participants() {
            return Err(ContactError::invalid_order(self.law.name(), first, second));
        }
        Ok(())
    }

    /// Mutable access to two distinct participants.
    fn pair_mut<'a>(
        &self,
        systems: &'a mut [ContactSystem],
    ) -> Result<(&'a mut ContactSystem, &'a mut ContactSystem)> {
        let (i, j) = (self.first, self.second);
        if i == j {
            return Err(ContactError::IdenticalSystems {
                law: self.law.name(),
            });
        }
        if i < j {
            let (head, tail) = systems.split_at_mut(j);
            Ok((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = systems.split_at_mut(i);
            Ok((&mut tail[0], &mut head[j]))
        }
    }
}

/// Apply every pair in order.
///
/// Pairs write into shared accumulators, so they run sequentially.
///
/// # Errors
///
/// Stops at the first pair that fails.
pub fn apply_all(pairs: &[ContactPair], systems: &mut [ContactSystem]) -> Result<()> {
    pairs.iter().try_for_each(|pair| pair.apply(systems))
}

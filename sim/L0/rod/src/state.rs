//! Kinematic state and fixed physical properties of a discretized rod.

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RodError, check_len};

/// Relative tolerance between lumped nodal masses and `density * volume`.
pub const MASS_CONSISTENCY_TOLERANCE: f64 = 1e-8;

/// Kinematic state of a rod with `n` elements.
///
/// ```text
/// positions, velocities   n + 1   (nodes)
/// omegas, directors       n       (elements)
/// ```
///
/// Angular velocities are expressed in the material frame. Each director
/// matrix stores `d1`, `d2`, `d3` as rows and must stay orthonormal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodState {
    /// Node positions.
    pub positions: Vec<Vector3<f64>>,
    /// Node velocities.
    pub velocities: Vec<Vector3<f64>>,
    /// Element angular velocities (material frame).
    pub omegas: Vec<Vector3<f64>>,
    /// Element director frames (rows are `d1`, `d2`, `d3`).
    pub directors: Vec<Matrix3<f64>>,
}

impl RodState {
    /// Create a state at rest from node positions and element directors.
    #[must_use]
    pub fn at_rest(positions: Vec<Vector3<f64>>, directors: Vec<Matrix3<f64>>) -> Self {
        Self {
            velocities: vec![Vector3::zeros(); positions.len()],
            omegas: vec![Vector3::zeros(); directors.len()],
            positions,
            directors,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn n_elements(&self) -> usize {
        self.directors.len()
    }

    /// Check every collection against the element count.
    ///
    /// # Errors
    ///
    /// Returns [`RodError::DimensionMismatch`] if the node/element counts
    /// disagree, or [`RodError::InvalidConfig`] for an empty rod.
    pub fn check_dimensions(&self) -> Result<()> {
        let n = self.n_elements();
        if n == 0 {
            return Err(RodError::invalid_config("rod must have at least one element"));
        }
        check_len("positions", &self.positions, n + 1)?;
        check_len("velocities", &self.velocities, n + 1)?;
        check_len("omegas", &self.omegas, n)?;
        Ok(())
    }

    /// Check that every entry is finite.
    ///
    /// # Errors
    ///
    /// Returns [`RodError::NonFiniteState`] naming the first bad collection.
    pub fn check_finite(&self) -> Result<()> {
        check_vectors_finite("positions", &self.positions)?;
        check_vectors_finite("velocities", &self.velocities)?;
        check_vectors_finite("omegas", &self.omegas)?;
        match self
            .directors
            .iter()
            .position(|m| !m.iter().all(|x| x.is_finite()))
        {
            Some(index) => Err(RodError::non_finite("directors", index)),
            None => Ok(()),
        }
    }
}

fn check_vectors_finite(what: &'static str, values: &[Vector3<f64>]) -> Result<()> {
    match values.iter().position(|v| !v.iter().all(|x| x.is_finite())) {
        Some(index) => Err(RodError::non_finite(what, index)),
        None => Ok(()),
    }
}

/// Properties fixed at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RodProperties {
    /// Element rest lengths (`n`).
    pub rest_lengths: Vec<f64>,
    /// Voronoi-domain rest lengths (`n - 1`).
    pub rest_voronoi_lengths: Vec<f64>,
    /// Lumped nodal masses (`n + 1`).
    pub mass: Vec<f64>,
    /// Material density.
    pub density: f64,
    /// Element volumes (`n`), conserved as the rod stretches.
    pub volume: Vec<f64>,
    /// Element mass second moments of inertia in the material frame (`n`).
    pub mass_second_moment_of_inertia: Vec<Matrix3<f64>>,
}

impl RodProperties {
    /// Number of elements.
    #[must_use]
    pub fn n_elements(&self) -> usize {
        self.rest_lengths.len()
    }

    /// Total rod mass.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Validate lengths and positivity for a rod with `n` elements.
    ///
    /// # Errors
    ///
    /// Returns an error if a collection has the wrong length or a length,
    /// mass, volume or the density is not positive.
    pub fn validate(&self, n: usize) -> Result<()> {
        check_len("rest_lengths", &self.rest_lengths, n)?;
        check_len("rest_voronoi_lengths", &self.rest_voronoi_lengths, n.saturating_sub(1))?;
        check_len("mass", &self.mass, n + 1)?;
        check_len("volume", &self.volume, n)?;
        check_len(
            "mass_second_moment_of_inertia",
            &self.mass_second_moment_of_inertia,
            n,
        )?;

        let positive = |what: &str, values: &[f64]| -> Result<()> {
            match values.iter().position(|v| !(v.is_finite() && *v > 0.0)) {
                Some(i) => Err(RodError::invalid_config(format!(
                    "{what}[{i}] must be positive, got {}",
                    values[i]
                ))),
                None => Ok(()),
            }
        };
        positive("rest_lengths", &self.rest_lengths)?;
        positive("rest_voronoi_lengths", &self.rest_voronoi_lengths)?;
        positive("mass", &self.mass)?;
        positive("volume", &self.volume)?;
        positive("density", &[self.density])
    }

    /// Check that the nodal masses are the lumped element masses
    /// `density * volume`, half of each element going to each of its nodes.
    ///
    /// Assumes [`validate`](Self::validate) has passed.
    ///
    /// # Errors
    ///
    /// Returns [`RodError::InvalidConfig`] naming the first node whose mass
    /// differs from the lumped value by more than
    /// [`MASS_CONSISTENCY_TOLERANCE`] relative.
    pub fn check_mass_consistency(&self) -> Result<()> {
        for (j, &mass) in self.mass.iter().enumerate() {
            let left = j.checked_sub(1).and_then(|i| self.volume.get(i));
            let right = self.volume.get(j);
            let volume = left.copied().unwrap_or(0.0) + right.copied().unwrap_or(0.0);
            let expected = 0.5 * self.density * volume;
            if (mass - expected).abs() > MASS_CONSISTENCY_TOLERANCE * expected {
                return Err(RodError::invalid_config(format!(
                    "mass[{j}] = {mass} does not match density * volume = {expected}"
                )));
            }
        }
        Ok(())
    }
}

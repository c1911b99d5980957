//! The Cosserat rod: state, properties, constitutive model and load
//! accumulators in one place.

use nalgebra::{Matrix3, Point3, Vector3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assembly::{InternalLoads, assemble};
use crate::config::RodConfig;
use crate::constitutive::{ConstitutiveModel, LinearElastic, StrainRateMatrices, Stresses};
use crate::error::{Result, RodError};
use crate::state::{RodProperties, RodState};
use crate::strain::{Strains, compute_strains};

/// A discretized Cosserat rod.
///
/// The rod caches the strains and stresses of the last call to
/// [`compute_internal_forces_and_torques`](Self::compute_internal_forces_and_torques)
/// (or of construction). Contact laws read lengths, tangents and radii from
/// that cache, so the pipeline must run before contacts in every step.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CosseratRod {
    name: String,
    state: RodState,
    properties: RodProperties,
    model: ConstitutiveModel,
    strains: Strains,
    stresses: Stresses,
    internal_forces: Vec<Vector3<f64>>,
    internal_torques: Vec<Vector3<f64>>,
    external_forces: Vec<Vector3<f64>>,
    external_torques: Vec<Vector3<f64>>,
}

impl CosseratRod {
    /// Create a straight, unstressed rod between two points.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the rod
    /// * `start` - Position of the first node
    /// * `end` - Position of the last node
    /// * `normal` - Direction of `d1`; its component along the rod axis is removed
    /// * `n_elements` - Number of elements (nodes = elements + 1)
    /// * `config` - Cross-section and material
    ///
    /// # Errors
    ///
    /// Returns an error if `n_elements` is zero, the rod has zero length, the
    /// normal is parallel to the axis, or the config is invalid.
    pub fn straight(
        name: &str,
        start: Point3<f64>,
        end: Point3<f64>,
        normal: Vector3<f64>,
        n_elements: usize,
        config: &RodConfig,
    ) -> Result<Self> {
        config.validate()?;
        if n_elements == 0 {
            return Err(RodError::invalid_config("rod must have at least one element"));
        }

        let direction = end - start;
        let total_length = direction.norm();
        if !(total_length.is_finite() && total_length > 0.0) {
            return Err(RodError::invalid_config(format!(
                "rod length must be positive, got {total_length}"
            )));
        }
        let tangent = direction / total_length;

        let in_plane = normal - tangent * tangent.dot(&normal);
        let in_plane_norm = in_plane.norm();
        if in_plane_norm <= 1e-12 * normal.norm().max(1.0) {
            return Err(RodError::invalid_config(
                "normal must not be parallel to the rod axis",
            ));
        }
        let d1 = in_plane / in_plane_norm;
        let d2 = tangent.cross(&d1);
        let director = Matrix3::from_rows(&[d1.transpose(), d2.transpose(), tangent.transpose()]);

        let n = n_elements;
        let positions: Vec<Vector3<f64>> = (0..=n)
            .map(|i| start.coords + direction * (i as f64 / n as f64))
            .collect();
        let state = RodState::at_rest(positions, vec![director; n]);

        let rest_length = total_length / n as f64;
        let area = config.area();
        let i1 = config.second_moment_of_area();
        let i3 = 2.0 * i1;

        let element_mass = config.density * area * rest_length;
        let mut mass = vec![0.0; n + 1];
        for i in 0..n {
            mass[i] += 0.5 * element_mass;
            mass[i + 1] += 0.5 * element_mass;
        }

        let properties = RodProperties {
            rest_lengths: vec![rest_length; n],
            rest_voronoi_lengths: vec![rest_length; n - 1],
            mass,
            density: config.density,
            volume: vec![area * rest_length; n],
            mass_second_moment_of_inertia: vec![
                Matrix3::from_diagonal(&Vector3::new(i1, i1, i3))
                    * (config.density * rest_length);
                n
            ],
        };

        let shear_stiffness = config.shear_correction * config.shear_modulus * area;
        let shear = Matrix3::from_diagonal(&Vector3::new(
            shear_stiffness,
            shear_stiffness,
            config.youngs_modulus * area,
        ));
        let element_bend = Matrix3::from_diagonal(&Vector3::new(
            config.youngs_modulus * i1,
            config.youngs_modulus * i1,
            config.shear_modulus * i3,
        ));
        let bend = voronoi_average(&vec![element_bend; n], &properties.rest_lengths);

        let elastic = LinearElastic::unstressed(vec![shear; n], bend);
        let model = match config.retardation_time {
            Some(tau) => ConstitutiveModel::LinearWithStrainRate {
                rate: StrainRateMatrices::kelvin_voigt(&elastic, tau),
                elastic,
            },
            None => ConstitutiveModel::Linear(elastic),
        };

        Self::from_parts(name, state, properties, model)
    }

    /// Create a rod from explicit state, properties and constitutive model.
    ///
    /// Initial strains and stresses are evaluated immediately; load
    /// accumulators start at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if any collection has the wrong length for the
    /// rod's element count, a property is not positive, the nodal masses
    /// disagree with `density * volume`, or the state is degenerate.
    pub fn from_parts(
        name: &str,
        state: RodState,
        properties: RodProperties,
        model: ConstitutiveModel,
    ) -> Result<Self> {
        state.check_dimensions()?;
        let n = state.n_elements();
        properties.validate(n)?;
        properties.check_mass_consistency()?;
        model.validate(n)?;

        let strains = compute_strains(&state, &properties)?;
        let stresses = model.compute_stresses(&strains);

        debug!(
            rod = name,
            n_elements = n,
            total_mass = properties.total_mass(),
            rate_dependent = model.is_rate_dependent(),
            "created cosserat rod"
        );

        Ok(Self {
            name: name.to_string(),
            state,
            properties,
            model,
            strains,
            stresses,
            internal_forces: vec![Vector3::zeros(); n + 1],
            internal_torques: vec![Vector3::zeros(); n],
            external_forces: vec![Vector3::zeros(); n + 1],
            external_torques: vec![Vector3::zeros(); n],
        })
    }

    /// Name of the rod.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of elements.
    #[must_use]
    pub fn n_elements(&self) -> usize {
        self.state.n_elements()
    }

    /// Number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.state.positions.len()
    }

    /// Kinematic state.
    #[must_use]
    pub fn state(&self) -> &RodState {
        &self.state
    }

    /// Mutable kinematic state, for integrators and boundary conditions.
    pub fn state_mut(&mut self) -> &mut RodState {
        &mut self.state
    }

    /// Fixed properties.
    #[must_use]
    pub fn properties(&self) -> &RodProperties {
        &self.properties
    }

    /// Constitutive model.
    #[must_use]
    pub fn model(&self) -> &ConstitutiveModel {
        &self.model
    }

    /// Strains from the last pipeline run.
    #[must_use]
    pub fn strains(&self) -> &Strains {
        &self.strains
    }

    /// Stresses from the last pipeline run.
    #[must_use]
    pub fn stresses(&self) -> &Stresses {
        &self.stresses
    }

    /// Internal force per node.
    #[must_use]
    pub fn internal_forces(&self) -> &[Vector3<f64>] {
        &self.internal_forces
    }

    /// Internal torque per element (material frame).
    #[must_use]
    pub fn internal_torques(&self) -> &[Vector3<f64>] {
        &self.internal_torques
    }

    /// External force accumulator per node.
    #[must_use]
    pub fn external_forces(&self) -> &[Vector3<f64>] {
        &self.external_forces
    }

    /// Mutable external force accumulator.
    pub fn external_forces_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.external_forces
    }

    /// External torque accumulator per element (material frame).
    #[must_use]
    pub fn external_torques(&self) -> &[Vector3<f64>] {
        &self.external_torques
    }

    /// Mutable external torque accumulator.
    pub fn external_torques_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.external_torques
    }

    /// Zero the external force and torque accumulators.
    pub fn reset_external_loads(&mut self) {
        self.external_forces.fill(Vector3::zeros());
        self.external_torques.fill(Vector3::zeros());
    }

    /// Run strains, stresses and assembly for the current state.
    ///
    /// Overwrites the internal force and torque accumulators and refreshes
    /// the cached strains and stresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the state has the wrong dimensions, contains
    /// non-finite values or has a zero-length element. The rod is left
    /// unchanged in that case.
    pub fn compute_internal_forces_and_torques(&mut self) -> Result<()> {
        let strains = compute_strains(&self.state, &self.properties)?;
        let stresses = self.model.compute_stresses(&strains);
        let InternalLoads { forces, torques } =
            assemble(&self.state, &self.properties, &strains, &stresses);

        self.strains = strains;
        self.stresses = stresses;
        self.internal_forces = forces;
        self.internal_torques = torques;
        Ok(())
    }

    /// Net force per node, internal plus external.
    #[must_use]
    pub fn total_forces(&self) -> Vec<Vector3<f64>> {
        self.internal_forces
            .iter()
            .zip(&self.external_forces)
            .map(|(a, b)| a + b)
            .collect()
    }

    /// Net torque per element, internal plus external.
    #[must_use]
    pub fn total_torques(&self) -> Vec<Vector3<f64>> {
        self.internal_torques
            .iter()
            .zip(&self.external_torques)
            .map(|(a, b)| a + b)
            .collect()
    }

    /// Axis-aligned bounds of the node positions.
    #[must_use]
    pub fn bounding_box(&self) -> (Point3<f64>, Point3<f64>) {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.state.positions {
            min = min.inf(&Point3::from(*p));
            max = max.sup(&Point3::from(*p));
        }
        (min, max)
    }
}

/// Average element quantities onto Voronoi domains, weighted by rest length.
fn voronoi_average(element: &[Matrix3<f64>], rest_lengths: &[f64]) -> Vec<Matrix3<f64>> {
    element
        .windows(2)
        .zip(rest_lengths.windows(2))
        .map(|(m, l)| (m[0] * l[0] + m[1] * l[1]) / (l[0] + l[1]))
        .collect()
}

/// Run the internal force pipeline on many independent rods in parallel.
///
/// # Errors
///
/// Returns the first error reported by any rod.
#[cfg(feature = "parallel")]
pub fn compute_internal_loads_parallel(rods: &mut [CosseratRod]) -> Result<()> {
    use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
    rods.par_iter_mut()
        .try_for_each(CosseratRod::compute_internal_forces_and_torques)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn x_rod(n: usize) -> CosseratRod {
        CosseratRod::straight(
            "rod",
            Point3::origin(),
            Point3::new(2.0, 0.0, 0.0),
            Vector3::z(),
            n,
            &RodConfig::soft_filament(0.1),
        )
        .unwrap()
    }

    #[test]
    fn test_straight_geometry() {
        let rod = x_rod(4);

        assert_eq!(rod.n_elements(), 4);
        assert_eq!(rod.n_nodes(), 5);
        assert_eq!(rod.name(), "rod");
        assert_relative_eq!(rod.state().positions[4], Vector3::new(2.0, 0.0, 0.0));

        let q = rod.state().directors[0];
        assert_relative_eq!(q.row(0).transpose(), Vector3::z());
        assert_relative_eq!(q.row(1).transpose(), Vector3::x().cross(&Vector3::z()));
        assert_relative_eq!(q.row(2).transpose(), Vector3::x());
        assert_relative_eq!(q * q.transpose(), Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_straight_mass_and_inertia() {
        let config = RodConfig::soft_filament(0.1);
        let rod = x_rod(4);
        let props = rod.properties();

        let total = config.density * PI * 0.01 * 2.0;
        assert_relative_eq!(props.total_mass(), total, epsilon = 1e-12);
        assert_relative_eq!(props.mass[0], total / 8.0, epsilon = 1e-12);
        assert_relative_eq!(props.mass[2], total / 4.0, epsilon = 1e-12);

        let j = props.mass_second_moment_of_inertia[0];
        assert_relative_eq!(j[(2, 2)], 2.0 * j[(0, 0)], epsilon = 1e-15);
        assert_relative_eq!(rod.strains().radius[1], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_stiffness() {
        let config = RodConfig::soft_filament(0.1);
        let rod = x_rod(3);
        let elastic = rod.model().elastic();
        let area = PI * 0.01;

        assert_relative_eq!(elastic.shear_matrix[0][(2, 2)], config.youngs_modulus * area);
        assert_relative_eq!(
            elastic.shear_matrix[0][(0, 0)],
            config.shear_correction * config.shear_modulus * area
        );
        assert_relative_eq!(
            elastic.bend_matrix[0][(0, 0)],
            config.youngs_modulus * config.second_moment_of_area()
        );
        assert_eq!(elastic.bend_matrix.len(), 2);
    }

    #[test]
    fn test_straight_rejects_bad_input() {
        let config = RodConfig::default();
        let a = Point3::origin();
        let b = Point3::new(0.0, 0.0, 1.0);

        assert!(CosseratRod::straight("r", a, b, Vector3::x(), 0, &config).is_err());
        assert!(CosseratRod::straight("r", a, a, Vector3::x(), 3, &config).is_err());
        assert!(CosseratRod::straight("r", a, b, Vector3::z(), 3, &config).is_err());
        assert!(
            CosseratRod::straight("r", a, b, Vector3::x(), 3, &config.with_radius(-1.0)).is_err()
        );
    }

    #[test]
    fn test_normal_is_orthogonalized() {
        let rod = CosseratRod::straight(
            "r",
            Point3::origin(),
            Point3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            2,
            &RodConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(rod.state().directors[0].row(0).transpose(), Vector3::x());
    }

    #[test]
    fn test_retardation_time_selects_rate_model() {
        let rod = CosseratRod::straight(
            "r",
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Vector3::y(),
            3,
            &RodConfig::default().with_retardation_time(0.01),
        )
        .unwrap();
        assert!(rod.model().is_rate_dependent());
    }

    #[test]
    fn test_from_parts_dimension_check() {
        let rod = x_rod(3);
        let mut props = rod.properties().clone();
        props.mass.pop();

        let result = CosseratRod::from_parts("r", rod.state().clone(), props, rod.model().clone());
        assert_eq!(
            result.err(),
            Some(RodError::dimension_mismatch("mass", 4, 3))
        );
    }

    #[test]
    fn test_from_parts_rejects_inconsistent_volume() {
        let rod = x_rod(3);
        let mut props = rod.properties().clone();
        props.volume[2] *= 1.5;

        let result = CosseratRod::from_parts("r", rod.state().clone(), props, rod.model().clone());
        assert!(matches!(result, Err(RodError::InvalidConfig(_))));
    }

    #[test]
    fn test_pipeline_on_rest_rod_is_zero() {
        let mut rod = x_rod(6);
        rod.compute_internal_forces_and_torques().unwrap();

        for f in rod.internal_forces() {
            assert_relative_eq!(*f, Vector3::zeros(), epsilon = 1e-9);
        }
        for t in rod.internal_torques() {
            assert_relative_eq!(*t, Vector3::zeros(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_failed_pipeline_leaves_rod_unchanged() {
        let mut rod = x_rod(3);
        let before = rod.strains().clone();
        let first = rod.state().positions[0];
        rod.state_mut().positions[1] = first;

        assert!(matches!(
            rod.compute_internal_forces_and_torques(),
            Err(RodError::DegenerateElement { index: 0, .. })
        ));
        assert_eq!(rod.strains(), &before);
    }

    #[test]
    fn test_reset_external_loads() {
        let mut rod = x_rod(2);
        rod.external_forces_mut()[1] = Vector3::x();
        rod.external_torques_mut()[0] = Vector3::y();
        assert_eq!(rod.total_forces()[1], Vector3::x());

        rod.reset_external_loads();
        assert!(rod.external_forces().iter().all(|f| *f == Vector3::zeros()));
        assert!(rod.external_torques().iter().all(|t| *t == Vector3::zeros()));
    }

    #[test]
    fn test_bounding_box() {
        let rod = x_rod(2);
        let (min, max) = rod.bounding_box();
        assert_eq!(min, Point3::origin());
        assert_eq!(max, Point3::new(2.0, 0.0, 0.0));
    }
}

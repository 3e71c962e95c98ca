//! Rigid body state types.
//!
//! This module provides types for representing rigid body state in 6 degrees
//! of freedom: position, orientation, linear velocity, and angular velocity,
//! plus the mass/inertia properties that turn velocities into momenta.

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, UnitQuaternion, Vector3, Vector6};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a rigid body in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create a new body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Position and orientation of a rigid body frame in world coordinates.
///
/// # Example
///
/// ```
/// use rbd_types::Pose;
/// use nalgebra::Point3;
///
/// let pose = Pose::from_position(Point3::new(1.0, 2.0, 3.0));
///
/// let local = Point3::new(1.0, 0.0, 0.0);
/// let world = pose.transform_point(&local);
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in world coordinates.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create an identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position only (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Create a pose from a position and a rotation matrix.
    ///
    /// The matrix is converted to a unit quaternion; both representations
    /// stay consistent from this point on.
    #[must_use]
    pub fn from_position_matrix(position: Point3<f64>, rotation: Matrix3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
                rotation,
            )),
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation)
    }

    /// The rotation as a 3x3 matrix.
    #[must_use]
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// Transform a point from local to world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Transform a vector from local to world coordinates (rotation only).
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Transform a point from world to local coordinates.
    #[must_use]
    pub fn inverse_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (world - self.position))
    }

    /// Transform a vector from world to local coordinates.
    #[must_use]
    pub fn inverse_transform_vector(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * world
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}

/// Linear and angular velocity of a rigid body, both about the COM and
/// expressed in world coordinates.
///
/// # Example
///
/// ```
/// use rbd_types::Twist;
/// use nalgebra::Vector3;
///
/// let twist = Twist::linear(Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(twist.linear.x, 1.0);
/// assert_eq!(twist.angular.norm(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Twist {
    /// Linear velocity of the COM in world coordinates (m/s).
    pub linear: Vector3<f64>,
    /// Angular velocity about the COM in world coordinates (rad/s).
    pub angular: Vector3<f64>,
}

impl Default for Twist {
    fn default() -> Self {
        Self::zero()
    }
}

impl Twist {
    /// Create a twist with specified linear and angular velocity.
    #[must_use]
    pub const fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self { linear, angular }
    }

    /// Create a zero twist (at rest).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            linear: Vector3::zeros(),
            angular: Vector3::zeros(),
        }
    }

    /// Create a twist with linear velocity only.
    #[must_use]
    pub fn linear(v: Vector3<f64>) -> Self {
        Self {
            linear: v,
            angular: Vector3::zeros(),
        }
    }

    /// Create a twist with angular velocity only.
    #[must_use]
    pub fn angular(omega: Vector3<f64>) -> Self {
        Self {
            linear: Vector3::zeros(),
            angular: omega,
        }
    }

    /// Build a twist from a 6-component generalized velocity [linear; angular].
    #[must_use]
    pub fn from_generalized(gen_vel: &Vector6<f64>) -> Self {
        Self {
            linear: Vector3::new(gen_vel[0], gen_vel[1], gen_vel[2]),
            angular: Vector3::new(gen_vel[3], gen_vel[4], gen_vel[5]),
        }
    }

    /// The 6-component generalized velocity [linear; angular].
    #[must_use]
    pub fn generalized(&self) -> Vector6<f64> {
        let mut v = Vector6::zeros();
        v.fixed_rows_mut::<3>(0).copy_from(&self.linear);
        v.fixed_rows_mut::<3>(3).copy_from(&self.angular);
        v
    }

    /// Compute the velocity at a point offset from the COM.
    ///
    /// `v_point` = `v_linear` + omega × r
    #[must_use]
    pub fn velocity_at_point(&self, offset: &Vector3<f64>) -> Vector3<f64> {
        self.linear + self.angular.cross(offset)
    }

    /// Compute kinetic energy given mass and world-frame inertia.
    #[must_use]
    pub fn kinetic_energy(&self, mass: f64, inertia_world: &Matrix3<f64>) -> f64 {
        let linear_ke = 0.5 * mass * self.linear.norm_squared();
        let angular_ke = 0.5 * self.angular.dot(&(inertia_world * self.angular));
        linear_ke + angular_ke
    }

    /// Compute linear momentum given mass.
    #[must_use]
    pub fn linear_momentum(&self, mass: f64) -> Vector3<f64> {
        self.linear * mass
    }

    /// Compute angular momentum given a world-frame inertia tensor.
    #[must_use]
    pub fn angular_momentum(&self, inertia_world: &Matrix3<f64>) -> Vector3<f64> {
        inertia_world * self.angular
    }

    /// Check if the twist contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.linear.iter().all(|x| x.is_finite()) && self.angular.iter().all(|x| x.is_finite())
    }
}

/// Mass, center of mass offset, and inertia tensor of a rigid body.
///
/// The COM offset and the inertia tensor are both expressed in the body
/// frame; the inertia is taken about the COM.
///
/// # Example
///
/// ```
/// use rbd_types::MassProperties;
///
/// let props = MassProperties::sphere(2.0, 0.5);
/// assert!(props.validate().is_ok());
/// assert_eq!(props.inverse_mass(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// Total mass in kg. Must be positive.
    pub mass: f64,
    /// COM offset from the body frame origin, in body coordinates.
    pub body2com: Vector3<f64>,
    /// Inertia tensor about the COM, in body coordinates (kg·m²).
    pub inertia: Matrix3<f64>,
}

impl MassProperties {
    /// Create mass properties with given values.
    ///
    /// Call [`validate`](Self::validate) (or construct a body from these,
    /// which does) to reject non-positive mass or a non-SPD inertia.
    #[must_use]
    pub const fn new(mass: f64, body2com: Vector3<f64>, inertia: Matrix3<f64>) -> Self {
        Self {
            mass,
            body2com,
            inertia,
        }
    }

    /// Mass properties for a uniform sphere.
    ///
    /// Inertia of a solid sphere: I = (2/5) * m * r²
    #[must_use]
    pub fn sphere(mass: f64, radius: f64) -> Self {
        let i = 0.4 * mass * radius * radius;
        Self {
            mass,
            body2com: Vector3::zeros(),
            inertia: Matrix3::from_diagonal(&Vector3::new(i, i, i)),
        }
    }

    /// Mass properties for a uniform box.
    ///
    /// Inertia of a solid box with dimensions (x, y, z):
    /// - Ixx = (1/12) * m * (y² + z²)
    /// - Iyy = (1/12) * m * (x² + z²)
    /// - Izz = (1/12) * m * (x² + y²)
    #[must_use]
    pub fn box_shape(mass: f64, half_extents: Vector3<f64>) -> Self {
        let x2 = 4.0 * half_extents.x * half_extents.x;
        let y2 = 4.0 * half_extents.y * half_extents.y;
        let z2 = 4.0 * half_extents.z * half_extents.z;

        let ixx = mass * (y2 + z2) / 12.0;
        let iyy = mass * (x2 + z2) / 12.0;
        let izz = mass * (x2 + y2) / 12.0;

        Self {
            mass,
            body2com: Vector3::zeros(),
            inertia: Matrix3::from_diagonal(&Vector3::new(ixx, iyy, izz)),
        }
    }

    /// Mass properties for a uniform cylinder aligned with Z.
    ///
    /// - Ixx = Iyy = (1/12) * m * (3r² + h²)
    /// - Izz = (1/2) * m * r²
    #[must_use]
    pub fn cylinder(mass: f64, radius: f64, half_height: f64) -> Self {
        let r2 = radius * radius;
        let h2 = 4.0 * half_height * half_height;

        let ixx = mass * (3.0 * r2 + h2) / 12.0;
        let izz = 0.5 * mass * r2;

        Self {
            mass,
            body2com: Vector3::zeros(),
            inertia: Matrix3::from_diagonal(&Vector3::new(ixx, ixx, izz)),
        }
    }

    /// Shift the COM offset, keeping mass and inertia.
    #[must_use]
    pub fn with_com_offset(mut self, body2com: Vector3<f64>) -> Self {
        self.body2com = body2com;
        self
    }

    /// Get the inverse mass.
    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        1.0 / self.mass
    }

    /// Get the inverse inertia tensor, if the inertia is invertible.
    #[must_use]
    pub fn inverse_inertia(&self) -> Option<Matrix3<f64>> {
        self.inertia.try_inverse()
    }

    /// Validate that the mass properties are physically realizable.
    ///
    /// Requires positive finite mass, a finite COM offset, and a symmetric
    /// positive-definite inertia tensor. Never clamps; invalid input is an
    /// error at construction, not a runtime repair.
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(crate::SimError::invalid_physical_property(format!(
                "mass must be positive and finite, got {}",
                self.mass
            )));
        }

        if !self.body2com.iter().all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_physical_property(
                "COM offset must be finite",
            ));
        }

        if !self.inertia.iter().all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_physical_property(
                "inertia tensor must be finite",
            ));
        }

        if (self.inertia - self.inertia.transpose()).abs().max() > 1e-9 {
            return Err(crate::SimError::invalid_physical_property(
                "inertia tensor must be symmetric",
            ));
        }

        // Positive-definite: all eigenvalues strictly positive
        let eigenvalues = self.inertia.symmetric_eigenvalues();
        if eigenvalues.iter().any(|&e| e <= 0.0) {
            return Err(crate::SimError::invalid_physical_property(
                "inertia tensor must be positive-definite",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_body_id() {
        let id = BodyId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.to_string(), "Body(7)");

        let id2: BodyId = 7.into();
        assert_eq!(id, id2);
    }

    #[test]
    fn test_pose_rotation() {
        // 90 degree rotation around Z
        let pose = Pose::from_position_rotation(
            Point3::origin(),
            UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2),
        );

        let local = Vector3::new(1.0, 0.0, 0.0);
        let world = pose.transform_vector(&local);

        assert_relative_eq!(world.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(world.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pose_from_matrix_round_trip() {
        let quat = UnitQuaternion::from_euler_angles(0.3, -0.7, 1.2);
        let mat = quat.to_rotation_matrix().into_inner();

        let pose = Pose::from_position_matrix(Point3::origin(), mat);
        assert_relative_eq!(pose.rotation_matrix(), mat, epsilon = 1e-10);
        assert_relative_eq!(pose.rotation.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pose_inverse_transform() {
        let pose = Pose::from_position_rotation(
            Point3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );

        let p = Point3::new(-0.5, 4.0, 2.0);
        let back = pose.inverse_transform_point(&pose.transform_point(&p));
        assert_relative_eq!(back.coords, p.coords, epsilon = 1e-10);
    }

    #[test]
    fn test_twist_generalized_round_trip() {
        let twist = Twist::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0));
        let gen_vel = twist.generalized();
        assert_relative_eq!(gen_vel[2], 3.0, epsilon = 1e-12);
        assert_relative_eq!(gen_vel[3], 4.0, epsilon = 1e-12);

        let back = Twist::from_generalized(&gen_vel);
        assert_eq!(back, twist);
    }

    #[test]
    fn test_twist_velocity_at_point() {
        // Spinning around Z axis
        let twist = Twist::angular(Vector3::new(0.0, 0.0, 1.0));
        let offset = Vector3::new(1.0, 0.0, 0.0);

        let v = twist.velocity_at_point(&offset);
        // omega × r = (0,0,1) × (1,0,0) = (0,1,0)
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_twist_kinetic_energy() {
        let twist = Twist::linear(Vector3::new(1.0, 0.0, 0.0));
        let ke = twist.kinetic_energy(2.0, &Matrix3::identity());
        assert_relative_eq!(ke, 1.0, epsilon = 1e-10);

        // KE is non-negative for arbitrary velocities
        let twist = Twist::new(Vector3::new(-3.0, 0.5, 2.0), Vector3::new(1.0, -4.0, 0.2));
        assert!(twist.kinetic_energy(1.5, &Matrix3::identity()) >= 0.0);
    }

    #[test]
    fn test_mass_properties_sphere() {
        let props = MassProperties::sphere(1.0, 1.0);
        let expected_i = 0.4; // (2/5) * 1 * 1²

        assert_relative_eq!(props.inertia[(0, 0)], expected_i, epsilon = 1e-10);
        assert_relative_eq!(props.inertia[(2, 2)], expected_i, epsilon = 1e-10);
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_mass_properties_box() {
        let props = MassProperties::box_shape(12.0, Vector3::new(0.5, 0.5, 0.5));
        // For a 1x1x1 box with mass 12: I = (1/12) * 12 * (1 + 1) = 2
        assert_relative_eq!(props.inertia[(0, 0)], 2.0, epsilon = 1e-10);
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_mass_properties_cylinder() {
        let props = MassProperties::cylinder(2.0, 0.5, 1.0);
        assert_relative_eq!(props.inertia[(2, 2)], 0.25, epsilon = 1e-10);
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_mass_inertia_reciprocity() {
        let props = MassProperties::box_shape(3.0, Vector3::new(0.2, 0.4, 0.6));
        assert_relative_eq!(props.inverse_mass() * props.mass, 1.0, epsilon = 1e-12);

        #[allow(clippy::unwrap_used)]
        let inv = props.inverse_inertia().unwrap();
        assert_relative_eq!(inv * props.inertia, Matrix3::identity(), epsilon = 1e-10);
    }

    #[test]
    fn test_validation_rejects_bad_mass() {
        let zero = MassProperties::new(0.0, Vector3::zeros(), Matrix3::identity());
        assert!(zero.validate().is_err());

        let negative = MassProperties::new(-1.0, Vector3::zeros(), Matrix3::identity());
        assert!(negative.validate().is_err());

        let infinite = MassProperties::new(f64::INFINITY, Vector3::zeros(), Matrix3::identity());
        assert!(infinite.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_inertia() {
        let negative_eig = MassProperties::new(
            1.0,
            Vector3::zeros(),
            Matrix3::from_diagonal(&Vector3::new(1.0, -0.5, 1.0)),
        );
        assert!(negative_eig.validate().is_err());

        let singular = MassProperties::new(
            1.0,
            Vector3::zeros(),
            Matrix3::from_diagonal(&Vector3::new(1.0, 0.0, 1.0)),
        );
        assert!(singular.validate().is_err());

        let mut asymmetric = Matrix3::identity();
        asymmetric[(0, 1)] = 0.3;
        let bad = MassProperties::new(1.0, Vector3::zeros(), asymmetric);
        assert!(bad.validate().is_err());
    }
}

//! Single rigid body state and frame management.
//!
//! Each body maintains three frames:
//!
//! 1. body frame - attached to the graphical/collision representation
//! 2. COM frame - centered at the center of mass, orientation always
//!    aligned with world axes
//! 3. collision frame - translated reference for the collision geometry,
//!    orientation coincides with the body frame
//!
//! Derived state (COM position, world-frame inertia, contact offsets) is
//! updated inside every pose mutation before it returns, so callers can
//! never observe a pose change without synchronized derived state.

use nalgebra::{Matrix3, Point3, UnitQuaternion, Vector3, Vector6};
use rbd_contact::{ContactPoint, CouplingArena, PerObjectContacts};
use rbd_types::{
    BodyId, BodyType, ExternalForce, Gravity, GyroscopicMode, MassProperties, Pose, Result, Twist,
};

/// Dynamical state of one free rigid body.
///
/// Owns pose, velocity, and mass/inertia in body and world frames, plus
/// the per-contact coupling records the external solver consumes. Stepped
/// through [`pre_contact_solver_update1`](Self::pre_contact_solver_update1),
/// [`pre_contact_solver_update2`](Self::pre_contact_solver_update2), the
/// solver interface, and [`integrate`](Self::integrate), in that order.
///
/// # Example
///
/// ```
/// use rbd_core::SingleBody;
/// use rbd_types::{BodyId, Gravity, MassProperties, Pose};
/// use nalgebra::Point3;
///
/// let mut body = SingleBody::new(
///     BodyId::new(0),
///     Pose::from_position(Point3::new(0.0, 0.0, 1.0)),
///     MassProperties::sphere(1.0, 0.1),
/// )?;
///
/// let dt = 0.01;
/// body.pre_contact_solver_update1(&Gravity::earth(), dt);
/// body.pre_contact_solver_update2(&Gravity::earth(), dt);
/// body.integrate(dt)?;
///
/// assert!(body.linear_velocity().z < 0.0);
/// # Ok::<(), rbd_types::SimError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SingleBody {
    pub(crate) id: BodyId,
    pub(crate) index_in_world: Option<usize>,
    pub(crate) name: Option<String>,
    pub(crate) body_type: BodyType,
    pub(crate) gyroscopic_mode: GyroscopicMode,

    // body frame
    pub(crate) body_position: Point3<f64>,
    pub(crate) body_rotation: UnitQuaternion<f64>,
    pub(crate) rotation_matrix: Matrix3<f64>,

    // COM frame
    pub(crate) com_position: Point3<f64>,
    pub(crate) body2com: Vector3<f64>,

    // collision frame
    pub(crate) col_position: Point3<f64>,
    pub(crate) col2com: Vector3<f64>,

    // velocity of the COM and angular velocity about the COM, world frame
    pub(crate) lin_vel: Vector3<f64>,
    pub(crate) old_lin_vel: Vector3<f64>,
    pub(crate) ang_vel: Vector3<f64>,

    // physical properties
    pub(crate) mass: f64,
    pub(crate) inv_mass: f64,
    pub(crate) inertia_b: Matrix3<f64>,
    pub(crate) inv_inertia_b: Matrix3<f64>,
    pub(crate) inertia_w: Matrix3<f64>,
    pub(crate) inv_inertia_w: Matrix3<f64>,

    // per-step bias impulses and unconstrained end-of-step velocity
    pub(crate) h_f: Vector3<f64>,
    pub(crate) h_tau: Vector3<f64>,
    pub(crate) taustar: Vector6<f64>,

    // external loads, cleared after integration
    pub(crate) ext_force: Vector3<f64>,
    pub(crate) ext_torque: Vector3<f64>,

    pub(crate) linear_damping: f64,
    pub(crate) angular_damping: Vector3<f64>,

    pub(crate) contacts: PerObjectContacts,
    pub(crate) couplings: CouplingArena,
}

impl SingleBody {
    /// Create a body at the given pose with the given mass properties.
    ///
    /// Fails with [`SimError::InvalidPhysicalProperty`] for non-positive
    /// mass or a non-positive-definite inertia tensor; invalid properties
    /// are never clamped.
    ///
    /// [`SimError::InvalidPhysicalProperty`]: rbd_types::SimError::InvalidPhysicalProperty
    pub fn new(id: BodyId, pose: Pose, props: MassProperties) -> Result<Self> {
        props.validate()?;

        let inv_inertia_b = props.inverse_inertia().ok_or_else(|| {
            rbd_types::SimError::invalid_physical_property("inertia tensor is not invertible")
        })?;

        let mut body = Self {
            id,
            index_in_world: None,
            name: None,
            body_type: BodyType::Dynamic,
            gyroscopic_mode: GyroscopicMode::default(),
            body_position: pose.position,
            body_rotation: pose.rotation,
            rotation_matrix: Matrix3::identity(),
            com_position: pose.position,
            body2com: props.body2com,
            col_position: pose.position,
            col2com: Vector3::zeros(),
            lin_vel: Vector3::zeros(),
            old_lin_vel: Vector3::zeros(),
            ang_vel: Vector3::zeros(),
            mass: props.mass,
            inv_mass: props.inverse_mass(),
            inertia_b: props.inertia,
            inv_inertia_b,
            inertia_w: props.inertia,
            inv_inertia_w: inv_inertia_b,
            h_f: Vector3::zeros(),
            h_tau: Vector3::zeros(),
            taustar: Vector6::zeros(),
            ext_force: Vector3::zeros(),
            ext_torque: Vector3::zeros(),
            linear_damping: 0.0,
            angular_damping: Vector3::zeros(),
            contacts: PerObjectContacts::new(),
            couplings: CouplingArena::new(),
        };
        body.update_derived_frames();
        Ok(body)
    }

    /// Set the collision-frame offset: vector from the collision reference
    /// point to the COM, in body coordinates.
    #[must_use]
    pub fn with_collision_offset(mut self, col2com: Vector3<f64>) -> Self {
        self.col2com = col2com;
        self.update_derived_frames();
        self
    }

    /// Body ID.
    #[must_use]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Slot index assigned by the owning world, if added to one.
    #[must_use]
    pub fn index_in_world(&self) -> Option<usize> {
        self.index_in_world
    }

    /// Record the slot index the owning world assigned to this body.
    pub fn set_index_in_world(&mut self, index: usize) {
        self.index_in_world = Some(index);
    }

    /// Optional body name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the body name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// How this body participates in dynamics.
    #[must_use]
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Set the body type. Static bodies are brought to rest.
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        if body_type == BodyType::Static {
            self.lin_vel = Vector3::zeros();
            self.ang_vel = Vector3::zeros();
        }
    }

    /// The gyroscopic treatment for this body.
    #[must_use]
    pub fn gyroscopic_mode(&self) -> GyroscopicMode {
        self.gyroscopic_mode
    }

    /// Set the gyroscopic treatment.
    pub fn set_gyroscopic_mode(&mut self, mode: GyroscopicMode) {
        self.gyroscopic_mode = mode;
    }

    /// Set the linear damping coefficient (per-step multiplicative decay).
    pub fn set_linear_damping(&mut self, damping: f64) {
        self.linear_damping = damping.max(0.0);
    }

    /// Set the per-axis angular damping coefficients.
    pub fn set_angular_damping(&mut self, damping: Vector3<f64>) {
        self.angular_damping = damping.map(|d| d.max(0.0));
    }

    // --- pose mutation -----------------------------------------------------
    //
    // Every mutation funnels through update_derived_frames before returning.

    /// Overwrite the body pose.
    pub fn set_pose(&mut self, pose: Pose) {
        self.body_position = pose.position;
        self.body_rotation = pose.rotation;
        self.update_derived_frames();
    }

    /// Overwrite the body-frame position, keeping orientation.
    pub fn set_position(&mut self, position: Point3<f64>) {
        self.body_position = position;
        self.update_derived_frames();
    }

    /// Overwrite the orientation from a unit quaternion.
    pub fn set_orientation(&mut self, rotation: UnitQuaternion<f64>) {
        self.body_rotation = rotation;
        self.update_derived_frames();
    }

    /// Overwrite the orientation from a rotation matrix.
    ///
    /// The quaternion and matrix representations are consistent before
    /// this returns.
    pub fn set_orientation_matrix(&mut self, rotation: Matrix3<f64>) {
        self.body_rotation = UnitQuaternion::from_rotation_matrix(
            &nalgebra::Rotation3::from_matrix_unchecked(rotation),
        );
        self.update_derived_frames();
    }

    /// Overwrite linear and angular velocity.
    pub fn set_velocity(&mut self, linear: Vector3<f64>, angular: Vector3<f64>) {
        self.lin_vel = linear;
        self.ang_vel = angular;
    }

    /// Re-derive everything that depends on the body pose.
    ///
    /// COM position, collision-frame position, world-frame inertia and its
    /// inverse, and the contact offsets of any active coupling records.
    pub(crate) fn update_derived_frames(&mut self) {
        self.rotation_matrix = self.body_rotation.to_rotation_matrix().into_inner();
        self.com_position = self.body_position + self.rotation_matrix * self.body2com;
        self.col_position = self.com_position - self.rotation_matrix * self.col2com;
        self.inertia_w = self.rotation_matrix * self.inertia_b * self.rotation_matrix.transpose();
        self.inv_inertia_w =
            self.rotation_matrix * self.inv_inertia_b * self.rotation_matrix.transpose();

        if self.couplings.len() == self.contacts.len() {
            let com = self.com_position;
            for (record, contact) in self.couplings.iter_mut().zip(self.contacts.iter()) {
                record.contact2com = com - contact.position;
            }
        }
    }

    // --- external loads ----------------------------------------------------

    /// Accumulate an external force at the COM for the next step.
    pub fn set_external_force(&mut self, force: Vector3<f64>) {
        self.ext_force += force;
    }

    /// Accumulate an external torque for the next step.
    pub fn set_external_torque(&mut self, torque: Vector3<f64>) {
        self.ext_torque += torque;
    }

    /// Accumulate a force/torque pair, resolving point-applied forces into
    /// a torque about the COM.
    pub fn apply_external(&mut self, load: &ExternalForce) {
        self.ext_force += load.force;
        self.ext_torque += load.torque_about(&self.com_position);
    }

    // --- contact registry --------------------------------------------------

    /// Register a contact on this body, returning its point ID.
    pub fn add_contact(&mut self, point: ContactPoint) -> usize {
        self.contacts.add_contact(point)
    }

    /// Drop all contacts and their coupling records.
    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
        self.couplings.reset(0);
    }

    /// The active contacts, in point-ID order.
    #[must_use]
    pub fn contacts(&self) -> &PerObjectContacts {
        &self.contacts
    }

    // --- queries -----------------------------------------------------------

    /// Body-frame pose in world coordinates.
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::from_position_rotation(self.body_position, self.body_rotation)
    }

    /// Body-frame position in world coordinates.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        self.body_position
    }

    /// Orientation quaternion.
    #[must_use]
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        self.body_rotation
    }

    /// Orientation as a rotation matrix.
    #[must_use]
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.rotation_matrix
    }

    /// COM position in world coordinates.
    #[must_use]
    pub fn com_position(&self) -> Point3<f64> {
        self.com_position
    }

    /// Collision-frame position in world coordinates.
    #[must_use]
    pub fn collision_position(&self) -> Point3<f64> {
        self.col_position
    }

    /// Linear velocity of the COM in world coordinates.
    #[must_use]
    pub fn linear_velocity(&self) -> Vector3<f64> {
        self.lin_vel
    }

    /// Angular velocity about the COM in world coordinates.
    #[must_use]
    pub fn angular_velocity(&self) -> Vector3<f64> {
        self.ang_vel
    }

    /// Current velocity as a twist.
    #[must_use]
    pub fn twist(&self) -> Twist {
        Twist::new(self.lin_vel, self.ang_vel)
    }

    /// The 6-component generalized velocity [linear; angular].
    #[must_use]
    pub fn gen_vel(&self) -> Vector6<f64> {
        self.twist().generalized()
    }

    /// Body mass.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Inverse mass.
    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        self.inv_mass
    }

    /// Inertia tensor about the COM in the body frame.
    #[must_use]
    pub fn inertia_body(&self) -> Matrix3<f64> {
        self.inertia_b
    }

    /// Inertia tensor about the COM in the world frame.
    #[must_use]
    pub fn inertia_world(&self) -> Matrix3<f64> {
        self.inertia_w
    }

    /// Inverse of the body-frame inertia tensor.
    #[must_use]
    pub fn inverse_inertia_body(&self) -> Matrix3<f64> {
        self.inv_inertia_b
    }

    /// Inverse of the world-frame inertia tensor.
    #[must_use]
    pub fn inverse_inertia_world(&self) -> Matrix3<f64> {
        self.inv_inertia_w
    }

    /// Kinetic energy (translational + rotational).
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        self.twist().kinetic_energy(self.mass, &self.inertia_w)
    }

    /// Potential energy against the given gravity.
    #[must_use]
    pub fn potential_energy(&self, gravity: &Gravity) -> f64 {
        -self.mass * gravity.acceleration.dot(&self.com_position.coords)
    }

    /// Total mechanical energy.
    #[must_use]
    pub fn total_energy(&self, gravity: &Gravity) -> f64 {
        self.kinetic_energy() + self.potential_energy(gravity)
    }

    /// Linear momentum.
    #[must_use]
    pub fn linear_momentum(&self) -> Vector3<f64> {
        self.lin_vel * self.mass
    }

    /// Angular momentum about the COM, in world coordinates.
    #[must_use]
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.inertia_w * self.ang_vel
    }

    // --- effective properties at contacts ----------------------------------

    /// Inverse mass as seen by contact impulses. Zero for non-dynamic
    /// bodies (infinite effective mass).
    pub(crate) fn effective_inv_mass(&self) -> f64 {
        if self.body_type.is_dynamic() {
            self.inv_mass
        } else {
            0.0
        }
    }

    /// World-frame inverse inertia as seen by contact impulses.
    pub(crate) fn effective_inv_inertia_w(&self) -> Matrix3<f64> {
        if self.body_type.is_dynamic() {
            self.inv_inertia_w
        } else {
            Matrix3::zeros()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_body() -> SingleBody {
        SingleBody::new(
            BodyId::new(0),
            Pose::identity(),
            MassProperties::sphere(2.0, 0.5),
        )
        .unwrap()
    }

    #[test]
    fn test_construction_rejects_invalid_properties() {
        let bad_mass = MassProperties::new(0.0, Vector3::zeros(), Matrix3::identity());
        assert!(SingleBody::new(BodyId::new(0), Pose::identity(), bad_mass).is_err());

        let bad_inertia = MassProperties::new(
            1.0,
            Vector3::zeros(),
            Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, 1.0)),
        );
        assert!(SingleBody::new(BodyId::new(0), Pose::identity(), bad_inertia).is_err());
    }

    #[test]
    fn test_mass_inertia_reciprocity() {
        let body = test_body();
        assert_relative_eq!(body.inverse_mass() * body.mass(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            body.inverse_inertia_body() * body.inertia_body(),
            Matrix3::identity(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_frame_consistency_after_pose_mutation() {
        let props = MassProperties::box_shape(1.0, Vector3::new(0.5, 0.5, 0.5))
            .with_com_offset(Vector3::new(0.1, -0.2, 0.3));
        let mut body = SingleBody::new(BodyId::new(1), Pose::identity(), props).unwrap();

        let rot = UnitQuaternion::from_euler_angles(0.4, -1.1, 2.2);
        body.set_position(Point3::new(1.0, 2.0, 3.0));
        body.set_orientation(rot);

        let r = body.rotation_matrix();
        let expected_com = body.position() + r * Vector3::new(0.1, -0.2, 0.3);
        assert_relative_eq!(
            body.com_position().coords,
            expected_com.coords,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            body.inertia_world(),
            r * body.inertia_body() * r.transpose(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            body.inverse_inertia_world() * body.inertia_world(),
            Matrix3::identity(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_orientation_matrix_round_trip() {
        let mut body = test_body();
        let quat = UnitQuaternion::from_euler_angles(0.2, 0.5, -0.9);
        let mat = quat.to_rotation_matrix().into_inner();

        body.set_orientation_matrix(mat);
        assert_relative_eq!(body.rotation_matrix(), mat, epsilon = 1e-10);
        assert_relative_eq!(body.quaternion().norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_collision_frame_offset() {
        let props = MassProperties::sphere(1.0, 0.5);
        let body = SingleBody::new(
            BodyId::new(0),
            Pose::from_position(Point3::new(0.0, 0.0, 1.0)),
            props,
        )
        .unwrap()
        .with_collision_offset(Vector3::new(0.0, 0.0, 0.1));

        // col position = com - R * col2com, R = E here
        assert_relative_eq!(body.collision_position().z, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_and_momentum() {
        let mut body = test_body();
        body.set_velocity(Vector3::new(3.0, 0.0, 0.0), Vector3::zeros());

        // KE = 0.5 * 2 * 9 = 9
        assert_relative_eq!(body.kinetic_energy(), 9.0, epsilon = 1e-12);
        assert_relative_eq!(body.linear_momentum().x, 6.0, epsilon = 1e-12);

        body.set_position(Point3::new(0.0, 0.0, 2.0));
        let pe = body.potential_energy(&Gravity::earth());
        assert_relative_eq!(pe, 2.0 * 9.81 * 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_static_body_comes_to_rest() {
        let mut body = test_body();
        body.set_velocity(Vector3::new(1.0, 1.0, 1.0), Vector3::new(0.5, 0.0, 0.0));
        body.set_body_type(BodyType::Static);

        assert_relative_eq!(body.linear_velocity().norm(), 0.0);
        assert_relative_eq!(body.angular_velocity().norm(), 0.0);
        assert_relative_eq!(body.effective_inv_mass(), 0.0);
    }

    #[test]
    fn test_world_bookkeeping() {
        let mut body = test_body();
        assert_eq!(body.index_in_world(), None);
        assert_eq!(body.name(), None);

        body.set_index_in_world(4);
        body.set_name("crate");

        assert_eq!(body.index_in_world(), Some(4));
        assert_eq!(body.name(), Some("crate"));
    }

    #[test]
    fn test_point_force_induces_torque() {
        let mut body = test_body();
        let load = ExternalForce::at_point(Vector3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0));
        body.apply_external(&load);

        assert_relative_eq!(body.ext_force.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(body.ext_torque.y, 1.0, epsilon = 1e-12);
    }
}

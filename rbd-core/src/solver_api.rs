//! The narrow interface handed to the external contact solver.
//!
//! The solver gets exactly the operations it needs to iterate toward a
//! complementarity solution, and nothing else: read the effective-mass
//! block, bias velocity, and impact velocity per contact; trial and undo
//! velocity contributions; and commit accepted impulses. No pose
//! mutation, no force accumulation, no frame access.

use nalgebra::{Matrix3, Vector3};
use rbd_types::Result;

use crate::body::SingleBody;

/// Contact solver view of one body for the duration of a solve.
///
/// Borrows the body mutably, so the step driver cannot touch the body
/// while the solver holds this.
///
/// # Example
///
/// ```
/// use rbd_core::SingleBody;
/// use rbd_contact::ContactPoint;
/// use rbd_types::{BodyId, Gravity, MassProperties, Pose};
/// use nalgebra::{Point3, Vector3};
///
/// let mut body = SingleBody::new(
///     BodyId::new(0),
///     Pose::identity(),
///     MassProperties::sphere(1.0, 0.5),
/// )?;
///
/// let dt = 0.01;
/// body.pre_contact_solver_update1(&Gravity::earth(), dt);
/// let id = body.add_contact(ContactPoint::new(
///     Point3::new(0.0, 0.0, -0.5),
///     Vector3::z(),
///     0.0,
///     BodyId::new(1),
/// ));
/// body.pre_contact_solver_update2(&Gravity::earth(), dt);
///
/// let mut solver = body.solver_access();
/// let block = solver.delassus(id)?;
/// let bias = solver.bias_velocity(id)?;
/// let impulse = block.try_inverse().map(|inv| -(inv * bias));
/// if let Some(impulse) = impulse {
///     solver.update_gen_vel_with_impulse(id, &impulse)?;
/// }
/// # Ok::<(), rbd_types::SimError>(())
/// ```
#[derive(Debug)]
pub struct ContactSolverAccess<'a> {
    body: &'a mut SingleBody,
}

impl SingleBody {
    /// Open the solver view of this body.
    pub fn solver_access(&mut self) -> ContactSolverAccess<'_> {
        ContactSolverAccess { body: self }
    }
}

impl ContactSolverAccess<'_> {
    /// Number of active contacts on the body.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.body.contacts().len()
    }

    /// Effective-mass (Delassus) block at a contact point.
    pub fn delassus(&self, point_id: usize) -> Result<Matrix3<f64>> {
        Ok(self.body.couplings.get(point_id)?.delassus)
    }

    /// Impulse-free contact-point velocity ("tau-star").
    pub fn bias_velocity(&self, point_id: usize) -> Result<Vector3<f64>> {
        Ok(self.body.couplings.get(point_id)?.bias_velocity)
    }

    /// Pre-solve relative velocity along the contact normal, for
    /// restitution handling.
    pub fn impact_velocity(&self, point_id: usize) -> Result<f64> {
        Ok(self.body.couplings.get(point_id)?.impact_velocity)
    }

    /// Current (possibly trial-adjusted) velocity at a contact point.
    pub fn contact_point_vel(&self, point_id: usize) -> Result<Vector3<f64>> {
        self.body.contact_point_vel(point_id)
    }

    /// Apply a trial velocity contribution at a contact point.
    pub fn add_contact_point_vel(&mut self, point_id: usize, vel: &Vector3<f64>) -> Result<()> {
        self.body.add_contact_point_vel(point_id, vel)
    }

    /// Undo a trial velocity contribution at a contact point.
    pub fn sub_contact_point_vel(&mut self, point_id: usize, vel: &Vector3<f64>) -> Result<()> {
        self.body.sub_contact_point_vel(point_id, vel)
    }

    /// Commit an impulse at a contact point into the generalized velocity.
    pub fn update_gen_vel_with_impulse(
        &mut self,
        point_id: usize,
        impulse: &Vector3<f64>,
    ) -> Result<()> {
        self.body.update_gen_vel_with_impulse(point_id, impulse)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use rbd_contact::ContactPoint;
    use rbd_types::{BodyId, Gravity, MassProperties, Pose};

    #[test]
    fn test_solver_view_round_trip() {
        let mut body = SingleBody::new(
            BodyId::new(0),
            Pose::identity(),
            MassProperties::sphere(1.0, 0.5),
        )
        .unwrap();
        let gravity = Gravity::earth();
        let dt = 0.01;

        body.pre_contact_solver_update1(&gravity, dt);
        let id = body.add_contact(ContactPoint::new(
            Point3::new(0.0, 0.0, -0.5),
            Vector3::z(),
            0.0,
            BodyId::new(1),
        ));
        body.pre_contact_solver_update2(&gravity, dt);

        let mut solver = body.solver_access();
        assert_eq!(solver.contact_count(), 1);

        // for a unit sphere, the normal row of the block is 1/m on the
        // diagonal
        let block = solver.delassus(id).unwrap();
        assert_relative_eq!(block[(2, 2)], 1.0, epsilon = 1e-10);

        let bias = solver.bias_velocity(id).unwrap();
        assert_relative_eq!(bias.z, -9.81 * dt, epsilon = 1e-10);

        // cancel the bias with one normal impulse
        let impulse = Vector3::new(0.0, 0.0, -bias.z);
        solver.update_gen_vel_with_impulse(id, &impulse).unwrap();
        assert_relative_eq!(
            solver.contact_point_vel(id).unwrap().z,
            0.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_solver_view_rejects_bad_ids() {
        let mut body = SingleBody::new(
            BodyId::new(0),
            Pose::identity(),
            MassProperties::sphere(1.0, 0.5),
        )
        .unwrap();

        let solver = body.solver_access();
        assert!(solver.delassus(0).is_err());
        assert!(solver.bias_velocity(0).is_err());
        assert!(solver.impact_velocity(0).is_err());
    }
}

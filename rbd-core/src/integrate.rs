//! Per-step dynamics: bias forces, contact coupling, and integration.
//!
//! One simulation step runs, in order:
//!
//! 1. [`SingleBody::pre_contact_solver_update1`] - fold gravity, external
//!    loads, damping, and the gyroscopic term into the tentative
//!    unconstrained velocity
//! 2. external geometry pass registers contacts
//! 3. [`SingleBody::pre_contact_solver_update2`] - build per-contact
//!    effective-mass blocks and bias velocities
//! 4. external solver drives impulses through [`ContactSolverAccess`]
//! 5. [`SingleBody::integrate`] - advance pose with the impulse-adjusted
//!    velocity and re-derive frames
//!
//! [`ContactSolverAccess`]: crate::ContactSolverAccess

use nalgebra::{Matrix3, Matrix3x6, Matrix6x3, UnitQuaternion, Vector3};
use rbd_types::{Gravity, Result, SimError, Twist};

use crate::body::SingleBody;
use crate::gyro::{self, skew};

/// Eigenvalue threshold below which an effective-mass block is reported
/// as degenerate.
const DEGENERATE_EPS: f64 = 1e-12;

impl SingleBody {
    /// First pre-solver pass: accumulate this step's bias impulses and
    /// commit the tentative unconstrained velocity.
    ///
    /// Runs before contact geometry is known; depends only on the body's
    /// own state. Gravity, accumulated external force/torque, damping
    /// decay, and the gyroscopic term all land in the velocity here, so
    /// the bias velocity the solver later reads is the true impulse-free
    /// end-of-step velocity. Non-dynamic bodies skip force application.
    pub fn pre_contact_solver_update1(&mut self, gravity: &Gravity, dt: f64) {
        self.old_lin_vel = self.lin_vel;

        if !self.body_type.is_dynamic() {
            self.h_f = Vector3::zeros();
            self.h_tau = Vector3::zeros();
            self.taustar = self.gen_vel();
            return;
        }

        // impulse-equivalent bias terms
        self.h_f = (gravity.force_on_mass(self.mass) + self.ext_force) * dt;
        self.h_tau = self.ext_torque * dt;

        // multiplicative damping decay, per-axis for the angular part
        self.lin_vel *= 1.0 - self.linear_damping * dt;
        self.ang_vel
            .component_mul_assign(&(Vector3::repeat(1.0) - self.angular_damping * dt));

        let gyro_delta = gyro::angular_velocity_delta(
            self.gyroscopic_mode,
            &self.inertia_b,
            &self.inertia_w,
            &self.inv_inertia_w,
            &self.body_rotation,
            &self.ang_vel,
            dt,
        );

        // tentative unconstrained end-of-step velocity
        self.lin_vel += self.h_f * self.inv_mass;
        self.ang_vel += self.inv_inertia_w * self.h_tau + gyro_delta;

        self.taustar = self.gen_vel();
    }

    /// Second pre-solver pass: build the coupling record for every active
    /// contact.
    ///
    /// For each contact point, with `r` the vector from the point to the
    /// COM:
    ///
    /// - Jacobian `J = [E | skew(r)]`, mapping generalized velocity to
    ///   contact-point velocity
    /// - `M⁻¹Jᵀ`, mapping a contact impulse to a generalized velocity
    ///   change
    /// - Delassus block `J·M⁻¹·Jᵀ`, symmetric positive semi-definite
    /// - bias velocity `J·taustar`
    /// - impact velocity: pre-force velocity at the point, along the
    ///   contact normal
    ///
    /// Degenerate blocks are surfaced to the solver untouched; nothing
    /// here recomputes inertia or pose.
    pub fn pre_contact_solver_update2(&mut self, _gravity: &Gravity, _dt: f64) {
        self.couplings.reset(self.contacts.len());

        let inv_mass = self.effective_inv_mass();
        let inv_inertia = self.effective_inv_inertia_w();
        let com = self.com_position;
        let old_lin_vel = self.old_lin_vel;
        let ang_vel = self.ang_vel;
        let taustar = self.taustar;
        let dynamic = self.body_type.is_dynamic();

        for (point_id, (record, contact)) in self
            .couplings
            .iter_mut()
            .zip(self.contacts.iter())
            .enumerate()
        {
            let r = com - contact.position;
            record.contact2com = r;
            let rx = skew(&r);

            // v_point = v + ω×(p - com) = [E | skew(r)] · genVel
            let mut jacobian = Matrix3x6::zeros();
            jacobian
                .fixed_view_mut::<3, 3>(0, 0)
                .copy_from(&Matrix3::identity());
            jacobian.fixed_view_mut::<3, 3>(0, 3).copy_from(&rx);
            record.jacobian = jacobian;

            let mut minv_jt = Matrix6x3::zeros();
            minv_jt
                .fixed_view_mut::<3, 3>(0, 0)
                .copy_from(&Matrix3::from_diagonal_element(inv_mass));
            minv_jt
                .fixed_view_mut::<3, 3>(3, 0)
                .copy_from(&(inv_inertia * rx.transpose()));
            record.minv_jt = minv_jt;

            record.delassus = jacobian * minv_jt;
            record.bias_velocity = jacobian * taustar;
            record.impact_velocity = contact
                .normal
                .dot(&(old_lin_vel - ang_vel.cross(&r)));

            if dynamic && record.is_degenerate(DEGENERATE_EPS) {
                tracing::debug!(point_id, "degenerate effective-mass block at contact");
            }
        }
    }

    /// Advance pose by one timestep and re-derive frames.
    ///
    /// Semi-implicit: the pose moves with the end-of-step velocity, which
    /// already includes every committed contact impulse. The orientation
    /// update goes through the quaternion exponential map and is
    /// re-normalized. External load accumulators are cleared for the next
    /// step.
    ///
    /// Bit-reproducible for identical inputs; fails with
    /// [`SimError::Diverged`] if the state leaves the finite range.
    pub fn integrate(&mut self, dt: f64) -> Result<()> {
        if self.body_type.moves() {
            self.com_position += self.lin_vel * dt;

            let increment = UnitQuaternion::from_scaled_axis(self.ang_vel * dt);
            self.body_rotation = increment * self.body_rotation;
            self.body_rotation.renormalize();

            // body frame follows the COM
            self.body_position = self.com_position - self.body_rotation * self.body2com;
        }

        self.ext_force = Vector3::zeros();
        self.ext_torque = Vector3::zeros();
        self.update_derived_frames();

        if !(self.pose().is_finite() && self.twist().is_finite()) {
            tracing::warn!(body = %self.id, "non-finite state after integration");
            return Err(SimError::diverged(format!(
                "non-finite state on {} after integration",
                self.id
            )));
        }

        Ok(())
    }

    // --- solver primitives --------------------------------------------------
    //
    // Exposed to the contact solver through ContactSolverAccess only.

    /// Apply a trial velocity contribution at one contact point. O(1).
    pub(crate) fn add_contact_point_vel(
        &mut self,
        point_id: usize,
        vel: &Vector3<f64>,
    ) -> Result<()> {
        self.couplings.get_mut(point_id)?.trial += vel;
        Ok(())
    }

    /// Undo a trial velocity contribution at one contact point. O(1).
    pub(crate) fn sub_contact_point_vel(
        &mut self,
        point_id: usize,
        vel: &Vector3<f64>,
    ) -> Result<()> {
        self.couplings.get_mut(point_id)?.trial -= vel;
        Ok(())
    }

    /// Current (possibly trial-adjusted) velocity at a contact point:
    /// `J·genVel + trial`.
    pub(crate) fn contact_point_vel(&self, point_id: usize) -> Result<Vector3<f64>> {
        let record = self.couplings.get(point_id)?;
        Ok(record.jacobian * self.gen_vel() + record.trial)
    }

    /// Commit an impulse at a contact point into the generalized velocity:
    /// `genVel += M⁻¹·Jᵀ·impulse`.
    ///
    /// The only path by which a contact impulse becomes a permanent
    /// velocity change. A no-op on non-dynamic bodies (after validating
    /// the point ID).
    pub(crate) fn update_gen_vel_with_impulse(
        &mut self,
        point_id: usize,
        impulse: &Vector3<f64>,
    ) -> Result<()> {
        let record = self.couplings.get(point_id)?;
        if !self.body_type.is_dynamic() {
            return Ok(());
        }

        let delta = Twist::from_generalized(&(record.minv_jt * impulse));
        self.lin_vel += delta.linear;
        self.ang_vel += delta.angular;
        Ok(())
    }
}

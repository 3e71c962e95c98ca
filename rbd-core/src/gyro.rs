//! Gyroscopic force models.
//!
//! For a freely rotating body, Euler's equation couples angular momentum
//! back into torque: `I·ω̇ = -ω × (I·ω)`. The term is numerically stiff at
//! high spin rates, so four treatments are offered per body:
//!
//! - implicit (body or world frame): one Newton step of backward Euler,
//!   stable for any `|ω|·dt`
//! - explicit: direct evaluation, cheap but can diverge
//! - none: term omitted
//!
//! Each returns the angular velocity delta to fold into the velocity
//! update, and each is exactly zero at `ω = 0`.

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use rbd_types::GyroscopicMode;

/// Cross-product (skew-symmetric) matrix of a vector.
pub(crate) fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Angular velocity change from the gyroscopic term over one step.
///
/// `omega` is the world-frame angular velocity; inertia tensors are about
/// the COM in their respective frames. The returned delta is in world
/// coordinates regardless of mode.
pub(crate) fn angular_velocity_delta(
    mode: GyroscopicMode,
    inertia_b: &Matrix3<f64>,
    inertia_w: &Matrix3<f64>,
    inv_inertia_w: &Matrix3<f64>,
    rotation: &UnitQuaternion<f64>,
    omega: &Vector3<f64>,
    dt: f64,
) -> Vector3<f64> {
    match mode {
        GyroscopicMode::None => Vector3::zeros(),
        GyroscopicMode::Explicit => -(inv_inertia_w * omega.cross(&(inertia_w * omega))) * dt,
        GyroscopicMode::ImplicitBody => {
            let omega_b = rotation.inverse() * omega;
            let delta_b = implicit_newton_step(inertia_b, &omega_b, dt);
            rotation * delta_b
        }
        GyroscopicMode::ImplicitWorld => implicit_newton_step(inertia_w, omega, dt),
    }
}

/// One Newton step of backward Euler on `f(ω') = I(ω' - ω) + dt·ω'×(I·ω')`.
///
/// The Jacobian at the current velocity is
/// `I + dt·(skew(ω)·I - skew(I·ω))`; a singular Jacobian (degenerate for
/// physical inertia, but possible at extreme `|ω|·dt`) yields a zero delta
/// and is left to the caller's velocity clamping.
fn implicit_newton_step(inertia: &Matrix3<f64>, omega: &Vector3<f64>, dt: f64) -> Vector3<f64> {
    let momentum = inertia * omega;
    let residual = omega.cross(&momentum) * dt;
    let jacobian = inertia + (skew(omega) * inertia - skew(&momentum)) * dt;

    match jacobian.try_inverse() {
        Some(inv) => -(inv * residual),
        None => {
            tracing::debug!(
                omega = %omega,
                "singular gyroscopic Jacobian, skipping gyroscopic update"
            );
            Vector3::zeros()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MODES: [GyroscopicMode; 4] = [
        GyroscopicMode::ImplicitBody,
        GyroscopicMode::ImplicitWorld,
        GyroscopicMode::Explicit,
        GyroscopicMode::None,
    ];

    fn box_inertia() -> Matrix3<f64> {
        Matrix3::from_diagonal(&Vector3::new(0.1, 0.2, 0.4))
    }

    #[test]
    fn test_zero_at_rest() {
        let inertia = box_inertia();
        let inv = inertia.try_inverse().unwrap();
        let rot = UnitQuaternion::from_euler_angles(0.3, 0.1, -0.5);

        for mode in MODES {
            let delta = angular_velocity_delta(
                mode,
                &inertia,
                &inertia,
                &inv,
                &rot,
                &Vector3::zeros(),
                0.001,
            );
            assert_relative_eq!(delta.norm(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_isotropic_inertia_has_no_gyroscopic_torque() {
        // For a sphere, I·ω is parallel to ω, so ω×(I·ω) = 0
        let inertia = Matrix3::from_diagonal_element(0.4);
        let inv = inertia.try_inverse().unwrap();
        let omega = Vector3::new(3.0, -1.0, 2.0);

        for mode in MODES {
            let delta = angular_velocity_delta(
                mode,
                &inertia,
                &inertia,
                &inv,
                &UnitQuaternion::identity(),
                &omega,
                0.01,
            );
            assert_relative_eq!(delta.norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_explicit_matches_formula() {
        let inertia = box_inertia();
        let inv = inertia.try_inverse().unwrap();
        let omega = Vector3::new(1.0, 2.0, 3.0);
        let dt = 0.01;

        let delta = angular_velocity_delta(
            GyroscopicMode::Explicit,
            &inertia,
            &inertia,
            &inv,
            &UnitQuaternion::identity(),
            &omega,
            dt,
        );

        let expected = -(inv * omega.cross(&(inertia * omega))) * dt;
        assert_relative_eq!(delta, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_implicit_modes_agree_at_identity_rotation() {
        // With R = E the body and world formulations solve the same system
        let inertia = box_inertia();
        let inv = inertia.try_inverse().unwrap();
        let omega = Vector3::new(0.5, 8.0, 0.3);

        let body = angular_velocity_delta(
            GyroscopicMode::ImplicitBody,
            &inertia,
            &inertia,
            &inv,
            &UnitQuaternion::identity(),
            &omega,
            0.002,
        );
        let world = angular_velocity_delta(
            GyroscopicMode::ImplicitWorld,
            &inertia,
            &inertia,
            &inv,
            &UnitQuaternion::identity(),
            &omega,
            0.002,
        );

        assert_relative_eq!(body, world, epsilon = 1e-10);
    }

    #[test]
    fn test_implicit_stable_at_high_spin() {
        // |ω|·dt large enough to blow up the explicit model within a step
        let inertia = box_inertia();
        let inv = inertia.try_inverse().unwrap();
        let omega = Vector3::new(0.1, 300.0, 0.1);
        let dt = 0.01;

        let delta = angular_velocity_delta(
            GyroscopicMode::ImplicitBody,
            &inertia,
            &inertia,
            &inv,
            &UnitQuaternion::identity(),
            &omega,
            dt,
        );

        assert!(delta.iter().all(|x| x.is_finite()));
        assert!(delta.norm() < omega.norm());
    }

    #[test]
    fn test_skew_matches_cross_product() {
        let a = Vector3::new(1.0, -2.0, 0.5);
        let b = Vector3::new(0.3, 4.0, -1.0);
        assert_relative_eq!(skew(&a) * b, a.cross(&b), epsilon = 1e-14);
    }
}

//! Single rigid body dynamics core.
//!
//! This crate models the dynamical state of a free rigid body inside a
//! constrained simulator, and the interface through which an external
//! contact solver couples per-contact impulses back into that state:
//!
//! - [`SingleBody`] - pose, velocity, and inertia in three frames (body,
//!   COM, collision), with atomic pose mutation
//! - gyroscopic force models, four numerical treatments selectable per
//!   body via [`GyroscopicMode`](rbd_types::GyroscopicMode)
//! - per-contact effective-mass (Delassus) blocks and bias velocities
//! - [`ContactSolverAccess`] - the narrow solver-facing interface
//! - [`Body`] - the closed variant type over body kinds
//!
//! # Step sequence
//!
//! ```
//! use rbd_core::SingleBody;
//! use rbd_types::{BodyId, Gravity, MassProperties, Pose};
//! use nalgebra::Point3;
//!
//! let mut body = SingleBody::new(
//!     BodyId::new(0),
//!     Pose::from_position(Point3::new(0.0, 0.0, 1.0)),
//!     MassProperties::sphere(1.0, 0.1),
//! )?;
//!
//! let gravity = Gravity::earth();
//! let dt = 1.0 / 240.0;
//!
//! for _ in 0..240 {
//!     body.pre_contact_solver_update1(&gravity, dt);
//!     // (collision layer registers contacts here)
//!     body.pre_contact_solver_update2(&gravity, dt);
//!     // (contact solver drives impulses through body.solver_access())
//!     body.integrate(dt)?;
//!     body.clear_contacts();
//! }
//!
//! // one second of free fall
//! assert!(body.linear_velocity().z < -9.7);
//! # Ok::<(), rbd_types::SimError>(())
//! ```
//!
//! # Effective mass
//!
//! For a contact at point `p` with `r = com - p`, the contact Jacobian is
//! `J = [E | skew(r)]` and the Delassus block is
//!
//! ```text
//! D = J·M⁻¹·Jᵀ = (1/m)·E + skew(r)·I_w⁻¹·skew(r)ᵀ
//! ```
//!
//! symmetric positive semi-definite by construction. Degenerate blocks
//! (non-dynamic body, rank-deficient Jacobian) are handed to the solver
//! as-is; regularization policy belongs to the solver.

#![doc(html_root_url = "https://docs.rs/rbd-core/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod gyro;
mod integrate;
mod object;
mod solver_api;

pub use body::SingleBody;
pub use object::Body;
pub use solver_api::ContactSolverAccess;

//! Core types for single rigid body dynamics.
//!
//! This crate provides the foundational types for a constrained rigid body
//! simulator:
//!
//! - [`Pose`], [`Twist`], [`MassProperties`] - body state and physical
//!   properties
//! - [`ExternalForce`], [`Gravity`] - applied loads
//! - [`GyroscopicMode`], [`BodyType`], [`SimulationConfig`] - per-body and
//!   per-step configuration
//! - [`SimError`] - the error taxonomy shared by the dynamics crates
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no stepping behavior and no
//! contact logic. They're the common language between the dynamics core,
//! the collision layer, and the external contact solver.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: forward
//! - Z: up
//! - Right-handed
//!
//! # Example
//!
//! ```
//! use rbd_types::{MassProperties, Pose, Twist};
//! use nalgebra::Point3;
//!
//! let props = MassProperties::sphere(1.0, 0.2);
//! assert!(props.validate().is_ok());
//!
//! let pose = Pose::from_position(Point3::new(0.0, 0.0, 1.0));
//! let twist = Twist::zero();
//! assert!(pose.is_finite() && twist.is_finite());
//! ```

#![doc(html_root_url = "https://docs.rs/rbd-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
// Allow certain clippy lints that are overly pedantic for type definitions
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod config;
mod dynamics;
mod error;

pub use body::{BodyId, MassProperties, Pose, Twist};
pub use config::{BodyType, GyroscopicMode, SimulationConfig};
pub use dynamics::{ExternalForce, Gravity};
pub use error::SimError;

// Re-export math types for convenience
pub use nalgebra::{Matrix3, Point3, UnitQuaternion, Vector3, Vector6};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

//! Contact bookkeeping for rigid body dynamics.
//!
//! This crate holds the state shared between the collision layer, the
//! dynamics core, and the external contact solver:
//!
//! - [`ContactPoint`] and [`PerObjectContacts`] - the ordered per-body
//!   contact registry, indexed by point ID
//! - [`CouplingRecord`] and [`CouplingArena`] - per-contact effective-mass
//!   blocks and bias velocities, recomputed every step
//!
//! The dynamics core fills the coupling arena during its pre-solver
//! updates; the solver then reads the blocks and drives impulses through
//! the core's solver interface. Neither side recomputes the other's data.
//!
//! # Example
//!
//! ```
//! use rbd_contact::{ContactPoint, PerObjectContacts};
//! use rbd_types::BodyId;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut contacts = PerObjectContacts::new();
//! let id = contacts.add_contact(ContactPoint::new(
//!     Point3::new(0.0, 0.0, -0.5),
//!     Vector3::z(),
//!     0.001,
//!     BodyId::new(2),
//! ));
//! assert_eq!(contacts.get(id).map(|c| c.penetration), Ok(0.001));
//! ```

#![doc(html_root_url = "https://docs.rs/rbd-contact/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod contact;
mod coupling;

pub use contact::{ContactPoint, PerObjectContacts};
pub use coupling::{CouplingArena, CouplingRecord};

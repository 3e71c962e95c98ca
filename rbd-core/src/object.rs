//! The closed set of body kinds the world and solver operate on.
//!
//! Instead of a virtual base with required overrides, body kinds form a
//! tagged variant type with explicit dispatch. The hot per-contact path
//! never goes through a vtable, and the compiler checks every kind is
//! handled when one is added.

use nalgebra::{Matrix3, Point3, UnitQuaternion, Vector3};
use rbd_contact::{ContactPoint, PerObjectContacts};
use rbd_types::{BodyId, BodyType, Gravity, Result, Twist};

use crate::body::SingleBody;
use crate::solver_api::ContactSolverAccess;

/// A simulated body of any kind.
///
/// Currently single rigid bodies only; compound and articulated bodies
/// are future variants. Dispatch is an explicit match per operation.
#[derive(Debug, Clone)]
pub enum Body {
    /// One free rigid body.
    Single(SingleBody),
}

impl Body {
    /// Body ID.
    #[must_use]
    pub fn id(&self) -> BodyId {
        match self {
            Self::Single(b) => b.id(),
        }
    }

    /// Slot index assigned by the owning world, if added to one.
    #[must_use]
    pub fn index_in_world(&self) -> Option<usize> {
        match self {
            Self::Single(b) => b.index_in_world(),
        }
    }

    /// Record the slot index the owning world assigned to this body.
    pub fn set_index_in_world(&mut self, index: usize) {
        match self {
            Self::Single(b) => b.set_index_in_world(index),
        }
    }

    /// How this body participates in dynamics.
    #[must_use]
    pub fn body_type(&self) -> BodyType {
        match self {
            Self::Single(b) => b.body_type(),
        }
    }

    /// Total mass.
    #[must_use]
    pub fn mass(&self) -> f64 {
        match self {
            Self::Single(b) => b.mass(),
        }
    }

    /// Body-frame position in world coordinates.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        match self {
            Self::Single(b) => b.position(),
        }
    }

    /// Orientation as a rotation matrix.
    #[must_use]
    pub fn orientation(&self) -> Matrix3<f64> {
        match self {
            Self::Single(b) => b.rotation_matrix(),
        }
    }

    /// Orientation quaternion.
    #[must_use]
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        match self {
            Self::Single(b) => b.quaternion(),
        }
    }

    /// Current velocity.
    #[must_use]
    pub fn twist(&self) -> Twist {
        match self {
            Self::Single(b) => b.twist(),
        }
    }

    /// Accumulate an external force at the COM for the next step.
    pub fn set_external_force(&mut self, force: Vector3<f64>) {
        match self {
            Self::Single(b) => b.set_external_force(force),
        }
    }

    /// Accumulate an external torque for the next step.
    pub fn set_external_torque(&mut self, torque: Vector3<f64>) {
        match self {
            Self::Single(b) => b.set_external_torque(torque),
        }
    }

    /// Register a contact, returning its point ID.
    pub fn add_contact(&mut self, point: ContactPoint) -> usize {
        match self {
            Self::Single(b) => b.add_contact(point),
        }
    }

    /// Drop all contacts and their coupling records.
    pub fn clear_contacts(&mut self) {
        match self {
            Self::Single(b) => b.clear_contacts(),
        }
    }

    /// The active contacts, in point-ID order.
    #[must_use]
    pub fn contacts(&self) -> &PerObjectContacts {
        match self {
            Self::Single(b) => b.contacts(),
        }
    }

    /// First pre-solver pass. See
    /// [`SingleBody::pre_contact_solver_update1`].
    pub fn pre_contact_solver_update1(&mut self, gravity: &Gravity, dt: f64) {
        match self {
            Self::Single(b) => b.pre_contact_solver_update1(gravity, dt),
        }
    }

    /// Second pre-solver pass. See
    /// [`SingleBody::pre_contact_solver_update2`].
    pub fn pre_contact_solver_update2(&mut self, gravity: &Gravity, dt: f64) {
        match self {
            Self::Single(b) => b.pre_contact_solver_update2(gravity, dt),
        }
    }

    /// Advance pose by one timestep. See [`SingleBody::integrate`].
    pub fn integrate(&mut self, dt: f64) -> Result<()> {
        match self {
            Self::Single(b) => b.integrate(dt),
        }
    }

    /// Open the solver view of this body.
    pub fn solver_access(&mut self) -> ContactSolverAccess<'_> {
        match self {
            Self::Single(b) => b.solver_access(),
        }
    }

    /// Borrow as a single rigid body, if it is one.
    #[must_use]
    pub fn as_single(&self) -> Option<&SingleBody> {
        match self {
            Self::Single(b) => Some(b),
        }
    }

    /// Mutably borrow as a single rigid body, if it is one.
    pub fn as_single_mut(&mut self) -> Option<&mut SingleBody> {
        match self {
            Self::Single(b) => Some(b),
        }
    }
}

impl From<SingleBody> for Body {
    fn from(body: SingleBody) -> Self {
        Self::Single(body)
    }
}

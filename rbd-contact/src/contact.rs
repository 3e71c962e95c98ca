//! Contact points and the per-object contact registry.

use nalgebra::{Point3, Vector3};
use rbd_types::{BodyId, Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single contact point reported by the collision layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPoint {
    /// Contact position in world coordinates.
    pub position: Point3<f64>,
    /// Contact normal in world coordinates, unit length, pointing toward
    /// this body.
    pub normal: Vector3<f64>,
    /// Penetration depth along the normal (m). Non-negative when touching.
    pub penetration: f64,
    /// The other body in the pair.
    pub other: BodyId,
}

impl ContactPoint {
    /// Create a contact point.
    #[must_use]
    pub const fn new(
        position: Point3<f64>,
        normal: Vector3<f64>,
        penetration: f64,
        other: BodyId,
    ) -> Self {
        Self {
            position,
            normal,
            penetration,
            other,
        }
    }

    /// Check that position, normal and penetration are finite and the
    /// normal is unit length.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.normal.iter().all(|x| x.is_finite())
            && self.penetration.is_finite()
            && (self.normal.norm() - 1.0).abs() < 1e-6
    }
}

/// Ordered list of active contacts on one body.
///
/// Point IDs are indices into this list; the ordering is shared between
/// the collision layer, the dynamics core, and the contact solver, so
/// insertion order is preserved and IDs stay stable within a step.
///
/// # Example
///
/// ```
/// use rbd_contact::{ContactPoint, PerObjectContacts};
/// use rbd_types::BodyId;
/// use nalgebra::{Point3, Vector3};
///
/// let mut contacts = PerObjectContacts::new();
/// let id = contacts.add_contact(ContactPoint::new(
///     Point3::origin(),
///     Vector3::z(),
///     0.0,
///     BodyId::new(1),
/// ));
/// assert_eq!(id, 0);
/// assert_eq!(contacts.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerObjectContacts {
    points: Vec<ContactPoint>,
}

impl PerObjectContacts {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Register a contact, returning its point ID.
    pub fn add_contact(&mut self, point: ContactPoint) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Look up a contact by point ID.
    pub fn get(&self, point_id: usize) -> Result<&ContactPoint> {
        self.points
            .get(point_id)
            .ok_or_else(|| SimError::invalid_contact_point(point_id, self.points.len()))
    }

    /// Remove all contacts. Keeps allocation for the next step.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of active contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no active contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over contacts in point-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &ContactPoint> {
        self.points.iter()
    }
}

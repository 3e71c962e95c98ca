//! Per-contact impulse coupling records.
//!
//! For every active contact the dynamics core caches the linearized
//! mapping between an impulse applied at that point and the resulting
//! change in contact-point velocity. The solver consumes these blocks;
//! nothing here triggers recomputation of pose or inertia.

use nalgebra::{Matrix3, Matrix3x6, Matrix6x3, Vector3};
use rbd_types::{Result, SimError};

/// Cached coupling state for one contact point, valid for one step.
///
/// All quantities are in world coordinates:
///
/// - `contact2com`: vector from the contact point to the COM
/// - `jacobian`: 3x6 map from generalized velocity to contact-point velocity
/// - `minv_jt`: 6x3 map from a contact impulse to a generalized velocity
///   change (`M⁻¹·Jᵀ`)
/// - `delassus`: 3x3 effective-mass block `J·M⁻¹·Jᵀ`, symmetric PSD
/// - `bias_velocity`: contact-point velocity absent any contact impulse
/// - `impact_velocity`: pre-solve velocity along the contact normal
/// - `trial`: accumulated un-committed trial velocity at this point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingRecord {
    /// Vector from the contact point to the COM.
    pub contact2com: Vector3<f64>,
    /// Contact Jacobian (generalized velocity to point velocity).
    pub jacobian: Matrix3x6<f64>,
    /// Impulse to generalized-velocity-change map.
    pub minv_jt: Matrix6x3<f64>,
    /// Effective-mass (Delassus) block.
    pub delassus: Matrix3<f64>,
    /// Impulse-free contact-point velocity ("tau-star").
    pub bias_velocity: Vector3<f64>,
    /// Pre-solve relative velocity along the contact normal.
    pub impact_velocity: f64,
    /// Trial velocity contribution, not committed to the body.
    pub trial: Vector3<f64>,
}

impl Default for CouplingRecord {
    fn default() -> Self {
        Self {
            contact2com: Vector3::zeros(),
            jacobian: Matrix3x6::zeros(),
            minv_jt: Matrix6x3::zeros(),
            delassus: Matrix3::zeros(),
            bias_velocity: Vector3::zeros(),
            impact_velocity: 0.0,
            trial: Vector3::zeros(),
        }
    }
}

impl CouplingRecord {
    /// Whether the effective-mass block is near-singular.
    ///
    /// A degenerate block (zero inverse mass, rank-deficient Jacobian) is
    /// reported as-is; any regularization is the solver's decision.
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.delassus
            .symmetric_eigenvalues()
            .iter()
            .any(|&e| e < epsilon)
    }
}

/// Arena of coupling records, indexed by contact point ID.
///
/// Resized only when the active-contact count changes; records are
/// overwritten in place each step and never aliased across steps.
#[derive(Debug, Clone, Default)]
pub struct CouplingArena {
    records: Vec<CouplingRecord>,
}

impl CouplingArena {
    /// Create an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Resize to hold `count` records, resetting every slot.
    pub fn reset(&mut self, count: usize) {
        self.records.clear();
        self.records.resize(count, CouplingRecord::default());
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the arena holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by point ID.
    pub fn get(&self, point_id: usize) -> Result<&CouplingRecord> {
        self.records
            .get(point_id)
            .ok_or_else(|| SimError::invalid_contact_point(point_id, self.records.len()))
    }

    /// Look up a record mutably by point ID.
    pub fn get_mut(&mut self, point_id: usize) -> Result<&mut CouplingRecord> {
        let len = self.records.len();
        self.records
            .get_mut(point_id)
            .ok_or_else(|| SimError::invalid_contact_point(point_id, len))
    }

    /// Iterate over records in point-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &CouplingRecord> {
        self.records.iter()
    }

    /// Iterate mutably over records in point-ID order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CouplingRecord> {
        self.records.iter_mut()
    }
}

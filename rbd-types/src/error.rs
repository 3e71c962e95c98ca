//! Error types for dynamics operations.

use thiserror::Error;

/// Errors that can occur while constructing or stepping a rigid body.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Invalid timestep.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Physically invalid mass or inertia supplied at construction.
    #[error("invalid physical property: {reason}")]
    InvalidPhysicalProperty {
        /// Description of what's wrong.
        reason: String,
    },

    /// A contact point ID with no corresponding active contact.
    #[error("invalid contact point {point_id}: only {active} active contact(s)")]
    InvalidContactPoint {
        /// The offending point ID.
        point_id: usize,
        /// Number of active contacts on the body.
        active: usize,
    },

    /// Simulation diverged (`NaN` or `Inf` detected).
    #[error("simulation diverged: {reason}")]
    Diverged {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}

impl SimError {
    /// Create an invalid physical property error.
    #[must_use]
    pub fn invalid_physical_property(reason: impl Into<String>) -> Self {
        Self::InvalidPhysicalProperty {
            reason: reason.into(),
        }
    }

    /// Create an invalid contact point error.
    #[must_use]
    pub fn invalid_contact_point(point_id: usize, active: usize) -> Self {
        Self::InvalidContactPoint { point_id, active }
    }

    /// Create a diverged error.
    #[must_use]
    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::Diverged {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }

    /// Check if this is a caller contract violation (bad contact point ID).
    #[must_use]
    pub fn is_contact_point_error(&self) -> bool {
        matches!(self, Self::InvalidContactPoint { .. })
    }
}

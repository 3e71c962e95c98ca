//! Configuration for stepping a rigid body.

use crate::dynamics::Gravity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numerical treatment of the gyroscopic torque `ω × (I·ω)`.
///
/// Selectable per body. Implicit modes take a 3x3 solve per step but stay
/// stable at large angular velocity; the explicit mode is cheap but can
/// diverge when `|ω|·dt` grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GyroscopicMode {
    /// One backward-Euler Newton step, solved in the body frame.
    #[default]
    ImplicitBody,
    /// The same implicit treatment formulated in world coordinates.
    ImplicitWorld,
    /// Direct evaluation at the current angular velocity.
    Explicit,
    /// Omit the gyroscopic term entirely.
    None,
}

impl GyroscopicMode {
    /// Whether this mode requires a linear solve each step.
    #[must_use]
    pub const fn is_implicit(self) -> bool {
        matches!(self, Self::ImplicitBody | Self::ImplicitWorld)
    }
}

impl std::fmt::Display for GyroscopicMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImplicitBody => write!(f, "implicit (body frame)"),
            Self::ImplicitWorld => write!(f, "implicit (world frame)"),
            Self::Explicit => write!(f, "explicit"),
            Self::None => write!(f, "none"),
        }
    }
}

/// How a body participates in dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyType {
    /// Fully simulated: responds to forces and impulses.
    #[default]
    Dynamic,
    /// Never moves; infinite effective mass at contacts.
    Static,
    /// Moves with a prescribed velocity; unaffected by forces and impulses.
    Kinematic,
}

impl BodyType {
    /// Whether forces and impulses change this body's velocity.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic)
    }

    /// Whether the body's pose advances during integration.
    #[must_use]
    pub const fn moves(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// Top-level step configuration.
///
/// # Example
///
/// ```
/// use rbd_types::SimulationConfig;
///
/// let config = SimulationConfig::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Fixed timestep for physics integration (seconds).
    pub timestep: f64,
    /// Gravity configuration.
    pub gravity: Gravity,
    /// Default gyroscopic treatment for new bodies.
    pub gyroscopic_mode: GyroscopicMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 240.0,
            gravity: Gravity::earth(),
            gyroscopic_mode: GyroscopicMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a config with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// Real-time friendly configuration (60 Hz).
    #[must_use]
    pub fn realtime() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            ..Default::default()
        }
    }

    /// High-fidelity configuration (1000 Hz).
    #[must_use]
    pub fn high_fidelity() -> Self {
        Self {
            timestep: 1.0 / 1000.0,
            ..Default::default()
        }
    }

    /// Set the gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Gravity::zero();
        self
    }

    /// Set the default gyroscopic treatment.
    #[must_use]
    pub fn gyroscopic(mut self, mode: GyroscopicMode) -> Self {
        self.gyroscopic_mode = mode;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(crate::SimError::InvalidTimestep(self.timestep));
        }

        if self.timestep > 1.0 {
            return Err(crate::SimError::invalid_config(
                "timestep > 1 second is likely an error",
            ));
        }

        if !self.gravity.acceleration.iter().all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_config("gravity must be finite"));
        }

        Ok(())
    }

    /// Get the step frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.timestep, 1.0 / 240.0, epsilon = 1e-10);
        assert_eq!(config.gyroscopic_mode, GyroscopicMode::ImplicitBody);
    }

    #[test]
    fn test_config_presets() {
        let realtime = SimulationConfig::realtime();
        assert_relative_eq!(realtime.timestep, 1.0 / 60.0, epsilon = 1e-10);

        let hifi = SimulationConfig::high_fidelity();
        assert_relative_eq!(hifi.timestep, 1.0 / 1000.0, epsilon = 1e-10);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimulationConfig::default();
        assert!(config.validate().is_ok());

        config.timestep = -0.01;
        assert!(config.validate().is_err());

        config.timestep = 0.0;
        assert!(config.validate().is_err());

        config.timestep = f64::NAN;
        assert!(config.validate().is_err());

        config.timestep = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gyroscopic_mode() {
        assert!(GyroscopicMode::ImplicitBody.is_implicit());
        assert!(GyroscopicMode::ImplicitWorld.is_implicit());
        assert!(!GyroscopicMode::Explicit.is_implicit());
        assert!(!GyroscopicMode::None.is_implicit());
    }

    #[test]
    fn test_body_type() {
        assert!(BodyType::Dynamic.is_dynamic());
        assert!(BodyType::Dynamic.moves());
        assert!(!BodyType::Static.moves());
        assert!(BodyType::Kinematic.moves());
        assert!(!BodyType::Kinematic.is_dynamic());
    }
}

//! Forces and gravity applied to bodies.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An external force and torque to apply to a body for one step.
///
/// Forces applied at a point produce an additional torque about the COM
/// when the body resolves them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExternalForce {
    /// Force in world coordinates (N).
    pub force: Vector3<f64>,
    /// Torque in world coordinates (N·m).
    pub torque: Vector3<f64>,
    /// Application point in world coordinates. `None` applies at the COM.
    pub point: Option<Point3<f64>>,
}

impl ExternalForce {
    /// A force applied at the COM (no induced torque).
    #[must_use]
    pub const fn at_com(force: Vector3<f64>) -> Self {
        Self {
            force,
            torque: Vector3::new(0.0, 0.0, 0.0),
            point: None,
        }
    }

    /// A pure torque.
    #[must_use]
    pub const fn torque_only(torque: Vector3<f64>) -> Self {
        Self {
            force: Vector3::new(0.0, 0.0, 0.0),
            torque,
            point: None,
        }
    }

    /// A force applied at a world-space point.
    #[must_use]
    pub const fn at_point(force: Vector3<f64>, point: Point3<f64>) -> Self {
        Self {
            force,
            torque: Vector3::new(0.0, 0.0, 0.0),
            point: Some(point),
        }
    }

    /// The torque about the given COM position, including the lever-arm
    /// contribution of a point-applied force.
    #[must_use]
    pub fn torque_about(&self, com: &Point3<f64>) -> Vector3<f64> {
        match self.point {
            Some(p) => self.torque + (p - com).cross(&self.force),
            None => self.torque,
        }
    }
}

/// Gravity configuration.
///
/// # Example
///
/// ```
/// use rbd_types::Gravity;
///
/// let g = Gravity::earth();
/// assert_eq!(g.acceleration.z, -9.81);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gravity {
    /// Gravitational acceleration in world coordinates (m/s²).
    pub acceleration: Vector3<f64>,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::earth()
    }
}

impl Gravity {
    /// Standard Earth gravity (-9.81 m/s² along Z).
    #[must_use]
    pub const fn earth() -> Self {
        Self {
            acceleration: Vector3::new(0.0, 0.0, -9.81),
        }
    }

    /// Lunar gravity (-1.62 m/s² along Z).
    #[must_use]
    pub const fn moon() -> Self {
        Self {
            acceleration: Vector3::new(0.0, 0.0, -1.62),
        }
    }

    /// Martian gravity (-3.71 m/s² along Z).
    #[must_use]
    pub const fn mars() -> Self {
        Self {
            acceleration: Vector3::new(0.0, 0.0, -3.71),
        }
    }

    /// No gravity.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            acceleration: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// Custom gravity vector.
    #[must_use]
    pub const fn custom(acceleration: Vector3<f64>) -> Self {
        Self { acceleration }
    }

    /// The gravitational force on a given mass.
    #[must_use]
    pub fn force_on_mass(&self, mass: f64) -> Vector3<f64> {
        self.acceleration * mass
    }
}

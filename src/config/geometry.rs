//! Revolution geometry derived from motor configuration.

use crate::error::ConfigError;

use super::units::{Degrees, Microsteps, Steps};

/// Step resolution of one output revolution.
///
/// Computed once at initialization and used for all motion planning. The only way
/// to obtain one is through a validating constructor, so `steps_per_revolution` is
/// always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RevolutionGeometry {
    steps_per_revolution: u32,
}

impl RevolutionGeometry {
    /// Geometry of the reference setup: 200-step motor at 1/16 microstepping.
    pub const DEFAULT_STEPS_PER_REVOLUTION: u32 = 3200;

    /// Create a geometry from a total step count per revolution.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidStepsPerRevolution` if the count is not
    /// strictly positive or does not fit in a `u32`.
    pub fn new(steps_per_revolution: i64) -> Result<Self, ConfigError> {
        if steps_per_revolution <= 0 || steps_per_revolution > u32::MAX as i64 {
            return Err(ConfigError::InvalidStepsPerRevolution(steps_per_revolution));
        }
        Ok(Self {
            steps_per_revolution: steps_per_revolution as u32,
        })
    }

    /// Create a geometry from the motor's base step count and the driver's microstep divisor.
    pub fn from_motor(base_steps: u16, microsteps: Microsteps) -> Result<Self, ConfigError> {
        Self::new(base_steps as i64 * microsteps.value() as i64)
    }

    /// Steps for a full 360° turn.
    #[inline]
    pub const fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }

    /// Steps for a 180° turn (integer division).
    #[inline]
    pub const fn steps_per_half_revolution(&self) -> u32 {
        self.steps_per_revolution / 2
    }

    /// Steps per degree of output rotation.
    #[inline]
    pub fn steps_per_degree(&self) -> f32 {
        self.steps_per_revolution as f32 / 360.0
    }

    /// Wrap a position into `[0, steps_per_revolution)`.
    #[inline]
    pub fn wrap(&self, position: Steps) -> Steps {
        Steps(position.0.rem_euclid(self.steps_per_revolution as i64))
    }

    /// Apply the 180° mount offset to a position, wrapped into one revolution.
    #[inline]
    pub fn invert(&self, position: Steps) -> Steps {
        self.wrap(Steps(
            self.wrap(position).0 + self.steps_per_half_revolution() as i64,
        ))
    }

    /// Signed shortest distance from `from` to `to` around the circle.
    ///
    /// The result lies in `(-half, +half]`: a move of exactly half a revolution is
    /// reported as positive (forward).
    pub fn shortest_delta(&self, from: Steps, to: Steps) -> i64 {
        let rev = self.steps_per_revolution as i64;
        let half = self.steps_per_half_revolution() as i64;
        // Wrap both ends first so the subtraction cannot overflow.
        let delta = (self.wrap(to).0 - self.wrap(from).0).rem_euclid(rev);
        if delta > half {
            delta - rev
        } else {
            delta
        }
    }

    /// Convert degrees to the nearest whole step.
    #[inline]
    pub fn degrees_to_steps(&self, degrees: Degrees) -> Steps {
        Steps::from_degrees(degrees, self.steps_per_degree())
    }

    /// Convert steps to degrees.
    #[inline]
    pub fn steps_to_degrees(&self, steps: Steps) -> Degrees {
        steps.to_degrees(self.steps_per_degree())
    }
}

impl Default for RevolutionGeometry {
    fn default() -> Self {
        Self {
            steps_per_revolution: Self::DEFAULT_STEPS_PER_REVOLUTION,
        }
    }
}

//! Position tracking for stepper motors.
//!
//! Position is trusted state, not measured state: it is what the motor was last
//! commanded to, relative to the zero reference set at construction.

use crate::config::units::{Degrees, Steps};
use crate::config::RevolutionGeometry;

/// Motor position tracker.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    /// Current position in steps (from origin)
    steps: Steps,
    /// Cleared when a fault leaves the physical shaft position unknown
    verified: bool,
    geometry: RevolutionGeometry,
}

impl Position {
    /// Create a new position tracker at the zero reference.
    #[inline]
    pub fn new(geometry: RevolutionGeometry) -> Self {
        Self::at(Steps::ZERO, geometry)
    }

    /// Create a position tracker at a specific position.
    #[inline]
    pub fn at(steps: Steps, geometry: RevolutionGeometry) -> Self {
        Self {
            steps,
            verified: true,
            geometry,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Get current position in degrees.
    #[inline]
    pub fn degrees(&self) -> Degrees {
        self.geometry.steps_to_degrees(self.steps)
    }

    /// Record the position reached by a finished or interrupted move.
    #[inline]
    pub fn set_steps(&mut self, steps: Steps) {
        self.steps = steps;
    }

    /// Check whether the stored position can be trusted.
    #[inline]
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Flag the stored position as untrusted until the next re-home.
    #[inline]
    pub fn mark_unverified(&mut self) {
        self.verified = false;
    }

    /// Re-home: declare the shaft to be at `steps` and trust it again.
    #[inline]
    pub fn rehome_at(&mut self, steps: Steps) {
        self.steps = steps;
        self.verified = true;
    }

    /// Set current position as the new origin.
    #[inline]
    pub fn set_origin(&mut self) {
        self.rehome_at(Steps::ZERO);
    }

    /// Revolution geometry used for conversions.
    #[inline]
    pub fn geometry(&self) -> &RevolutionGeometry {
        &self.geometry
    }
}

//! Shortest-path move planning.
//!
//! Turns a raw target (plus the 180° mount inversion flag) into a direction and a
//! step count that never exceeds half a revolution.

use crate::config::units::Steps;
use crate::config::RevolutionGeometry;

/// Direction of shaft rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing step count.
    Forward,
    /// Decreasing step count.
    Backward,
}

impl Direction {
    /// Direction of a signed delta. Zero counts as forward.
    #[inline]
    pub fn from_delta(delta: i64) -> Self {
        if delta >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// The other way round.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Name for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

/// A request to move to an absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveRequest {
    /// Raw target in steps, before inversion.
    pub target: Steps,
    /// Apply the 180° mount offset.
    pub inversion: bool,
}

impl MoveRequest {
    /// Request a move to `target` without inversion.
    pub fn new(target: impl Into<Steps>) -> Self {
        Self {
            target: target.into(),
            inversion: false,
        }
    }

    /// Set the inversion flag.
    pub fn inverted(mut self, inversion: bool) -> Self {
        self.inversion = inversion;
        self
    }
}

/// Output of the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MovePlan {
    /// Way to turn.
    pub direction: Direction,
    /// Number of step pulses, at most half a revolution.
    pub step_count: u32,
    /// Position the move starts from.
    pub start: Steps,
    /// Target after inversion, wrapped into one revolution.
    pub effective_target: Steps,
}

impl MovePlan {
    /// Check if the plan emits no pulses.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.step_count == 0
    }

    /// Signed step delta.
    #[inline]
    pub fn signed_delta(&self) -> i64 {
        self.direction.sign() * self.step_count as i64
    }

    /// Position reached after `steps_done` pulses, wrapped into one revolution.
    pub fn position_after(&self, steps_done: u32, geometry: &RevolutionGeometry) -> Steps {
        let done = steps_done.min(self.step_count) as i64;
        geometry.wrap(Steps(
            geometry.wrap(self.start).0 + self.direction.sign() * done,
        ))
    }
}

/// Plan the shortest move from `current` to `target_raw`.
///
/// With `inversion` set, half a revolution is added to the target first. The
/// delta is normalized in one step into `(-half, +half]`, so a move of exactly
/// half a revolution goes forward.
pub fn plan_move(
    current: Steps,
    target_raw: Steps,
    inversion: bool,
    geometry: &RevolutionGeometry,
) -> MovePlan {
    let effective_target = if inversion {
        geometry.invert(target_raw)
    } else {
        geometry.wrap(target_raw)
    };

    let delta = geometry.shortest_delta(current, effective_target);
    let plan = MovePlan {
        direction: Direction::from_delta(delta),
        step_count: delta.unsigned_abs() as u32,
        start: current,
        effective_target,
    };

    debug!(
        "plan {} -> {} (raw {}, inverted {}): {} steps {}",
        current.0,
        effective_target.0,
        target_raw.0,
        inversion,
        plan.step_count,
        plan.direction.as_str()
    );

    plan
}

impl MoveRequest {
    /// Plan this request from `current`.
    pub fn plan(&self, current: Steps, geometry: &RevolutionGeometry) -> MovePlan {
        plan_move(current, self.target, self.inversion, geometry)
    }
}

//! Motion execution - resumable step generation.

use crate::config::units::Steps;
use crate::config::RevolutionGeometry;
use crate::error::ConfigError;

use super::planner::{Direction, MovePlan};

/// Fixed pulse timing for every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTiming {
    /// STEP high time in milliseconds.
    pub pulse_high_ms: u32,
    /// Delay after each falling edge in milliseconds.
    pub inter_step_delay_ms: u32,
}

impl StepTiming {
    /// 1 ms pulse, 12 ms between pulses (~77 steps/s).
    pub const DEFAULT: Self = Self {
        pulse_high_ms: 1,
        inter_step_delay_ms: 12,
    };

    /// Create a timing with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidStepTiming` if the pulse width is zero.
    pub fn new(pulse_high_ms: u32, inter_step_delay_ms: u32) -> Result<Self, ConfigError> {
        if pulse_high_ms == 0 {
            return Err(ConfigError::InvalidStepTiming {
                pulse_high_ms,
                inter_step_delay_ms,
            });
        }
        Ok(Self {
            pulse_high_ms,
            inter_step_delay_ms,
        })
    }

    /// Time taken by one step, in milliseconds.
    #[inline]
    pub fn step_period_ms(&self) -> u64 {
        self.pulse_high_ms as u64 + self.inter_step_delay_ms as u64
    }

    /// Resulting step rate.
    #[inline]
    pub fn steps_per_second(&self) -> f32 {
        1000.0 / self.step_period_ms() as f32
    }
}

impl Default for StepTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runtime state of a move in progress.
///
/// Produces one step at a time; the caller emits the pulse and may stop between
/// any two steps.
#[derive(Debug, Clone)]
pub struct MotionExecutor {
    plan: MovePlan,
    timing: StepTiming,
    steps_done: u32,
}

impl MotionExecutor {
    /// Create a new executor for a plan.
    pub fn new(plan: MovePlan, timing: StepTiming) -> Self {
        Self {
            plan,
            timing,
            steps_done: 0,
        }
    }

    /// Check if all steps have been emitted.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.steps_done >= self.plan.step_count
    }

    /// Number of steps emitted so far.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.steps_done
    }

    /// Get the total number of steps.
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.plan.step_count
    }

    /// Get steps remaining.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.plan.step_count.saturating_sub(self.steps_done)
    }

    /// Direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.plan.direction
    }

    /// Get the plan being executed.
    #[inline]
    pub fn plan(&self) -> &MovePlan {
        &self.plan
    }

    /// Get the pulse timing.
    #[inline]
    pub fn timing(&self) -> StepTiming {
        self.timing
    }

    /// Record one emitted step.
    ///
    /// Returns `true` if more steps remain.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.steps_done += 1;
        !self.is_complete()
    }

    /// Position reached so far, wrapped into one revolution.
    #[inline]
    pub fn position(&self, geometry: &RevolutionGeometry) -> Steps {
        self.plan.position_after(self.steps_done, geometry)
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.plan.step_count == 0 {
            1.0
        } else {
            self.steps_done as f32 / self.plan.step_count as f32
        }
    }

    /// Total duration of the move in milliseconds.
    pub fn estimated_duration_ms(&self) -> u64 {
        self.plan.step_count as u64 * self.timing.step_period_ms()
    }

    /// Time still needed in milliseconds.
    pub fn remaining_duration_ms(&self) -> u64 {
        self.steps_remaining() as u64 * self.timing.step_period_ms()
    }
}

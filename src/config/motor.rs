//! Motor configuration from TOML.

use heapless::{String, Vec};
use serde::Deserialize;

use super::angles::{PositionEntry, MAX_POSITIONS};
use super::geometry::RevolutionGeometry;
use super::units::Microsteps;
use crate::error::ConfigError;
use crate::motion::StepTiming;

/// Complete motor configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Human-readable label (max 32 chars).
    ///
    /// Motors built from a [`SystemConfig`](super::SystemConfig) take their key as name.
    pub name: String<32>,

    /// Base steps per revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep divisor configured on the driver (1, 2, 4, 8, 16, 32, etc.).
    #[serde(default)]
    pub microsteps: Microsteps,

    /// STEP high time in milliseconds.
    #[serde(default = "default_pulse_high_ms")]
    pub pulse_high_ms: u32,

    /// Delay after each STEP falling edge in milliseconds; sets the step rate.
    #[serde(default = "default_inter_step_delay_ms")]
    pub inter_step_delay_ms: u32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Actuator is mounted rotated by 180°; used as the default inversion flag.
    #[serde(default)]
    pub inverted_mount: bool,

    /// Named positions of interest, in table order.
    #[serde(default)]
    pub positions: Vec<PositionEntry, MAX_POSITIONS>,
}

fn default_pulse_high_ms() -> u32 {
    StepTiming::DEFAULT.pulse_high_ms
}

fn default_inter_step_delay_ms() -> u32 {
    StepTiming::DEFAULT.inter_step_delay_ms
}

impl MotorConfig {
    /// Revolution geometry: base steps × microsteps.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidStepsPerRevolution` if the product is zero.
    pub fn geometry(&self) -> Result<RevolutionGeometry, ConfigError> {
        RevolutionGeometry::from_motor(self.steps_per_revolution, self.microsteps)
    }

    /// Step pulse timing.
    pub fn timing(&self) -> Result<StepTiming, ConfigError> {
        StepTiming::new(self.pulse_high_ms, self.inter_step_delay_ms)
    }
}

//! Builder pattern for StepperMotor.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Microsteps;
use crate::config::{AngleTable, MotorConfig, RevolutionGeometry, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::motion::StepTiming;

use super::driver::StepperMotor;
use super::state::Idle;

/// Builder for creating StepperMotor instances.
pub struct StepperMotorBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    name: Option<heapless::String<32>>,
    steps_per_revolution: Option<u16>,
    microsteps: Option<Microsteps>,
    pulse_high_ms: u32,
    inter_step_delay_ms: u32,
    invert_direction: bool,
    inverted_mount: bool,
    table: Option<AngleTable>,
}

impl<STEP, DIR, DELAY> Default for StepperMotorBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY> StepperMotorBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            name: None,
            steps_per_revolution: None,
            microsteps: None,
            pulse_high_ms: StepTiming::DEFAULT.pulse_high_ms,
            inter_step_delay_ms: StepTiming::DEFAULT.inter_step_delay_ms,
            invert_direction: false,
            inverted_mount: false,
            table: None,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set steps per revolution (base motor steps before microstepping).
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.steps_per_revolution = Some(steps);
        self
    }

    /// Set microstep configuration.
    pub fn microsteps(mut self, microsteps: Microsteps) -> Self {
        self.microsteps = Some(microsteps);
        self
    }

    /// Set both pulse timings at once.
    pub fn timing(mut self, timing: StepTiming) -> Self {
        self.pulse_high_ms = timing.pulse_high_ms;
        self.inter_step_delay_ms = timing.inter_step_delay_ms;
        self
    }

    /// Set the STEP high time in milliseconds.
    pub fn pulse_high_ms(mut self, ms: u32) -> Self {
        self.pulse_high_ms = ms;
        self
    }

    /// Set the delay after each pulse in milliseconds.
    pub fn inter_step_delay_ms(mut self, ms: u32) -> Self {
        self.inter_step_delay_ms = ms;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the default inversion used by sequence moves.
    pub fn inverted_mount(mut self, inverted: bool) -> Self {
        self.inverted_mount = inverted;
        self
    }

    /// Set the angle table.
    pub fn angle_table(mut self, table: AngleTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Use the reference valve positions as the angle table.
    pub fn reference_table(self) -> Self {
        self.angle_table(AngleTable::reference())
    }

    /// Configure from a MotorConfig.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution is zero or the angle table is malformed.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Result<Self> {
        let geometry = config.geometry()?;
        self.name = Some(config.name.clone());
        self.steps_per_revolution = Some(config.steps_per_revolution);
        self.microsteps = Some(config.microsteps);
        self.pulse_high_ms = config.pulse_high_ms;
        self.inter_step_delay_ms = config.inter_step_delay_ms;
        self.invert_direction = config.invert_direction;
        self.inverted_mount = config.inverted_mount;
        self.table = Some(AngleTable::from_entries(&config.positions, &geometry)?);
        Ok(self)
    }

    /// Configure from SystemConfig by motor key.
    ///
    /// The motor is named after its key, which is what sequences refer to.
    pub fn from_config(self, config: &SystemConfig, motor_name: &str) -> Result<Self> {
        let motor_config = config.motor(motor_name).ok_or_else(|| {
            Error::Config(ConfigError::MotorNotFound(
                heapless::String::try_from(motor_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_motor_config(motor_config)?.name(motor_name))
    }

    /// Build the StepperMotor.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the delay is missing, the resolution is zero, or
    /// the pulse width is zero.
    pub fn build(self) -> Result<StepperMotor<STEP, DIR, DELAY, Idle>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        let name = match self.name {
            Some(name) => name,
            None => heapless::String::try_from("motor").unwrap_or_default(),
        };

        let geometry = match self.steps_per_revolution {
            Some(steps) => {
                RevolutionGeometry::from_motor(steps, self.microsteps.unwrap_or_default())?
            }
            None => RevolutionGeometry::default(),
        };
        let timing = StepTiming::new(self.pulse_high_ms, self.inter_step_delay_ms)?;

        debug!(
            "{}: {} steps/rev, {} ms + {} ms per step",
            name.as_str(),
            geometry.steps_per_revolution(),
            timing.pulse_high_ms,
            timing.inter_step_delay_ms
        );

        Ok(StepperMotor::new(
            step_pin,
            dir_pin,
            delay,
            geometry,
            timing,
            self.table.unwrap_or_default(),
            name,
            self.invert_direction,
            self.inverted_mount,
        ))
    }
}

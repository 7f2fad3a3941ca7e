//! Motor system facade for multi-motor configuration.
//!
//! Provides a high-level API for managing multiple motors from a single configuration.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::{FnvIndexMap, String};

use crate::config::{MotorConfig, MoveSequence, RevolutionGeometry, SystemConfig};
use crate::error::Result;
use crate::motor::state::Idle;
use crate::motor::{StepperMotor, StepperMotorBuilder};
use crate::sequence::SequenceRegistry;

/// A facade for managing multiple stepper motors from configuration.
///
/// `MotorSystem` provides a high-level API for:
/// - Creating motors from named configurations
/// - Looking up motor geometry by name
/// - Managing the sequence registry
///
/// # Example
///
/// ```rust,ignore
/// use stepper_indexer::motor::MotorSystem;
///
/// let config = stepper_indexer::parse_config(CONFIG_TOML)?;
/// let mut system = MotorSystem::from_config(config);
///
/// let valve = system.register_motor("valve", step_pin, dir_pin, delay)?;
/// let demo = system.sequence("demo")?;
/// let valve = valve.run_sequence(demo).map_err(|(_, e)| e)?;
/// ```
pub struct MotorSystem {
    /// The system configuration.
    config: SystemConfig,
    /// Sequence registry for named lookups.
    registry: SequenceRegistry,
    /// Registered motor names (actual motors are owned by user due to generic types).
    registered_motors: FnvIndexMap<String<32>, RevolutionGeometry, 8>,
}

impl MotorSystem {
    /// Create a new motor system from configuration.
    ///
    /// This fills the sequence registry but does not create any motors.
    /// Motors must be registered individually using `register_motor()` or
    /// created using `build_motor()`.
    pub fn from_config(config: SystemConfig) -> Self {
        let registry = SequenceRegistry::from_config(&config);
        Self {
            config,
            registry,
            registered_motors: FnvIndexMap::new(),
        }
    }

    /// Get the system configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Get the sequence registry.
    pub fn sequences(&self) -> &SequenceRegistry {
        &self.registry
    }

    /// Get a motor configuration by name.
    ///
    /// Returns `None` if no motor with that name exists in the configuration.
    pub fn motor_config(&self, name: &str) -> Option<&MotorConfig> {
        self.config.motor(name)
    }

    /// Get the revolution geometry of a motor by name.
    ///
    /// Returns `None` if no motor with that name exists or its resolution is invalid.
    pub fn geometry(&self, name: &str) -> Option<RevolutionGeometry> {
        self.config.motor(name).and_then(|m| m.geometry().ok())
    }

    /// Check if a motor name exists in the configuration.
    pub fn has_motor(&self, name: &str) -> bool {
        self.config.motor(name).is_some()
    }

    /// List all configured motor names.
    pub fn motor_names(&self) -> impl Iterator<Item = &str> {
        self.config.motor_names()
    }

    /// Register a motor as active in the system.
    ///
    /// This marks the motor as registered and stores its geometry.
    /// The actual motor instance is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the motor name doesn't exist in the configuration
    /// or its configuration is invalid.
    pub fn register_motor<STEP, DIR, DELAY>(
        &mut self,
        name: &str,
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
    ) -> Result<StepperMotor<STEP, DIR, DELAY, Idle>>
    where
        STEP: OutputPin,
        DIR: OutputPin,
        DELAY: DelayNs,
    {
        let motor = self.build_motor(name, step_pin, dir_pin, delay)?;

        let motor_name: String<32> = String::try_from(name).unwrap_or_default();
        let _ = self.registered_motors.insert(motor_name, *motor.geometry());

        Ok(motor)
    }

    /// Build a motor from configuration without registering it.
    ///
    /// Use this when you need a motor but don't need system-level tracking.
    ///
    /// # Errors
    ///
    /// Returns an error if the motor name doesn't exist or building fails.
    pub fn build_motor<STEP, DIR, DELAY>(
        &self,
        name: &str,
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
    ) -> Result<StepperMotor<STEP, DIR, DELAY, Idle>>
    where
        STEP: OutputPin,
        DIR: OutputPin,
        DELAY: DelayNs,
    {
        StepperMotorBuilder::new()
            .step_pin(step_pin)
            .dir_pin(dir_pin)
            .delay(delay)
            .from_config(&self.config, name)?
            .build()
    }

    /// Check if a motor has been registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.registered_motors
            .iter()
            .any(|(k, _)| k.as_str() == name)
    }

    /// Get the number of registered motors.
    pub fn registered_count(&self) -> usize {
        self.registered_motors.len()
    }

    /// Get a sequence by name, with error if not found.
    pub fn sequence(&self, name: &str) -> Result<&MoveSequence> {
        self.registry.get_or_error(name)
    }

    /// Get all sequence names for a specific motor.
    pub fn sequences_for_motor<'a>(
        &'a self,
        motor_name: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.registry.for_motor(motor_name).map(|(name, _)| name)
    }
}

//! Configuration validation.

use heapless::String;

use crate::error::{Error, Result, SequenceError};

use super::{AngleTable, MotorConfig, MoveSequence, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Revolution geometry is strictly positive
/// - Step timing is usable
/// - Angle tables are well formed (one of steps/degrees, unique names)
/// - Sequences reference existing motors and resolvable positions
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, motor) in config.motors.iter() {
        validate_motor(motor)?;
    }

    for (name, seq) in config.sequences.iter() {
        validate_sequence(name.as_str(), seq, config)?;
    }

    Ok(())
}

fn validate_motor(config: &MotorConfig) -> Result<AngleTable> {
    let geometry = config.geometry()?;
    config.timing()?;
    AngleTable::from_entries(&config.positions, &geometry)
}

fn validate_sequence(name: &str, seq: &MoveSequence, config: &SystemConfig) -> Result<()> {
    let motor = config.motor(seq.motor.as_str()).ok_or_else(|| {
        Error::Sequence(SequenceError::MotorNotFound {
            sequence: String::try_from(name).unwrap_or_default(),
            motor: seq.motor.clone(),
        })
    })?;

    if seq.is_empty() {
        return Err(Error::Sequence(SequenceError::Empty));
    }

    let table = validate_motor(motor)?;
    for m in seq.moves.iter() {
        m.target(&table)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Microsteps;
    use crate::config::SequenceMove;
    use crate::error::{ConfigError, TableError};

    fn motor(steps_per_revolution: u16) -> MotorConfig {
        MotorConfig {
            name: String::try_from("valve").unwrap(),
            steps_per_revolution,
            microsteps: Microsteps::SIXTEENTH,
            pulse_high_ms: 1,
            inter_step_delay_ms: 12,
            invert_direction: false,
            inverted_mount: false,
            positions: heapless::Vec::new(),
        }
    }

    #[test]
    fn test_zero_steps_per_revolution() {
        let result = validate_motor(&motor(0));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
        ));
    }

    #[test]
    fn test_zero_pulse_width() {
        let mut config = motor(200);
        config.pulse_high_ms = 0;
        assert!(matches!(
            validate_motor(&config),
            Err(Error::Config(ConfigError::InvalidStepTiming { .. }))
        ));
    }

    #[test]
    fn test_sequence_position_out_of_table() {
        let mut config = SystemConfig::default();
        let _ = config
            .motors
            .insert(String::try_from("valve").unwrap(), motor(200));
        let mut moves = heapless::Vec::new();
        let _ = moves.push(SequenceMove::to_position(0usize));
        let _ = config.sequences.insert(
            String::try_from("bad").unwrap(),
            MoveSequence {
                motor: String::try_from("valve").unwrap(),
                moves,
            },
        );

        // The motor has an empty table, so index 0 is out of range
        assert_eq!(
            validate_config(&config),
            Err(Error::Table(TableError::InvalidPosition { index: 0, len: 0 }))
        );
    }
}

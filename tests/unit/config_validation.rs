//! Unit tests for configuration validation.

use stepper_indexer::config::{validate_config, SystemConfig};
use stepper_indexer::error::{ConfigError, Error, SequenceError, TableError};

fn raw(toml_str: &str) -> SystemConfig {
    toml::from_str(toml_str).expect("Failed to parse TOML")
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = raw(
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200
microsteps = 16

[[motors.valve.positions]]
name = "closed"
steps = 0

[sequences.close]
motor = "valve"
moves = [{ position = "closed" }]
"#,
    );
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a sequence referencing a non-existent motor.
#[test]
fn test_sequence_invalid_motor_reference() {
    let config = raw(
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200

[sequences.bad_ref]
motor = "pump"
moves = [{ steps = 10 }]
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Sequence(SequenceError::MotorNotFound { .. }))
    ));
}

/// Test validation fails for a sequence index past the end of the table.
#[test]
fn test_sequence_index_out_of_range() {
    let config = raw(
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200

[[motors.valve.positions]]
name = "closed"
steps = 0

[sequences.bad_index]
motor = "valve"
moves = [{ position = 1 }]
"#,
    );
    assert_eq!(
        validate_config(&config),
        Err(Error::Table(TableError::InvalidPosition { index: 1, len: 1 }))
    );
}

/// Test validation fails for an empty sequence.
#[test]
fn test_empty_sequence() {
    let config = raw(
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200

[sequences.nothing]
motor = "valve"
moves = []
"#,
    );
    assert_eq!(
        validate_config(&config),
        Err(Error::Sequence(SequenceError::Empty))
    );
}

/// Test validation fails for a zero pulse width.
#[test]
fn test_zero_pulse_width() {
    let config = raw(
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200
pulse_high_ms = 0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepTiming { .. }))
    ));
}

/// Test validation fails for duplicate position names.
#[test]
fn test_duplicate_position_names() {
    let config = raw(
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200

[[motors.valve.positions]]
name = "open"
steps = 0

[[motors.valve.positions]]
name = "open"
steps = 100
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::DuplicatePositionName(_)))
    ));
}

/// Test validation fails for a position with both steps and degrees.
#[test]
fn test_ambiguous_position_entry() {
    let config = raw(
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200

[[motors.valve.positions]]
name = "open"
steps = 0
degrees = 10.0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidPositionEntry(_)))
    ));
}

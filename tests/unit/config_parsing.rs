//! Unit tests for TOML configuration parsing.

use stepper_indexer::config::{load_config, parse_config, PositionRef};
use stepper_indexer::{Microsteps, Steps};

/// Test parsing a motor with defaults filled in.
#[test]
fn test_parse_motor_config() {
    let toml_str = r#"
[motors.valve]
name = "main_valve"
steps_per_revolution = 200
microsteps = 16
invert_direction = true
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let motor = config.motor("valve").expect("Motor not found");

    assert_eq!(motor.name.as_str(), "main_valve");
    assert_eq!(motor.steps_per_revolution, 200);
    assert_eq!(motor.microsteps, Microsteps::SIXTEENTH);
    assert_eq!(motor.pulse_high_ms, 1);
    assert_eq!(motor.inter_step_delay_ms, 12);
    assert!(motor.invert_direction);
    assert!(!motor.inverted_mount);
    assert!(motor.positions.is_empty());
}

/// Test parsing positions given in steps and in degrees.
#[test]
fn test_parse_positions() {
    let toml_str = r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200
microsteps = 16

[[motors.valve.positions]]
name = "closed"
steps = 0

[[motors.valve.positions]]
name = "open"
degrees = 130.0
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let motor = config.motor("valve").unwrap();
    assert_eq!(motor.positions.len(), 2);
    assert_eq!(motor.positions[0].steps, Some(Steps(0)));
    assert!(motor.positions[1].degrees.is_some());

    let table = stepper_indexer::AngleTable::from_entries(
        &motor.positions,
        &motor.geometry().unwrap(),
    )
    .unwrap();
    // 130° of 3200 steps, rounded
    assert_eq!(table.by_name("open").unwrap(), Steps(1156));
}

/// Test that position references accept both indices and names.
#[test]
fn test_parse_sequence_references() {
    let toml_str = r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200
microsteps = 16

[[motors.valve.positions]]
name = "closed"
steps = 0

[[motors.valve.positions]]
name = "open"
steps = 800

[sequences.cycle]
motor = "valve"
moves = [
  { position = 1, settle_ms = 250 },
  { position = "closed", inverted = true },
  { steps = 1600 },
]
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let cycle = config.sequence("cycle").expect("Sequence not found");

    assert_eq!(cycle.motor.as_str(), "valve");
    assert_eq!(cycle.len(), 3);
    assert_eq!(cycle.moves[0].position, Some(PositionRef::Index(1)));
    assert_eq!(cycle.moves[0].settle_ms, 250);
    assert_eq!(
        cycle.moves[1].position,
        Some(PositionRef::Name("closed".try_into().unwrap()))
    );
    assert_eq!(cycle.moves[1].inverted, Some(true));
    assert_eq!(cycle.moves[2].steps, Some(Steps(1600)));
}

/// Test that an invalid microstep value is a parse error.
#[test]
fn test_parse_invalid_microsteps() {
    let toml_str = r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200
microsteps = 3
"#;

    assert!(parse_config(toml_str).is_err());
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("stepper_indexer_load_test.toml");
    std::fs::write(
        &path,
        r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200
"#,
    )
    .unwrap();

    let config = load_config(&path).expect("Failed to load config");
    let _ = std::fs::remove_file(&path);

    let geometry = config.motor("valve").unwrap().geometry().unwrap();
    assert_eq!(geometry.steps_per_revolution(), 200);
}

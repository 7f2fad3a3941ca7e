//! Integration tests for stepper-indexer.
//!
//! These tests verify the complete workflow from TOML parsing to sequence execution.

#![cfg(feature = "std")]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use stepper_indexer::error::{MotorError, SequenceError, TableError};
use stepper_indexer::{
    parse_config, plan_move, Direction, Error, MotorSystem, MoveRequest, RevolutionGeometry,
    SequenceRegistry, StepperMotor, Steps,
};

// =============================================================================
// Test configuration data
// =============================================================================

const VALVE_CONFIG: &str = r#"
[motors.valve]
name = "valve"
steps_per_revolution = 200
microsteps = 16
pulse_high_ms = 1
inter_step_delay_ms = 12

[[motors.valve.positions]]
name = "deg_0"
steps = 0

[[motors.valve.positions]]
name = "deg_130"
steps = 1156

[[motors.valve.positions]]
name = "deg_180"
degrees = 180.0

[[motors.valve.positions]]
name = "deg_210"
steps = 1866

[[motors.valve.positions]]
name = "deg_240"
steps = 2133

[[motors.valve.positions]]
name = "deg_90"
degrees = 90.0

[sequences.demo]
motor = "valve"
moves = [
  { position = 0 },
  { position = 2, settle_ms = 3000 },
  { position = 1, settle_ms = 3000 },
  { position = 3, settle_ms = 3000 },
  { position = 0 },
]

[sequences.flip]
motor = "valve"
moves = [{ position = "deg_90", inverted = true }, { steps = 0 }]
"#;

// =============================================================================
// Recording hardware
// =============================================================================

#[derive(Clone, Default)]
struct ScopePin {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl ScopePin {
    fn pulses(&self) -> usize {
        self.levels.borrow().iter().filter(|high| **high).count()
    }

    fn last(&self) -> Option<bool> {
        self.levels.borrow().last().copied()
    }
}

impl ErrorType for ScopePin {
    type Error = Infallible;
}

impl OutputPin for ScopePin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }
}

/// Succeeds `budget` times, then fails every write.
struct BrownoutPin {
    budget: usize,
}

impl ErrorType for BrownoutPin {
    type Error = ErrorKind;
}

impl OutputPin for BrownoutPin {
    fn set_high(&mut self) -> Result<(), ErrorKind> {
        self.spend()
    }

    fn set_low(&mut self) -> Result<(), ErrorKind> {
        self.spend()
    }
}

impl BrownoutPin {
    fn spend(&mut self) -> Result<(), ErrorKind> {
        match self.budget.checked_sub(1) {
            Some(left) => {
                self.budget = left;
                Ok(())
            }
            None => Err(ErrorKind::Other),
        }
    }
}

#[derive(Clone, Default)]
struct Clock {
    elapsed_ms: Rc<RefCell<u64>>,
}

impl DelayNs for Clock {
    fn delay_ns(&mut self, ns: u32) {
        *self.elapsed_ms.borrow_mut() += ns as u64 / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        *self.elapsed_ms.borrow_mut() += ms as u64;
    }
}

fn valve_system() -> MotorSystem {
    MotorSystem::from_config(parse_config(VALVE_CONFIG).expect("valve config should parse"))
}

// =============================================================================
// Planner contract
// =============================================================================

#[test]
fn planner_reference_cases() {
    let geometry = RevolutionGeometry::new(3200).unwrap();

    let plan = plan_move(Steps(0), Steps(2133), false, &geometry);
    assert_eq!((plan.direction, plan.step_count), (Direction::Backward, 1067));

    let plan = plan_move(Steps(0), Steps(800), true, &geometry);
    assert_eq!(plan.effective_target, Steps(2400));
    assert_eq!((plan.direction, plan.step_count), (Direction::Backward, 800));

    let plan = plan_move(Steps(3100), Steps(100), false, &geometry);
    assert_eq!((plan.direction, plan.step_count), (Direction::Forward, 200));
}

#[test]
fn zero_resolution_is_rejected_before_planning() {
    assert!(RevolutionGeometry::new(0).is_err());
    assert!(RevolutionGeometry::new(-3200).is_err());

    let toml = r#"
[motors.bad]
name = "bad"
steps_per_revolution = 0
"#;
    assert!(matches!(parse_config(toml), Err(Error::Config(_))));
}

// =============================================================================
// Full workflow
// =============================================================================

#[test]
fn demo_sequence_from_config() {
    let mut system = valve_system();
    let step = ScopePin::default();
    let dir = ScopePin::default();
    let clock = Clock::default();

    let valve = system
        .register_motor("valve", step.clone(), dir.clone(), clock.clone())
        .unwrap();
    assert_eq!(valve.angle_table().get(2).unwrap(), Steps(1600));
    assert_eq!(valve.angle_table().get(5).unwrap(), Steps(800));

    let demo = system.sequence("demo").unwrap();
    // Dwells only at the three middle stops
    assert_eq!(demo.total_settle_ms(), 9000);
    let valve = valve.run_sequence(demo).map_err(|(_, e)| e).unwrap();

    assert_eq!(valve.position_steps(), Steps(0));
    assert!(valve.is_position_verified());
    assert_eq!(step.pulses(), 1600 + 444 + 710 + 1334);
    // Last leg wraps forward through zero
    assert_eq!(dir.last(), Some(true));
    assert_eq!(
        *clock.elapsed_ms.borrow(),
        step.pulses() as u64 * 13 + demo.total_settle_ms()
    );
}

#[test]
fn inverted_sequence_move() {
    let system = valve_system();
    let step = ScopePin::default();
    let valve = system
        .build_motor("valve", step.clone(), ScopePin::default(), Clock::default())
        .unwrap();

    let mut registry = SequenceRegistry::new();
    registry
        .register("flip", system.sequence("flip").unwrap().clone())
        .unwrap();

    let valve = valve
        .run_named_sequence("flip", &registry)
        .map_err(|(_, e)| e)
        .unwrap();
    // 0 -> 2400 backward, then 2400 -> 0 forward
    assert_eq!(step.pulses(), 1600);
    assert_eq!(valve.position_steps(), Steps(0));

    let (_, err) = valve
        .run_named_sequence("missing", &registry)
        .err()
        .unwrap();
    assert!(matches!(err, Error::Sequence(SequenceError::NotFound(_))));
}

#[test]
fn round_trip_returns_to_start() {
    let valve = valve_system()
        .build_motor("valve", ScopePin::default(), ScopePin::default(), Clock::default())
        .unwrap();

    let valve = valve.move_to_named("deg_130", false).map_err(|(_, e)| e).unwrap();
    let valve = valve.move_to_named("deg_240", true).map_err(|(_, e)| e).unwrap();
    let valve = valve.move_to_named("deg_130", false).map_err(|(_, e)| e).unwrap();
    assert_eq!(valve.position_steps(), Steps(1156));
}

#[test]
fn repeated_move_plans_nothing() {
    let valve = valve_system()
        .build_motor("valve", ScopePin::default(), ScopePin::default(), Clock::default())
        .unwrap();

    let valve = valve.move_to_index(4, true).map_err(|(_, e)| e).unwrap();
    let plan = valve.plan(MoveRequest::new(Steps(2133)).inverted(true)).unwrap();
    assert!(plan.is_zero());
    assert_eq!(plan.effective_target, valve.position_steps());
}

#[test]
fn out_of_range_index() {
    let valve = valve_system()
        .build_motor("valve", ScopePin::default(), ScopePin::default(), Clock::default())
        .unwrap();

    let (valve, err) = valve.move_to_index(6, false).err().unwrap();
    assert_eq!(
        err,
        Error::Table(TableError::InvalidPosition { index: 6, len: 6 })
    );
    assert_eq!(valve.position_steps(), Steps(0));
}

// =============================================================================
// Faults and interruption
// =============================================================================

#[test]
fn step_fault_requires_rehome() {
    let valve: StepperMotor<_, _, _> = StepperMotor::builder()
        .name("valve")
        .reference_table()
        .step_pin(BrownoutPin { budget: 200 })
        .dir_pin(ScopePin::default())
        .delay(Clock::default())
        .build()
        .unwrap();

    let (valve, err) = valve.move_to_index(2, false).err().unwrap();
    assert_eq!(err, Error::Motor(MotorError::PinError));
    assert_eq!(valve.position_steps(), Steps(0));
    assert!(!valve.is_position_verified());

    let (mut valve, err) = valve.move_to_index(0, false).err().unwrap();
    assert_eq!(err, Error::Motor(MotorError::PositionUnverified));

    // Operator confirms the shaft stopped after 100 pulses
    valve.rehome_at(Steps(100));
    assert!(valve.is_position_verified());
    assert_eq!(
        valve.plan(MoveRequest::new(Steps(0))).unwrap().direction,
        Direction::Backward
    );
}

#[test]
fn abort_keeps_reached_position() {
    let valve = StepperMotor::builder()
        .reference_table()
        .step_pin(ScopePin::default())
        .dir_pin(ScopePin::default())
        .delay(Clock::default())
        .build()
        .unwrap();

    let mut moving = valve
        .move_to(MoveRequest::new(Steps(1866)))
        .map_err(|(_, e)| e)
        .unwrap();
    assert_eq!(moving.direction(), Some(Direction::Backward));
    for _ in 0..334 {
        moving.step().unwrap();
    }
    let valve = moving.abort();

    assert_eq!(valve.position_steps(), Steps(2866));
    assert!(valve.is_position_verified());

    let valve = valve.move_to_index(3, false).map_err(|(_, e)| e).unwrap();
    assert_eq!(valve.position_steps(), Steps(1866));
}

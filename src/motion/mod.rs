//! Motion module for stepper-indexer.
//!
//! Provides shortest-path planning and resumable step execution.

mod executor;
mod planner;

pub use executor::{MotionExecutor, StepTiming};
pub use planner::{plan_move, Direction, MovePlan, MoveRequest};

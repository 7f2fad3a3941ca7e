//! # stepper-indexer
//!
//! Shortest-path angular positioning for step/dir stepper drivers with embedded-hal 1.0
//! support.
//!
//! A motor holds a position in steps within one revolution. Each move goes to an
//! absolute target, optionally offset by half a revolution ("inverted"), along the
//! shorter way round the circle.
//!
//! ## Features
//!
//! - **Shortest path**: Every move takes at most half a revolution
//! - **Angle tables**: Named positions of interest, addressed by index or name
//! - **Move sequences**: Ordered moves with settle times, from code or TOML
//! - **embedded-hal 1.0**: Uses `OutputPin` for STEP/DIR, `DelayNs` for timing
//! - **no_std compatible**: Core library works without standard library
//! - **Type-state safety**: Compile-time motor state verification
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_indexer::{Microsteps, StepperMotor};
//!
//! let motor = StepperMotor::builder()
//!     .name("valve")
//!     .steps_per_revolution(200)
//!     .microsteps(Microsteps::SIXTEENTH)
//!     .reference_table()
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .delay(delay)
//!     .build()?;
//!
//! // 180° away, the short way round
//! let motor = motor.move_to_index(2, false).map_err(|(_, e)| e)?;
//!
//! // The same table entry on a mount rotated by half a turn
//! let motor = motor.move_to_named("deg_90", true).map_err(|(_, e)| e)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `log` (default): Logs through the `log` facade
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible everywhere.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod sequence;

// Re-exports for ergonomic API
pub use config::{
    validate_config, AngleTable, MotorConfig, MoveSequence, PositionRef, RevolutionGeometry,
    SequenceMove, SystemConfig,
};
pub use error::{Error, Result};
pub use motion::{plan_move, Direction, MotionExecutor, MovePlan, MoveRequest, StepTiming};
pub use motor::{state, MotorSystem, StepperMotor, StepperMotorBuilder};
pub use sequence::{SequenceBuilder, SequenceRegistry};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, Microsteps, Steps};

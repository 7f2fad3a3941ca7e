//! Configuration module for stepper-indexer.
//!
//! Provides types for loading and validating motor, angle table and sequence
//! configurations from TOML files (with `std` feature) or pre-parsed data.

mod angles;
mod geometry;
mod motor;
mod sequence;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use angles::{AngleTable, NamedAngle, PositionEntry, PositionRef, MAX_POSITIONS};
pub use geometry::RevolutionGeometry;
pub use motor::MotorConfig;
pub use sequence::{MoveSequence, SequenceMove, MAX_MOVES};
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Microsteps, Steps};

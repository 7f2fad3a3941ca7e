//! Sequence module for stepper-indexer.
//!
//! Provides named move sequence storage, lookup, and building.

mod builder;
mod registry;

pub use builder::SequenceBuilder;
pub use registry::{SequenceRegistry, MAX_SEQUENCES};

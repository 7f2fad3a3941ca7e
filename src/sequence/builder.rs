//! Sequence builder for programmatic sequence creation.

use heapless::{String, Vec};

use crate::config::units::Steps;
use crate::config::{MoveSequence, PositionRef, SequenceMove, MAX_MOVES};
use crate::error::{ConfigError, Error, Result, SequenceError, TableError};

/// Builder for move sequences.
///
/// ```rust
/// use stepper_indexer::sequence::SequenceBuilder;
///
/// let demo = SequenceBuilder::new()
///     .motor("turntable")
///     .move_to(0usize)
///     .move_to_named("deg_180")
///     .settle(3000)
///     .build()
///     .unwrap();
/// assert_eq!(demo.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    motor: Option<String<32>>,
    moves: Vec<SequenceMove, MAX_MOVES>,
    overflow: bool,
    bad_name: bool,
}

impl SequenceBuilder {
    /// Create a new sequence builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target motor name.
    pub fn motor(mut self, name: &str) -> Self {
        self.motor = String::try_from(name).ok();
        self
    }

    /// Append a move to an angle table entry.
    pub fn move_to(self, position: impl Into<PositionRef>) -> Self {
        self.then(SequenceMove::to_position(position))
    }

    /// Append a move to the angle table entry called `name`.
    pub fn move_to_named(mut self, name: &str) -> Self {
        match String::try_from(name) {
            Ok(name) => self.then(SequenceMove::to_position(PositionRef::Name(name))),
            Err(_) => {
                self.bad_name = true;
                self
            }
        }
    }

    /// Append a move to a raw step target.
    pub fn move_to_steps(self, steps: Steps) -> Self {
        self.then(SequenceMove::to_steps(steps))
    }

    /// Append a fully specified move.
    pub fn then(mut self, step: SequenceMove) -> Self {
        if self.moves.push(step).is_err() {
            self.overflow = true;
        }
        self
    }

    /// Mark the last move as inverted (or not).
    pub fn inverted(mut self, inverted: bool) -> Self {
        if let Some(last) = self.moves.last_mut() {
            last.inverted = Some(inverted);
        }
        self
    }

    /// Set the pause after the last move (milliseconds).
    pub fn settle(mut self, settle_ms: u32) -> Self {
        if let Some(last) = self.moves.last_mut() {
            last.settle_ms = settle_ms;
        }
        self
    }

    /// Build the sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if no motor was given, there are no moves, or more
    /// moves were added than a sequence holds.
    pub fn build(self) -> Result<MoveSequence> {
        let motor = self
            .motor
            .ok_or(Error::Config(ConfigError::MissingField("motor")))?;

        if self.bad_name {
            return Err(Error::Table(TableError::NameTooLong));
        }
        if self.overflow {
            return Err(Error::Sequence(SequenceError::TooManyMoves));
        }
        if self.moves.is_empty() {
            return Err(Error::Sequence(SequenceError::Empty));
        }

        Ok(MoveSequence {
            motor,
            moves: self.moves,
        })
    }
}

//! Move sequence configuration from TOML.

use heapless::{String, Vec};
use serde::Deserialize;

use super::angles::{AngleTable, PositionRef};
use super::units::Steps;
use crate::error::{Result, SequenceError};

/// Maximum number of moves in a sequence.
pub const MAX_MOVES: usize = 32;

/// One move of a sequence.
///
/// The target is either a reference into the motor's angle table (`position`)
/// or a raw step count (`steps`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SequenceMove {
    /// Angle table entry to move to.
    #[serde(default)]
    pub position: Option<PositionRef>,

    /// Raw step target, used when no table entry is given.
    #[serde(default)]
    pub steps: Option<Steps>,

    /// Apply the 180° mount offset. Falls back to the motor's `inverted_mount`.
    #[serde(default)]
    pub inverted: Option<bool>,

    /// Pause after the move completes (milliseconds).
    #[serde(default)]
    pub settle_ms: u32,
}

impl SequenceMove {
    /// Move to an angle table entry.
    pub fn to_position(position: impl Into<PositionRef>) -> Self {
        Self {
            position: Some(position.into()),
            steps: None,
            inverted: None,
            settle_ms: 0,
        }
    }

    /// Move to a raw step target.
    pub fn to_steps(steps: Steps) -> Self {
        Self {
            position: None,
            steps: Some(steps),
            inverted: None,
            settle_ms: 0,
        }
    }

    /// Override the inversion flag for this move.
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = Some(inverted);
        self
    }

    /// Pause after this move.
    pub fn settle(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Check that exactly one target form is given.
    pub fn is_well_formed(&self) -> bool {
        self.position.is_some() != self.steps.is_some()
    }

    /// Resolve the raw (pre-inversion) target against an angle table.
    ///
    /// # Errors
    ///
    /// Returns a table error if the reference does not resolve, or
    /// `SequenceError::InvalidName` if the move names no target.
    pub fn target(&self, table: &AngleTable) -> Result<Steps> {
        match (&self.position, self.steps) {
            (Some(position), None) => table.resolve(position),
            (None, Some(steps)) => Ok(steps),
            _ => Err(SequenceError::InvalidName(
                String::try_from("move needs exactly one of `position` or `steps`")
                    .unwrap_or_default(),
            )
            .into()),
        }
    }

    /// Effective inversion flag given the motor default.
    #[inline]
    pub fn inversion(&self, mount_default: bool) -> bool {
        self.inverted.unwrap_or(mount_default)
    }
}

/// A named sequence of moves for one motor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoveSequence {
    /// Target motor name.
    pub motor: String<32>,

    /// Ordered moves (max 32).
    pub moves: Vec<SequenceMove, MAX_MOVES>,
}

impl MoveSequence {
    /// Number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Check if the sequence has no moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Total settle time across all moves (milliseconds).
    pub fn total_settle_ms(&self) -> u64 {
        self.moves.iter().map(|m| m.settle_ms as u64).sum()
    }
}

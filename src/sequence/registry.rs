//! Sequence registry for named sequence lookup.

use heapless::{FnvIndexMap, String};

use crate::config::{MoveSequence, SystemConfig};
use crate::error::{Error, Result, SequenceError};

/// Maximum number of sequences in the registry.
pub const MAX_SEQUENCES: usize = 16;

/// Registry for named move sequences.
#[derive(Debug, Clone)]
pub struct SequenceRegistry {
    sequences: FnvIndexMap<String<32>, MoveSequence, MAX_SEQUENCES>,
}

impl Default for SequenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            sequences: FnvIndexMap::new(),
        }
    }

    /// Load every sequence of a configuration.
    pub fn from_config(config: &SystemConfig) -> Self {
        let mut registry = Self::new();
        for (name, sequence) in &config.sequences {
            let _ = registry.register(name.as_str(), sequence.clone());
        }
        registry
    }

    /// Register a sequence with a name, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is too long or the registry is full.
    pub fn register(&mut self, name: &str, sequence: MoveSequence) -> Result<()> {
        let key = String::try_from(name).map_err(|_| {
            Error::Sequence(SequenceError::InvalidName(
                String::try_from("name too long").unwrap_or_default(),
            ))
        })?;

        self.sequences.insert(key, sequence).map_err(|_| {
            Error::Sequence(SequenceError::InvalidName(
                String::try_from("registry full").unwrap_or_default(),
            ))
        })?;

        Ok(())
    }

    /// Get a sequence by name.
    pub fn get(&self, name: &str) -> Option<&MoveSequence> {
        let key = String::try_from(name).ok()?;
        self.sequences.get(&key)
    }

    /// Get a sequence by name.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::NotFound` if no sequence has that name.
    pub fn get_or_error(&self, name: &str) -> Result<&MoveSequence> {
        self.get(name).ok_or_else(|| {
            Error::Sequence(SequenceError::NotFound(
                String::try_from(name).unwrap_or_default(),
            ))
        })
    }

    /// Check if a sequence exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a sequence by name.
    pub fn remove(&mut self, name: &str) -> Option<MoveSequence> {
        let key = String::try_from(name).ok()?;
        self.sequences.remove(&key)
    }

    /// Get the number of registered sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Get an iterator over sequence names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(|s| s.as_str())
    }

    /// Get an iterator over sequences.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MoveSequence)> {
        self.sequences.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sequences that drive the given motor.
    pub fn for_motor<'a>(
        &'a self,
        motor_name: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a MoveSequence)> + 'a {
        self.iter()
            .filter(move |(_, sequence)| sequence.motor.as_str() == motor_name)
    }

    /// Clear all sequences.
    pub fn clear(&mut self) {
        self.sequences.clear();
    }
}

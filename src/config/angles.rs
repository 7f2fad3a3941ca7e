//! Angle table: named angular positions expressed in steps.

use core::fmt;

use heapless::{String, Vec};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, Error, Result, TableError};

use super::geometry::RevolutionGeometry;
use super::units::{Degrees, Steps};

/// Maximum number of entries in an angle table.
pub const MAX_POSITIONS: usize = 32;

/// One angle table entry as written in configuration.
///
/// Exactly one of `steps` or `degrees` must be given; degrees are rounded to the
/// nearest whole step when the table is built.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionEntry {
    /// Position name (max 32 chars).
    pub name: String<32>,

    /// Position in steps.
    #[serde(default)]
    pub steps: Option<Steps>,

    /// Position in degrees.
    #[serde(default)]
    pub degrees: Option<Degrees>,
}

/// A named position resolved to steps.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NamedAngle {
    /// Position name.
    pub name: String<32>,
    /// Step count from the zero reference.
    pub steps: Steps,
}

/// Ordered, immutable-once-built table of named positions.
///
/// Indexing is by position in the table; lookup by name is also supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AngleTable {
    entries: Vec<NamedAngle, MAX_POSITIONS>,
}

impl AngleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// The positions of the reference valve application at 3200 steps/rev:
    /// 0°, ~130°, 180°, ~210°, ~240° and 90°.
    pub fn reference() -> Self {
        let mut table = Self::new();
        for (name, steps) in [
            ("deg_0", 0),
            ("deg_130", 1156),
            ("deg_180", 1600),
            ("deg_210", 1866),
            ("deg_240", 2133),
            ("deg_90", 800),
        ] {
            let _ = table.push(name, Steps(steps));
        }
        table
    }

    /// Build a table from configuration entries.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry sets neither or both of `steps` and `degrees`,
    /// or if two entries share a name.
    pub fn from_entries(entries: &[PositionEntry], geometry: &RevolutionGeometry) -> Result<Self> {
        let mut table = Self::new();
        for entry in entries {
            let steps = match (entry.steps, entry.degrees) {
                (Some(steps), None) => steps,
                (None, Some(degrees)) => geometry.degrees_to_steps(degrees),
                _ => {
                    return Err(Error::Config(ConfigError::InvalidPositionEntry(
                        entry.name.clone(),
                    )))
                }
            };
            table.push(entry.name.as_str(), steps)?;
        }
        Ok(table)
    }

    /// Append a position.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, too long, or the table is full.
    pub fn push(&mut self, name: &str, steps: Steps) -> Result<()> {
        let name = String::try_from(name).map_err(|_| TableError::NameTooLong)?;
        if self.index_of(name.as_str()).is_some() {
            return Err(Error::Config(ConfigError::DuplicatePositionName(name)));
        }
        self.entries
            .push(NamedAngle { name, steps })
            .map_err(|_| Error::Table(TableError::Full))
    }

    /// Append a position given in degrees, rounded to the nearest step.
    pub fn push_degrees(
        &mut self,
        name: &str,
        degrees: Degrees,
        geometry: &RevolutionGeometry,
    ) -> Result<()> {
        self.push(name, geometry.degrees_to_steps(degrees))
    }

    /// Step count at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TableError::InvalidPosition` if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Result<Steps> {
        self.entries
            .get(index)
            .map(|entry| entry.steps)
            .ok_or(Error::Table(TableError::InvalidPosition {
                index,
                len: self.entries.len(),
            }))
    }

    /// Step count of the entry called `name`.
    pub fn by_name(&self, name: &str) -> Result<Steps> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_str() == name)
            .map(|entry| entry.steps)
            .ok_or_else(|| {
                Error::Table(TableError::UnknownName(
                    String::try_from(name).unwrap_or_default(),
                ))
            })
    }

    /// Index of the entry called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name.as_str() == name)
    }

    /// Resolve a position reference against this table.
    pub fn resolve(&self, position: &PositionRef) -> Result<Steps> {
        match position {
            PositionRef::Index(index) => self.get(*index),
            PositionRef::Name(name) => self.by_name(name.as_str()),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedAngle> {
        self.entries.iter()
    }
}

/// Reference to an angle table entry, by index or by name.
///
/// Deserializes from an integer (index) or a string (name).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PositionRef {
    /// Position in table order.
    Index(usize),
    /// Entry name.
    Name(String<32>),
}

impl From<usize> for PositionRef {
    fn from(index: usize) -> Self {
        PositionRef::Index(index)
    }
}

impl fmt::Display for PositionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionRef::Index(index) => write!(f, "#{}", index),
            PositionRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl<'de> Deserialize<'de> for PositionRef {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PositionRefVisitor;

        impl<'de> Visitor<'de> for PositionRefVisitor {
            type Value = PositionRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table index or a position name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> core::result::Result<Self::Value, E> {
                usize::try_from(v)
                    .map(PositionRef::Index)
                    .map_err(|_| E::custom("position index out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> core::result::Result<Self::Value, E> {
                usize::try_from(v)
                    .map(PositionRef::Index)
                    .map_err(|_| E::custom("position index must not be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<Self::Value, E> {
                String::try_from(v)
                    .map(PositionRef::Name)
                    .map_err(|_| E::custom("position name longer than 32 chars"))
            }
        }

        deserializer.deserialize_any(PositionRefVisitor)
    }
}

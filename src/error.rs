//! Error types for stepper-indexer.
//!
//! Provides unified error handling across configuration, angle tables, motor control,
//! and move sequences.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-indexer operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor operation error
    Motor(MotorError),
    /// Angle table lookup error
    Table(TableError),
    /// Move sequence error
    Sequence(SequenceError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Steps per revolution must be strictly positive
    InvalidStepsPerRevolution(i64),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Step pulse timing is unusable (pulse width must be > 0)
    InvalidStepTiming {
        /// Configured STEP high time in milliseconds
        pulse_high_ms: u32,
        /// Configured delay between pulses in milliseconds
        inter_step_delay_ms: u32,
    },
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Two angle table entries share a name
    DuplicatePositionName(heapless::String<32>),
    /// Angle table entry gives neither (or both) `steps` and `degrees`
    InvalidPositionEntry(heapless::String<32>),
    /// A required builder field was not provided
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Pin operation failed; the move was aborted
    PinError,
    /// Position is no longer trusted after a fault; re-home before moving
    PositionUnverified,
    /// Motor has no move in progress
    NotInitialized,
}

/// Angle table errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Index is outside the table
    InvalidPosition {
        /// Requested index
        index: usize,
        /// Number of entries in the table
        len: usize,
    },
    /// No entry carries this name
    UnknownName(heapless::String<32>),
    /// Position name longer than 32 chars
    NameTooLong,
    /// Table is at capacity
    Full,
}

/// Move sequence errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// Sequence references a motor absent from the configuration
    MotorNotFound {
        /// Sequence name
        sequence: heapless::String<32>,
        /// Referenced motor name
        motor: heapless::String<32>,
    },
    /// Sequence is meant for another motor
    WrongMotor {
        /// Motor the sequence targets
        expected: heapless::String<32>,
        /// Motor it was run on
        actual: heapless::String<32>,
    },
    /// Sequence name not found
    NotFound(heapless::String<32>),
    /// Sequence has no moves
    Empty,
    /// Too many moves
    TooManyMoves,
    /// Invalid sequence name or registry full
    InvalidName(heapless::String<64>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Table(e) => write!(f, "Angle table error: {}", e),
            Error::Sequence(e) => write!(f, "Sequence error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidStepTiming { pulse_high_ms, inter_step_delay_ms } => write!(
                f,
                "Invalid step timing: pulse {} ms, delay {} ms. Pulse width must be > 0",
                pulse_high_ms, inter_step_delay_ms
            ),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::DuplicatePositionName(name) => {
                write!(f, "Duplicate position name: '{}'", name)
            }
            ConfigError::InvalidPositionEntry(name) => write!(
                f,
                "Position '{}' must set exactly one of `steps` or `degrees`",
                name
            ),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::PositionUnverified => {
                write!(f, "Position unverified after a fault, re-home required")
            }
            MotorError::NotInitialized => write!(f, "No move in progress"),
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InvalidPosition { index, len } => {
                write!(f, "Invalid position {}: table has {} entries", index, len)
            }
            TableError::UnknownName(name) => write!(f, "Unknown position '{}'", name),
            TableError::NameTooLong => write!(f, "Position name too long (max 32 chars)"),
            TableError::Full => write!(f, "Angle table is full (max 32)"),
        }
    }
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::MotorNotFound { sequence, motor } => {
                write!(f, "Sequence '{}' references unknown motor '{}'", sequence, motor)
            }
            SequenceError::WrongMotor { expected, actual } => {
                write!(f, "Sequence is for motor '{}', not '{}'", expected, actual)
            }
            SequenceError::NotFound(name) => write!(f, "Sequence '{}' not found", name),
            SequenceError::Empty => write!(f, "Sequence has no moves"),
            SequenceError::TooManyMoves => write!(f, "Too many sequence moves (max 32)"),
            SequenceError::InvalidName(name) => {
                write!(f, "Invalid sequence name or configuration: {}", name)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<TableError> for Error {
    fn from(e: TableError) -> Self {
        Error::Table(e)
    }
}

impl From<SequenceError> for Error {
    fn from(e: SequenceError) -> Self {
        Error::Sequence(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for TableError {}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}

//! Error types for coordinate and route operations
//!
//! Numeric domain problems (NaN, out-of-range degrees) are never reported
//! here: the transformer propagates them as values. These errors cover
//! missing or malformed caller input and state-machine misuse.

use std::fmt;

/// Error classification for the conversion and simulation layers
#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// A required input was missing or malformed
    InvalidInput {
        field: String,
        reason: String,
    },
    /// A reference system name could not be recognised
    UnknownReferenceSystem {
        name: String,
    },
    /// Operation not allowed in the current run state
    InvalidState {
        operation: String,
        state: String,
    },
}

impl GeoError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        GeoError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_state(operation: &str, state: impl fmt::Display) -> Self {
        GeoError::InvalidState {
            operation: operation.to_string(),
            state: state.to_string(),
        }
    }
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidInput { field, reason } => {
                write!(f, "Invalid input '{}': {}", field, reason)
            }
            GeoError::UnknownReferenceSystem { name } => {
                write!(f, "Unknown reference system: '{}'", name)
            }
            GeoError::InvalidState { operation, state } => {
                write!(f, "Cannot {} while {}", operation, state)
            }
        }
    }
}

impl std::error::Error for GeoError {}

/// Result type for conversion and simulation operations
pub type GeoResult<T> = Result<T, GeoError>;

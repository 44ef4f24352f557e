//! Route storage error types

use crate::validation::error::GeoError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Rejected name or points
    InvalidInput { reason: String },
    /// Backing file could not be read or written
    Io { message: String },
    /// Stored data could not be encoded or decoded
    Serialization { message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidInput { reason } => write!(f, "Invalid route: {}", reason),
            StoreError::Io { message } => write!(f, "Route storage I/O error: {}", message),
            StoreError::Serialization { message } => {
                write!(f, "Route storage format error: {}", message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<GeoError> for StoreError {
    fn from(error: GeoError) -> Self {
        StoreError::InvalidInput {
            reason: error.to_string(),
        }
    }
}

/// Result type for route storage operations
pub type StoreResult<T> = Result<T, StoreError>;

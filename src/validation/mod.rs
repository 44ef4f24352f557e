//! Input validation and error types

pub mod data;
pub mod error;

pub use error::{GeoError, GeoResult};

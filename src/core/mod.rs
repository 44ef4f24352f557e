//! Core types and constants for coordinate conversion and route animation

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;

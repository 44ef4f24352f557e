//! Display helpers for routes and simulated runs

pub mod formatting;

pub use formatting::{
    format_coordinate, format_distance, format_duration, RunReport, RunReportFormatter,
};

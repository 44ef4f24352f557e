//! Datum conversion and route geometry

pub mod transform;
pub mod metrics;

pub use transform::{convert, convert_all, to_raw_from};
pub use metrics::{haversine_km, total_distance, RouteStats};

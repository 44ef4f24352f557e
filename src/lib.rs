//! Ghost-run geo toolkit
//!
//! Coordinate conversion between the raw satellite datum (WGS84), the
//! obfuscated national datum (GCJ02) and a commercial derivative (BD09),
//! together with route distance metrics, a frame-rate independent marker
//! animator and a simulated runner walking a stored route.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;
pub mod storage;

// Re-export commonly used types
pub use core::{Coordinate, ReferenceSystem, Route};
pub use algorithms::transform::{
    convert, convert_all, from_commercial, is_out_of_region, to_commercial, to_encrypted,
    to_raw, to_raw_from, to_raw_refined,
};
pub use algorithms::metrics::{haversine_km, interpolate_route, route_stats, total_distance, RouteStats};
pub use processing::animator::{AnimationState, AnimatorConfig, PositionAnimator};
pub use processing::runner::{RouteRunner, RunConfig, RunStats, RunStatus};
pub use validation::error::{GeoError, GeoResult};
pub use utils::config::{ConfigError, ConfigurationManager, SimulationConfig};
pub use api::{format_coordinate, format_distance, format_duration, RunReport, RunReportFormatter};
pub use storage::{
    InMemoryRouteStore, JsonFileRouteStore, RouteStore, SavedRoute, StoreError, StoreResult,
};

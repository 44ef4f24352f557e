//! Named route persistence
//!
//! Routes live in one logical collection keyed by name. Saving an existing
//! name replaces it in place; names are the only uniqueness constraint.

pub mod error;
pub mod json_file;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileRouteStore;
pub use memory::InMemoryRouteStore;

use crate::core::Coordinate;
use crate::validation::data::{validate_coordinate, validate_route_name};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name under which the most recently edited route is kept
pub const LAST_ROUTE_NAME: &str = "last_route";

/// A stored route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoute {
    pub name: String,
    pub points: Vec<Coordinate>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl SavedRoute {
    pub fn new(name: &str, points: &[Coordinate]) -> StoreResult<Self> {
        validate_route_name(name)?;
        points.iter().try_for_each(validate_coordinate)?;
        Ok(Self {
            name: name.to_string(),
            points: points.to_vec(),
            created_at: Utc::now(),
        })
    }
}

/// Storage backend for named routes
pub trait RouteStore {
    /// All stored routes in insertion order
    fn list(&self) -> StoreResult<Vec<SavedRoute>>;

    /// Insert or replace the route called `name`
    fn save(&mut self, name: &str, points: &[Coordinate]) -> StoreResult<()>;

    /// Points of the route called `name`, if any
    fn load(&self, name: &str) -> StoreResult<Option<Vec<Coordinate>>>;

    /// Remove the route called `name`; missing names are ignored
    fn delete(&mut self, name: &str) -> StoreResult<()>;

    /// Keep `points` as the last edited route
    fn save_last_route(&mut self, points: &[Coordinate]) -> StoreResult<()> {
        self.save(LAST_ROUTE_NAME, points)
    }
}

/// Replace the route with the same name, or append it
pub(crate) fn upsert(routes: &mut Vec<SavedRoute>, route: SavedRoute) {
    match routes.iter_mut().find(|r| r.name == route.name) {
        Some(existing) => *existing = route,
        None => routes.push(route),
    }
}

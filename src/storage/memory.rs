//! In-process route store for tests and hosts that persist elsewhere

use crate::core::Coordinate;
use crate::storage::{upsert, RouteStore, SavedRoute, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryRouteStore {
    routes: Vec<SavedRoute>,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteStore for InMemoryRouteStore {
    fn list(&self) -> StoreResult<Vec<SavedRoute>> {
        Ok(self.routes.clone())
    }

    fn save(&mut self, name: &str, points: &[Coordinate]) -> StoreResult<()> {
        let route = SavedRoute::new(name, points)?;
        upsert(&mut self.routes, route);
        Ok(())
    }

    fn load(&self, name: &str) -> StoreResult<Option<Vec<Coordinate>>> {
        Ok(self
            .routes
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.points.clone()))
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        self.routes.retain(|r| r.name != name);
        Ok(())
    }
}

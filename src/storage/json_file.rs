//! Route store backed by a single JSON file
//!
//! The file holds a JSON array of routes. Older files that contain one
//! route object instead of an array are read as a one-element list and
//! rewritten as an array on the next save.

use crate::core::Coordinate;
use crate::storage::{upsert, RouteStore, SavedRoute, StoreError, StoreResult};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRoutes {
    Many(Vec<SavedRoute>),
    One(SavedRoute),
}

#[derive(Debug, Clone)]
pub struct JsonFileRouteStore {
    path: PathBuf,
}

impl JsonFileRouteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that new contents are written to before the swap
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_all(&self) -> StoreResult<Vec<SavedRoute>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    message: format!("Failed to read '{}': {}", self.path.display(), e),
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: StoredRoutes =
            serde_json::from_str(&content).map_err(|e| StoreError::Serialization {
                message: format!("Failed to parse '{}': {}", self.path.display(), e),
            })?;

        Ok(match stored {
            StoredRoutes::Many(routes) => routes,
            StoredRoutes::One(route) => {
                warn!(
                    "Route file '{}' holds a single route object; treating it as a list",
                    self.path.display()
                );
                vec![route]
            }
        })
    }

    fn write_all(&self, routes: &[SavedRoute]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                    message: format!("Failed to create '{}': {}", parent.display(), e),
                })?;
            }
        }

        let content = serde_json::to_string_pretty(routes).map_err(|e| StoreError::Serialization {
            message: format!("Failed to serialize routes: {}", e),
        })?;

        // Replace the file in one step so a failed write keeps the old routes
        let staging = self.staging_path();
        fs::write(&staging, content).map_err(|e| StoreError::Io {
            message: format!("Failed to write '{}': {}", staging.display(), e),
        })?;
        fs::rename(&staging, &self.path).map_err(|e| StoreError::Io {
            message: format!("Failed to replace '{}': {}", self.path.display(), e),
        })?;

        debug!("Wrote {} routes to {}", routes.len(), self.path.display());
        Ok(())
    }
}

impl RouteStore for JsonFileRouteStore {
    fn list(&self) -> StoreResult<Vec<SavedRoute>> {
        self.read_all()
    }

    fn save(&mut self, name: &str, points: &[Coordinate]) -> StoreResult<()> {
        let route = SavedRoute::new(name, points)?;
        let mut routes = self.read_all()?;
        upsert(&mut routes, route);
        self.write_all(&routes)
    }

    fn load(&self, name: &str) -> StoreResult<Option<Vec<Coordinate>>> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|r| r.name == name)
            .map(|r| r.points))
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        let mut routes = self.read_all()?;
        let before = routes.len();
        routes.retain(|r| r.name != name);
        if routes.len() == before {
            return Ok(());
        }
        self.write_all(&routes)
    }
}

use crate::core::ReferenceSystem;
use crate::processing::animator::AnimatorConfig;
use crate::processing::runner::{RunConfig, MAX_SPEED_KMH, MIN_UPDATE_INTERVAL_MS};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for a simulated run and its on-screen animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Marker smoothing parameters
    pub animator: AnimatorConfig,
    /// Runner pace and laps
    pub run: RunConfig,
    /// System the map tiles expect; rendered positions are converted to it
    pub display_system: ReferenceSystem,
    /// System route waypoints are drawn and stored in
    pub route_system: ReferenceSystem,
    /// Where named routes are kept (JSON file)
    pub route_store_path: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            animator: AnimatorConfig::default(),
            run: RunConfig::default(),
            display_system: ReferenceSystem::Encrypted,
            route_system: ReferenceSystem::Encrypted,
            route_store_path: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

/// Owns the active [`SimulationConfig`] and its backing file
pub struct ConfigurationManager {
    config: SimulationConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replace the whole configuration after validation
    pub fn update_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        let validation = self.validate(&config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SimulationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        let validation = self.validate(&config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        for warning in &validation.warnings {
            log::warn!("{}: {}", path_str, warning);
        }

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        info!("Loaded simulation config from {}", self.config_file_path.as_deref().unwrap_or_default());
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            }
        })?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::IoError {
                    message: format!("Failed to create '{}': {}", parent.display(), e),
                })?;
            }
        }

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = self.config_file_path.clone() {
            self.save_to_file(path)
        } else {
            Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            })
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Update running speed, returning the previous value
    pub fn set_speed(&mut self, speed_kmh: f64) -> Result<f64, ConfigError> {
        let old_value = self.config.run.speed_kmh;

        if !(speed_kmh > 0.0 && speed_kmh <= MAX_SPEED_KMH) {
            return Err(ConfigError::InvalidParameter {
                parameter: "speed_kmh".to_string(),
                value: speed_kmh.to_string(),
                reason: format!("Speed must be between 0 and {} km/h", MAX_SPEED_KMH),
            });
        }

        self.config.run.speed_kmh = speed_kmh;
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn get_speed(&self) -> f64 {
        self.config.run.speed_kmh
    }

    /// Update position update interval, returning the previous value
    pub fn set_update_interval(&mut self, interval_ms: u64) -> Result<u64, ConfigError> {
        let old_value = self.config.run.update_interval_ms;

        if interval_ms < MIN_UPDATE_INTERVAL_MS {
            return Err(ConfigError::InvalidParameter {
                parameter: "update_interval_ms".to_string(),
                value: interval_ms.to_string(),
                reason: format!("Update interval cannot be below {} ms", MIN_UPDATE_INTERVAL_MS),
            });
        }

        self.config.run.update_interval_ms = interval_ms;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Update the marker smoothing factor, returning the previous value
    pub fn set_lerp_factor(&mut self, lerp_factor: f64) -> Result<f64, ConfigError> {
        let old_value = self.config.animator.lerp_factor;

        if !(lerp_factor > 0.0 && lerp_factor <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "lerp_factor".to_string(),
                value: lerp_factor.to_string(),
                reason: "Lerp factor must be in (0, 1]".to_string(),
            });
        }

        self.config.animator.lerp_factor = lerp_factor;
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn set_display_system(&mut self, system: ReferenceSystem) -> ReferenceSystem {
        let old_value = self.config.display_system;
        self.config.display_system = system;
        self.is_modified = true;
        old_value
    }

    /// Check every parameter, collecting all errors and warnings
    pub fn validate(&self, config: &SimulationConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(e) = config.run.validate() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "run".to_string(),
                value: format!("{:?}", config.run),
                reason: e.to_string(),
            });
        }

        let animator = &config.animator;
        if let Err(e) = animator.validate() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "animator".to_string(),
                value: format!("{:?}", animator),
                reason: e.to_string(),
            });
        }

        if animator.lerp_factor == 1.0 {
            warnings.push("Lerp factor 1.0 disables marker smoothing".to_string());
        }
        if animator.min_tick_interval_ms >= config.run.update_interval_ms {
            warnings.push(format!(
                "Animation tick interval {} ms is not shorter than the position update interval {} ms",
                animator.min_tick_interval_ms, config.run.update_interval_ms
            ));
        }
        if config.run.loop_count == 0 {
            warnings.push("Loop count 0 runs until stopped".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.run.speed_kmh, 8.0);
        assert_eq!(config.run.update_interval_ms, 1000);
        assert_eq!(config.animator.lerp_factor, 0.15);
        assert_eq!(config.animator.min_tick_interval_ms, 16);
        assert_eq!(config.display_system, ReferenceSystem::Encrypted);

        let manager = ConfigurationManager::new();
        let result = manager.validate(&config);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_invalid_config_collects_errors() {
        let manager = ConfigurationManager::new();
        let mut config = SimulationConfig::default();
        config.run.speed_kmh = 45.0;
        config.animator.lerp_factor = 0.0;
        config.animator.settle_epsilon = -1.0;

        let result = manager.validate(&config);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_tiny_route_spacing_rejected_on_load() {
        let path = std::env::temp_dir()
            .join(format!("ghostrun-geo-config-spacing-{}", std::process::id()))
            .join("config.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        let mut value = serde_json::to_value(SimulationConfig::default()).unwrap();
        value["run"]["route_spacing_km"] = serde_json::json!(1e-9);
        fs::write(&path, value.to_string()).unwrap();

        let result = ConfigurationManager::from_file(&path);
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_config_without_route_variation_uses_default() {
        let mut value = serde_json::to_value(SimulationConfig::default()).unwrap();
        value["run"].as_object_mut().unwrap().remove("route_variation_m");
        let config: SimulationConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.run.route_variation_m, 3.0);
    }

    #[test]
    fn test_runtime_adjustment() {
        let mut manager = ConfigurationManager::new();

        let old_speed = manager.set_speed(12.0).unwrap();
        assert_eq!(old_speed, 8.0);
        assert_eq!(manager.get_speed(), 12.0);
        assert!(manager.is_modified());

        assert!(manager.set_speed(0.0).is_err());
        assert!(manager.set_speed(30.5).is_err());
        assert_eq!(manager.get_speed(), 12.0);

        assert_eq!(manager.set_update_interval(500).unwrap(), 1000);
        assert!(manager.set_update_interval(99).is_err());

        assert_eq!(manager.set_lerp_factor(0.3).unwrap(), 0.15);
        assert!(manager.set_lerp_factor(1.5).is_err());

        assert_eq!(manager.set_display_system(ReferenceSystem::Commercial), ReferenceSystem::Encrypted);
    }

    #[test]
    fn test_update_config_rejects_invalid() {
        let mut manager = ConfigurationManager::new();
        let mut config = SimulationConfig::default();
        config.run.update_interval_ms = 10;

        assert!(matches!(
            manager.update_config(config),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_warnings() {
        let manager = ConfigurationManager::new();
        let mut config = SimulationConfig::default();
        config.animator.lerp_factor = 1.0;
        config.run.loop_count = 0;

        let result = manager.validate(&config);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_config_serialization() {
        let mut manager = ConfigurationManager::new();
        manager.set_speed(10.0).unwrap();
        manager.set_display_system(ReferenceSystem::Commercial);

        let temp_path: PathBuf = std::env::temp_dir()
            .join(format!("ghostrun-geo-config-{}", std::process::id()))
            .join("config.json");

        manager.save_to_file(&temp_path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();
        assert_eq!(loaded.get_config(), manager.get_config());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&temp_path).unwrap()).unwrap();
        assert_eq!(raw["display_system"], "BD09");
        assert_eq!(raw["run"]["speed_kmh"], 10.0);

        let _ = fs::remove_dir_all(temp_path.parent().unwrap());
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigurationManager::from_file("/nonexistent/ghostrun/config.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}

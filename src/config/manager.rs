use super::{sampling::SamplingConfig, selection::SelectionConfig, traits::ConfigSection};
use crate::error::PipegenError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchConfig {
    pub sampling: SamplingConfig,
    pub selection: SelectionConfig,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), PipegenError> {
        self.sampling.validate()?;
        self.selection.validate()?;
        Ok(())
    }
}

/// Shared, validated configuration. Files are TOML by default; a `.json`
/// extension switches to JSON.
pub struct ConfigManager {
    config: Arc<RwLock<SearchConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(SearchConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipegenError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PipegenError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: SearchConfig = if is_json(path) {
            serde_json::from_str(&contents)
                .map_err(|e| PipegenError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            toml::from_str(&contents)
                .map_err(|e| PipegenError::Configuration(format!("Failed to parse config: {}", e)))?
        };

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipegenError> {
        let path = path.as_ref();
        let config = self.config.read().unwrap();

        let serialized = if is_json(path) {
            serde_json::to_string_pretty(&*config)
                .map_err(|e| PipegenError::Configuration(format!("Failed to serialize: {}", e)))?
        } else {
            toml::to_string_pretty(&*config)
                .map_err(|e| PipegenError::Configuration(format!("Failed to serialize: {}", e)))?
        };

        std::fs::write(path, serialized)
            .map_err(|e| PipegenError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> SearchConfig {
        self.config.read().unwrap().clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), PipegenError>
    where
        F: FnOnce(&mut SearchConfig),
    {
        let mut config = self.config.write().unwrap();
        f(&mut config);
        config.validate()?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::OptimizationDirection;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_update_rejects_invalid_values() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.selection.selection_fraction = 2.0);
        assert!(result.is_err());

        let result = manager.update(|c| {
            c.selection.selection_fraction = 0.3;
            c.sampling.seed = Some(7);
        });
        assert!(result.is_ok());
        assert_eq!(manager.get().sampling.seed, Some(7));
    }

    #[test]
    fn test_toml_roundtrip() {
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.sampling.max_iterations = 25;
                c.selection.directions = vec![
                    OptimizationDirection::Maximize,
                    OptimizationDirection::Minimize,
                ];
            })
            .unwrap();

        let path = std::env::temp_dir().join("pipegen_config_test.toml");
        manager.save_to_file(&path).unwrap();

        let restored = ConfigManager::new();
        restored.load_from_file(&path).unwrap();
        let config = restored.get();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.sampling.max_iterations, 25);
        assert_eq!(
            config.selection.directions,
            vec![
                OptimizationDirection::Maximize,
                OptimizationDirection::Minimize,
            ]
        );
    }
}

//! Engine configuration loaded from an optional TOML file.

use crate::content::{ContentProvider, OfflineContentProvider, UnavailableContentProvider};
use crate::errors::ConfigError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Which content provider backs quizzes, zones and hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Offline,
    Unavailable,
}

/// All fields are optional in the file; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pause before the enemy acts, in milliseconds.
    pub enemy_think_delay_ms: u64,
    /// Auto-repeat interval for held movement keys, in milliseconds.
    pub auto_repeat_ms: u64,
    /// Fixed seed for every random roll; OS entropy when absent.
    pub rng_seed: Option<u64>,
    pub provider: ProviderKind,
    /// JSON question bank replacing the built-in one.
    pub question_bank: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enemy_think_delay_ms: 1500,
            auto_repeat_ms: 150,
            rng_seed: None,
            provider: ProviderKind::Offline,
            question_bank: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!("Configuration loaded from '{}'", path.display());
        Ok(config)
    }

    pub fn enemy_think_delay(&self) -> Duration {
        Duration::from_millis(self.enemy_think_delay_ms)
    }

    pub fn auto_repeat(&self) -> Duration {
        Duration::from_millis(self.auto_repeat_ms)
    }

    /// Build the configured provider. The offline bank seed follows
    /// `rng_seed` so seeded runs are fully reproducible.
    pub fn build_provider(&self) -> Result<Arc<dyn ContentProvider>, ConfigError> {
        match self.provider {
            ProviderKind::Offline => {
                let seed = self.rng_seed.unwrap_or_else(rand::random);
                let provider = match &self.question_bank {
                    Some(path) => {
                        let json = fs::read_to_string(path)?;
                        OfflineContentProvider::from_json_bank(&json, seed)?
                    }
                    None => OfflineContentProvider::new(seed)?,
                };
                Ok(Arc::new(provider))
            }
            ProviderKind::Unavailable => {
                warn!("Content provider disabled; every request will use its fallback");
                Ok(Arc::new(UnavailableContentProvider))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.enemy_think_delay(), Duration::from_millis(1500));
        assert_eq!(config.auto_repeat(), Duration::from_millis(150));
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            enemy_think_delay_ms = 0
            rng_seed = 42
            provider = "unavailable"
            "#,
        )
        .unwrap();
        assert_eq!(config.enemy_think_delay_ms, 0);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.provider, ProviderKind::Unavailable);
        assert_eq!(config.auto_repeat_ms, 150);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let result = EngineConfig::from_toml_str("provider = 7");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

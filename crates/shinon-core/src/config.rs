//! Configuration loading and typed config structures for the Shinon console.
//!
//! The application configuration lives in `shinon-config.yaml` next to the
//! binary. This module defines strongly-typed structs that mirror the YAML
//! structure; every section and field has a default, so an empty file (or
//! no file at all) yields a working setup. Economy tuning is not part of
//! this file -- it belongs to the static catalog.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// New-game settings.
    #[serde(default)]
    pub game: GameConfig,

    /// Save file location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Catalog override.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Console kernel settings.
    #[serde(default)]
    pub kernel: KernelConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for file locations:
    /// - `SHINON_DB_PATH` overrides `storage.database_path`
    /// - `SHINON_LOG_DIR` overrides `logging.directory`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply environment overrides for file locations.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("SHINON_DB_PATH").ok(),
            std::env::var("SHINON_LOG_DIR").ok(),
        );
    }

    fn apply_overrides(&mut self, db_path: Option<String>, log_dir: Option<String>) {
        if let Some(val) = db_path.filter(|v| !v.is_empty()) {
            self.storage.database_path = PathBuf::from(val);
        }
        if let Some(val) = log_dir.filter(|v| !v.is_empty()) {
            self.logging.directory = PathBuf::from(val);
        }
    }
}

/// New-game settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Seed used when the operator does not pick one.
    #[serde(default = "default_seed")]
    pub default_seed: u64,

    /// Narration language code (`en` or `de`) for new saves.
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_seed: default_seed(),
            locale: default_locale(),
        }
    }
}

/// Save file location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the `SQLite` save file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for the structured log file.
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Write JSON lines instead of plain text.
    #[serde(default = "default_true")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            json: true,
        }
    }
}

/// Optional catalog override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Path of a catalog YAML that replaces the built-in one.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Console kernel settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KernelConfig {
    /// Number of recent actions the kernel remembers.
    #[serde(default = "default_memory_limit")]
    pub memory_limit: usize,

    /// Minimum turns between unprompted intel hints.
    #[serde(default = "default_auto_intel_interval")]
    pub auto_intel_interval: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            memory_limit: default_memory_limit(),
            auto_intel_interval: default_auto_intel_interval(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

fn default_locale() -> String {
    "en".to_owned()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("shinon.sqlite3")
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

const fn default_true() -> bool {
    true
}

const fn default_memory_limit() -> usize {
    12
}

const fn default_auto_intel_interval() -> u64 {
    5
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.game.default_seed, 42);
        assert_eq!(config.game.locale, "en");
        assert_eq!(config.storage.database_path, PathBuf::from("shinon.sqlite3"));
        assert_eq!(config.kernel.memory_limit, 12);
        assert_eq!(config.kernel.auto_intel_interval, 5);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
game:
  default_seed: 777
  locale: de
storage:
  database_path: /tmp/save.sqlite3
logging:
  level: debug
  directory: /tmp/logs
  json: false
catalog:
  path: custom-catalog.yaml
kernel:
  memory_limit: 4
  auto_intel_interval: 3
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.game.default_seed, 777);
        assert_eq!(config.game.locale, "de");
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/save.sqlite3"));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
        assert_eq!(config.catalog.path, Some(PathBuf::from("custom-catalog.yaml")));
        assert_eq!(config.kernel.memory_limit, 4);
        assert_eq!(config.kernel.auto_intel_interval, 3);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = SimulationConfig::parse("game:\n  default_seed: 9\n").unwrap();
        assert_eq!(config.game.default_seed, 9);
        assert_eq!(config.game.locale, "en");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn shipped_config_parses() {
        let yaml = include_str!("../../../shinon-config.yaml");
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.game.default_seed, 42);
        assert!(config.logging.json);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(SimulationConfig::parse("  \n").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            SimulationConfig::parse("game: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn overrides_replace_paths() {
        let mut config = SimulationConfig::default();
        config.apply_overrides(Some("/data/s.sqlite3".to_owned()), Some(String::new()));
        assert_eq!(config.storage.database_path, PathBuf::from("/data/s.sqlite3"));
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
    }
}

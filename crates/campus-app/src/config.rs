//! Configuration file parsing
//!
//! One TOML file configures the whole process:
//!
//! ```toml
//! [store]
//! backend = "sqlite"
//! path = "campus.db"
//!
//! [logging]
//! level = "info,campus_relationship=debug"
//! format = "compact"
//! ansi = false
//!
//! [engine]
//! allow_nested_groups = true
//!
//! [[engine.relationship_types]]
//! uri = "http://schooltool.org/ns/teaching"
//! allow_self = true
//!
//! [composer]
//! check_peer_objects = true
//! ```
//!
//! Every table and field is optional.

use campus_relationship::EngineConfig;
use campus_schedule::ComposerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field has an unusable value
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Where link sets and objects are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In process memory, lost on exit
    Memory,

    /// SQLite database file
    #[default]
    Sqlite,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage backend
    /// Default: sqlite
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file (sqlite only); `":memory:"` for a throwaway database
    /// Default: "campus.db"
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("campus.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    /// In-memory storage
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// SQLite storage in the given file
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: path.into(),
        }
    }
}

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default tracing-subscriber format
    #[default]
    Full,

    /// Shorter single-line format
    Compact,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives; `RUST_LOG` overrides them
    /// Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line layout
    /// Default: full
    #[serde(default)]
    pub format: LogFormat,

    /// Colour output
    /// Default: true
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ansi() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            ansi: default_ansi(),
        }
    }
}

/// Configuration of the whole process
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Relationship engine
    #[serde(default)]
    pub engine: EngineConfig,

    /// Schedule composer
    #[serde(default)]
    pub composer: ComposerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory storage, defaults otherwise; for tests and embedding
    pub fn in_memory() -> Self {
        Self {
            store: StoreConfig::memory(),
            ..Self::default()
        }
    }

    /// Check values TOML parsing cannot
    ///
    /// URIs in `[engine]` and `[composer]` are checked later, against the
    /// registry, when the application is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Sqlite && self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "store.path".to_string(),
                reason: "an sqlite store needs a path".to_string(),
            });
        }
        EnvFilter::try_new(&self.logging.level).map_err(|e| ConfigError::Invalid {
            field: "logging.level".to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

//! Campus Application
//!
//! Wires the registry, relationship engine, schedule composer and store
//! together from one TOML configuration file, and installs logging.
//!
//! # Examples
//!
//! ```
//! use campus_app::{App, AppConfig};
//!
//! let config = AppConfig::from_toml_str(r#"
//!     [store]
//!     backend = "memory"
//!
//!     [engine]
//!     allow_nested_groups = true
//! "#).unwrap();
//!
//! let app = App::from_config(&config).unwrap();
//! assert!(app.engine().config().allow_nested_groups);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod app;
pub mod config;
mod error;
pub mod logging;

pub use app::{App, AppStore};
pub use config::{AppConfig, ConfigError, LogFormat, LoggingConfig, StoreBackend, StoreConfig};
pub use error::{AppError, Result};
pub use logging::init_logging;

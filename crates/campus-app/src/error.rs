//! Error types for the application layer

use crate::config::ConfigError;
use campus_domain::RegistryError;
use campus_relationship::RelationshipError;
use campus_schedule::ScheduleError;
use campus_store::StoreError;
use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the application layer
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The URI registry could not be built
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Relationship error
    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    /// Schedule error
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

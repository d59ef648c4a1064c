//! Error types for relationship operations

use campus_domain::{LinkSetError, ObjectRef, SchemaError, Uri};
use thiserror::Error;

/// Errors that can occur during relationship operations
#[derive(Error, Debug)]
pub enum RelationshipError {
    /// The relationship already exists on at least one side
    #[error("Relationship {rel_type} between {first} and {second} already exists")]
    DuplicateRelationship {
        /// Type of the relationship
        rel_type: Uri,
        /// First participant
        first: ObjectRef,
        /// Second participant
        second: ObjectRef,
    },

    /// At least one half of the relationship is missing
    #[error("No relationship {rel_type} between {first} and {second}")]
    NoSuchRelationship {
        /// Type of the relationship
        rel_type: Uri,
        /// First participant
        first: ObjectRef,
        /// Second participant
        second: ObjectRef,
    },

    /// A constraint vetoed the operation
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// An object was related to itself without permission
    #[error("{object} cannot be related to itself by {rel_type}")]
    SelfRelationship {
        /// Type of the relationship
        rel_type: Uri,
        /// The object on both ends
        object: ObjectRef,
    },

    /// Role names did not match the schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A link set rejected a mutation
    #[error("Link set error: {0}")]
    LinkSet(#[from] LinkSetError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

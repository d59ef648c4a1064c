//! Campus Relationship Engine
//!
//! Typed, bidirectional relationships between campus objects, kept as
//! matched pairs of links in each participant's link set.
//!
//! # Overview
//!
//! - **Relate / unrelate**: add or remove both halves of a relationship in
//!   one store commit, rejecting duplicates and missing halves
//! - **Teardown**: `unrelate_all` and the `delete_object` hook remove every
//!   relationship of an object, skipping mirrors that are already gone
//! - **Queries**: related objects by role and type, all links of an object,
//!   and [`RelationshipInfo`] views carrying extra information
//! - **Schemas and properties**: [`SchemaExt`] addresses roles by name,
//!   [`BoundRelationshipProperty`] exposes e.g. the members of a group
//! - **Constraints and listeners**: checks that may veto a change before
//!   it is written, and observers told about every change
//!
//! # Usage
//!
//! ```
//! use campus_domain::{schema, Group, HasRelationshipLinks, Person, Registry};
//! use campus_relationship::{BoundRelationshipProperty, RelationshipEngine, SchemaExt};
//! use campus_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = RelationshipEngine::default_config(Arc::new(Registry::standard()?));
//! let mut store = MemoryStore::new();
//! let (ona, choir) = (Person::new("Ona"), Group::new("Choir"));
//!
//! schema::MEMBERSHIP.link(
//!     &mut engine,
//!     &mut store,
//!     [("member", ona.object_ref()), ("group", choir.object_ref())],
//!     None,
//! )?;
//!
//! let members = BoundRelationshipProperty::new(&Group::MEMBERS, &store, &choir);
//! assert!(members.contains(ona.id)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use campus_relationship::EngineConfig;
//!
//! // Default: built-in constraints, flat groups
//! let config = EngineConfig::default();
//!
//! // Nested: groups may contain groups, cycles rejected
//! let config = EngineConfig::nested_groups();
//!
//! // Permissive: no constraints, for pre-validated bulk loads
//! let config = EngineConfig::permissive();
//! ```
//!
//! # Configuration
//!
//! The engine can be configured via TOML:
//!
//! ```toml
//! [engine]
//! enforce_constraints = true
//! allow_nested_groups = false
//! log_events = true
//!
//! [[engine.relationship_types]]
//! uri = "http://schooltool.org/ns/teaching"
//! allow_self = true
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
pub mod constraints;
mod engine;
mod error;
pub mod listener;
mod metrics;
mod property;
mod query;
mod schema;

pub use config::{EngineConfig, RelationshipTypeConfig};
pub use constraints::{
    standard_constraints, ConstraintResult, CourseSectionsConstraint, InstructionConstraint, MembershipConstraint,
    RelationshipConstraint,
};
pub use engine::RelationshipEngine;
pub use error::RelationshipError;
pub use listener::{EventLog, RelationshipListener, TracingListener};
pub use metrics::EngineMetrics;
pub use property::BoundRelationshipProperty;
pub use query::{iter_links, related_objects, relationships, RelatedObjects, RelationshipInfo};
pub use schema::SchemaExt;

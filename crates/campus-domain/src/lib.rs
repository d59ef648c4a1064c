//! Campus Domain Layer
//!
//! Value objects and boundary traits for the campus relationship graph.
//! This crate depends on nothing but `uuid`; storage, the relate/unrelate
//! engine and schedule composition live in other crates.
//!
//! ## Key Concepts
//!
//! - **Uri**: an inert, comparable identifier of a relationship type or role
//! - **Link**: one directed half of a relationship, owned by one object
//! - **LinkSet**: every link an object owns, unique by (type, role, target)
//! - **RelationshipSchema**: a relationship type bound to two named roles
//! - **Registry**: URIs, schemas and per-type policies, built once at startup
//!
//! ## Architecture
//!
//! - Objects are addressed by [`ObjectRef`] (id + kind tag), never owned
//! - Link sets live in a side table behind [`traits::LinkStore`]
//! - Every error type is hand written; no error crates here

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod event;
pub mod link;
pub mod linkset;
pub mod object;
pub mod registry;
pub mod schema;
pub mod traits;
pub mod uri;
pub mod uris;

// Re-exports for convenience
pub use entity::{Course, Group, HasRelationshipLinks, Person, RelationshipProperty, Resource, Section};
pub use event::{RelationshipEvent, RelationshipEventKind, RelationshipMatch};
pub use link::{Link, LinkKey};
pub use linkset::{LinkSet, LinkSetError};
pub use object::{ObjectId, ObjectKind, ObjectRef};
pub use registry::{Registry, RegistryError, RelationshipTypePolicy, UriRegistry};
pub use schema::{Participant, RelationshipSchema, SchemaError};
pub use traits::{LinkReader, LinkStore, ObjectStore};
pub use uri::{looks_like_a_uri, Uri, UriError};

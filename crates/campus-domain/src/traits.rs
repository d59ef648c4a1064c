//! Trait definitions for the storage collaborator
//!
//! The relationship engine never keeps link sets itself. It reads them
//! through these traits and hands back every modified set in a single
//! [`LinkStore::commit`] call, which implementations must apply all or
//! nothing.

use crate::{LinkSet, ObjectId, ObjectRef};
use std::fmt::Display;

/// Keyed storage of link sets
///
/// Implemented by the infrastructure layer (campus-store)
pub trait LinkStore {
    /// Error type for store operations
    type Error;

    /// The link set of an object, or an empty one if none was stored yet
    fn link_set(&self, owner: ObjectId) -> Result<LinkSet, Self::Error>;

    /// Replace the stored link sets with the given ones, atomically
    fn commit(&mut self, sets: Vec<LinkSet>) -> Result<(), Self::Error>;
}

/// Storage of the objects themselves
///
/// Link targets are weak references: a link may outlive its target, and
/// [`ObjectStore::object`] is how callers find out.
pub trait ObjectStore: LinkStore {
    /// Record an object
    fn insert_object(&mut self, object: ObjectRef) -> Result<(), Self::Error>;

    /// Look an object up by id
    fn object(&self, id: ObjectId) -> Result<Option<ObjectRef>, Self::Error>;

    /// Remove an object and its link set, returning whether it existed
    fn remove_object(&mut self, id: ObjectId) -> Result<bool, Self::Error>;
}

/// Object-safe read access to link sets
///
/// Used by constraints that need to look beyond the two participants, e.g.
/// to detect membership cycles.
pub trait LinkReader {
    /// The link set of an object
    fn read_links(&self, owner: ObjectId) -> Result<LinkSet, String>;
}

impl<S> LinkReader for S
where
    S: LinkStore,
    S::Error: Display,
{
    fn read_links(&self, owner: ObjectId) -> Result<LinkSet, String> {
        self.link_set(owner).map_err(|e| e.to_string())
    }
}

//! In-memory side table of objects and link sets

use crate::StoreError;
use campus_domain::{LinkSet, LinkStore, ObjectId, ObjectRef, ObjectStore};
use std::collections::HashMap;
use tracing::debug;

/// HashMap-based implementation of [`LinkStore`] and [`ObjectStore`]
///
/// The sets handed to a commit replace the stored ones,
/// and empty sets are dropped from the table. Commits are atomic because
/// they cannot fail half way, except when the store is read-only, in which
/// case nothing is written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<ObjectId, ObjectRef>,
    links: HashMap<ObjectId, LinkSet>,
    read_only: bool,
    commits: usize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse (or accept again) every write
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of successful commits so far
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Total number of stored links (both halves of every relationship)
    pub fn link_count(&self) -> usize {
        self.links.values().map(LinkSet::len).sum()
    }

    /// Number of stored objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

impl LinkStore for MemoryStore {
    type Error = StoreError;

    fn link_set(&self, owner: ObjectId) -> Result<LinkSet, Self::Error> {
        Ok(self.links.get(&owner).cloned().unwrap_or_else(|| LinkSet::new(owner)))
    }

    fn commit(&mut self, sets: Vec<LinkSet>) -> Result<(), Self::Error> {
        self.check_writable()?;
        let count = sets.len();
        for set in sets {
            if set.is_empty() {
                self.links.remove(&set.owner());
            } else {
                self.links.insert(set.owner(), set);
            }
        }
        self.commits += 1;
        debug!(sets = count, "Committed link sets");
        Ok(())
    }
}

impl ObjectStore for MemoryStore {
    fn insert_object(&mut self, object: ObjectRef) -> Result<(), Self::Error> {
        self.check_writable()?;
        self.objects.insert(object.id, object);
        Ok(())
    }

    fn object(&self, id: ObjectId) -> Result<Option<ObjectRef>, Self::Error> {
        Ok(self.objects.get(&id).copied())
    }

    fn remove_object(&mut self, id: ObjectId) -> Result<bool, Self::Error> {
        self.check_writable()?;
        self.links.remove(&id);
        Ok(self.objects.remove(&id).is_some())
    }
}

//! Read-through views of an object's relationships

use crate::query::{related_by_roles, relationships_by_roles, RelatedObjects, RelationshipInfo};
use crate::RelationshipError;
use campus_domain::{HasRelationshipLinks, LinkStore, ObjectId, ObjectRef, RelationshipProperty};
use std::fmt::Display;

/// A [`RelationshipProperty`] bound to one object and a store
///
/// Every call reads the current link set; nothing is cached. Only links in
/// which the owner plays the property's own role count. There are no
/// mutating methods: relationships change only through the engine.
///
/// # Examples
///
/// ```
/// use campus_domain::Group;
/// use campus_relationship::BoundRelationshipProperty;
/// use campus_store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let group = Group::new("Choir");
/// let members = BoundRelationshipProperty::new(&Group::MEMBERS, &store, &group);
/// assert!(members.is_empty().unwrap());
/// ```
#[derive(Debug)]
pub struct BoundRelationshipProperty<'a, S> {
    property: RelationshipProperty,
    store: &'a S,
    owner: ObjectRef,
}

impl<'a, S> BoundRelationshipProperty<'a, S>
where
    S: LinkStore,
    S::Error: Display,
{
    /// Bind `property` to `owner`
    pub fn new(property: &RelationshipProperty, store: &'a S, owner: &impl HasRelationshipLinks) -> Self {
        Self {
            property: property.clone(),
            store,
            owner: owner.object_ref(),
        }
    }

    /// The object the property is bound to
    pub fn owner(&self) -> ObjectRef {
        self.owner
    }

    /// The descriptor the view was built from
    pub fn property(&self) -> &RelationshipProperty {
        &self.property
    }

    /// Current related objects
    pub fn iter(&self) -> Result<RelatedObjects, RelationshipError> {
        related_by_roles(
            self.store,
            self.owner.id,
            &self.property.my_role,
            &self.property.other_role,
            &self.property.rel_type,
        )
    }

    /// Whether `id` is currently related
    pub fn contains(&self, id: ObjectId) -> Result<bool, RelationshipError> {
        Ok(self.iter()?.contains(id))
    }

    /// Number of related objects
    pub fn len(&self) -> Result<usize, RelationshipError> {
        Ok(self.iter()?.len())
    }

    /// Whether nothing is related
    pub fn is_empty(&self) -> Result<bool, RelationshipError> {
        Ok(self.iter()?.is_empty())
    }

    /// Current relationships, with their extra information
    pub fn relationships(&self) -> Result<Vec<RelationshipInfo>, RelationshipError> {
        relationships_by_roles(
            self.store,
            self.owner,
            &self.property.my_role,
            &self.property.other_role,
            &self.property.rel_type,
        )
    }
}

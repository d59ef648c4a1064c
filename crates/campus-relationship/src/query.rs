//! Read side of the relationship graph

use crate::RelationshipError;
use campus_domain::{HasRelationshipLinks, Link, LinkSet, LinkStore, ObjectId, ObjectRef, Uri};
use std::fmt::Display;

pub(crate) fn load<S>(store: &S, owner: ObjectId) -> Result<LinkSet, RelationshipError>
where
    S: LinkStore,
    S::Error: Display,
{
    store
        .link_set(owner)
        .map_err(|e| RelationshipError::Store(e.to_string()))
}

/// Snapshot of the objects related to one object
///
/// Iterating twice yields the same objects in the same order. Order follows
/// the owner's link set and carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelatedObjects {
    objects: Vec<ObjectRef>,
}

impl RelatedObjects {
    /// Iterate over the related objects
    pub fn iter(&self) -> std::slice::Iter<'_, ObjectRef> {
        self.objects.iter()
    }

    /// Whether an object is among them
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    /// Number of related objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether there are none
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Ids of the related objects, sorted
    pub fn sorted_ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<_> = self.objects.iter().map(|o| o.id).collect();
        ids.sort();
        ids
    }

    /// The underlying references
    pub fn into_vec(self) -> Vec<ObjectRef> {
        self.objects
    }
}

impl<'a> IntoIterator for &'a RelatedObjects {
    type Item = &'a ObjectRef;
    type IntoIter = std::slice::Iter<'a, ObjectRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for RelatedObjects {
    type Item = ObjectRef;
    type IntoIter = std::vec::IntoIter<ObjectRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

/// One relationship as seen from one of its ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipInfo {
    /// The object the relationship was looked up from
    pub source: ObjectRef,

    /// The object at the other end
    pub target: ObjectRef,

    /// Type of the relationship
    pub rel_type: Uri,

    /// Role played by `source`
    pub source_role: Uri,

    /// Role played by `target`
    pub target_role: Uri,

    /// Extra information shared by both halves
    pub extra_info: Option<String>,
}

impl RelationshipInfo {
    fn from_link(source: ObjectRef, link: &Link) -> Self {
        Self {
            source,
            target: link.target,
            rel_type: link.rel_type.clone(),
            source_role: link.my_role.clone(),
            target_role: link.role.clone(),
            extra_info: link.extra_info.clone(),
        }
    }
}

/// Objects related to `obj` that play `role`, optionally of one type
///
/// # Examples
///
/// ```
/// use campus_domain::{uris, Group};
/// use campus_relationship::related_objects;
/// use campus_store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let group = Group::new("Chess club");
/// let members = related_objects(&store, &group, &uris::MEMBER, Some(&uris::MEMBERSHIP)).unwrap();
/// assert!(members.is_empty());
/// ```
pub fn related_objects<S>(
    store: &S,
    obj: &impl HasRelationshipLinks,
    role: &Uri,
    rel_type: Option<&Uri>,
) -> Result<RelatedObjects, RelationshipError>
where
    S: LinkStore,
    S::Error: Display,
{
    let set = load(store, obj.object_id())?;
    Ok(RelatedObjects {
        objects: set.targets_by_role(role, rel_type),
    })
}

/// Objects related to `owner` through links where it plays `my_role`
pub(crate) fn related_by_roles<S>(
    store: &S,
    owner: ObjectId,
    my_role: &Uri,
    role: &Uri,
    rel_type: &Uri,
) -> Result<RelatedObjects, RelationshipError>
where
    S: LinkStore,
    S::Error: Display,
{
    let set = load(store, owner)?;
    Ok(RelatedObjects {
        objects: set.iter_by_roles(my_role, role, rel_type).map(|l| l.target).collect(),
    })
}

/// Relationships of `source` in which it plays `my_role`
pub(crate) fn relationships_by_roles<S>(
    store: &S,
    source: ObjectRef,
    my_role: &Uri,
    role: &Uri,
    rel_type: &Uri,
) -> Result<Vec<RelationshipInfo>, RelationshipError>
where
    S: LinkStore,
    S::Error: Display,
{
    let set = load(store, source.id)?;
    Ok(set
        .iter_by_roles(my_role, role, rel_type)
        .map(|link| RelationshipInfo::from_link(source, link))
        .collect())
}

/// Every link `obj` owns, regardless of type or role
pub fn iter_links<S>(store: &S, obj: &impl HasRelationshipLinks) -> Result<LinkSet, RelationshipError>
where
    S: LinkStore,
    S::Error: Display,
{
    load(store, obj.object_id())
}

/// Relationships of `obj` whose other end plays `role`
pub fn relationships<S>(
    store: &S,
    obj: &impl HasRelationshipLinks,
    role: &Uri,
    rel_type: Option<&Uri>,
) -> Result<Vec<RelationshipInfo>, RelationshipError>
where
    S: LinkStore,
    S::Error: Display,
{
    let source = obj.object_ref();
    let set = load(store, source.id)?;
    Ok(set
        .iter_by_role(role, rel_type)
        .map(|link| RelationshipInfo::from_link(source, link))
        .collect())
}

//! Link set module - the links owned by one object

use crate::{Link, LinkKey, ObjectId, ObjectRef, Uri};
use std::fmt;

/// Errors raised by link set mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSetError {
    /// A link with the same key is already present
    Duplicate(LinkKey),

    /// No link with this key is present
    NotFound(LinkKey),
}

impl fmt::Display for LinkSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSetError::Duplicate(key) => write!(f, "Link already present: {}", key),
            LinkSetError::NotFound(key) => write!(f, "Link not found: {}", key),
        }
    }
}

impl std::error::Error for LinkSetError {}

/// The collection of links belonging to one owning object
///
/// Every link has a distinct [`LinkKey`]. Links keep insertion order, but
/// callers must not rely on any particular order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSet {
    owner: ObjectId,
    links: Vec<Link>,
}

impl LinkSet {
    /// Create an empty link set for `owner`
    pub fn new(owner: ObjectId) -> Self {
        Self {
            owner,
            links: Vec::new(),
        }
    }

    /// Rebuild a link set from stored links
    ///
    /// # Errors
    /// Returns [`LinkSetError::Duplicate`] if two links share a key
    pub fn from_links(owner: ObjectId, links: Vec<Link>) -> Result<Self, LinkSetError> {
        let mut set = Self::new(owner);
        for link in links {
            set.add(link)?;
        }
        Ok(set)
    }

    /// The object owning this set
    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    /// Add a link
    ///
    /// # Errors
    /// Returns [`LinkSetError::Duplicate`] if a link with the same key exists
    pub fn add(&mut self, link: Link) -> Result<(), LinkSetError> {
        let key = link.key();
        if self.contains(&key) {
            return Err(LinkSetError::Duplicate(key));
        }
        self.links.push(link);
        Ok(())
    }

    /// Remove the link with the given key and return it
    ///
    /// # Errors
    /// Returns [`LinkSetError::NotFound`] if there is no such link
    pub fn remove(&mut self, key: &LinkKey) -> Result<Link, LinkSetError> {
        match self.position(key) {
            Some(index) => Ok(self.links.remove(index)),
            None => Err(LinkSetError::NotFound(key.clone())),
        }
    }

    /// Find the link with the given key
    pub fn find(&self, key: &LinkKey) -> Option<&Link> {
        self.position(key).map(|i| &self.links[i])
    }

    /// Find the link with the given key for modification
    pub fn find_mut(&mut self, key: &LinkKey) -> Option<&mut Link> {
        self.position(key).map(move |i| &mut self.links[i])
    }

    /// Check whether a link with the given key exists
    pub fn contains(&self, key: &LinkKey) -> bool {
        self.position(key).is_some()
    }

    /// Iterate over all links
    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    /// Iterate over links whose target plays `role`, optionally filtered by type
    pub fn iter_by_role<'a>(
        &'a self,
        role: &'a Uri,
        rel_type: Option<&'a Uri>,
    ) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.matches(role, rel_type))
    }

    /// Iterate over links of one type where the owner plays `my_role` and
    /// the target plays `role`
    pub fn iter_by_roles<'a>(
        &'a self,
        my_role: &'a Uri,
        role: &'a Uri,
        rel_type: &'a Uri,
    ) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |l| &l.my_role == my_role && l.matches(role, Some(rel_type)))
    }

    /// Targets of links whose target plays `role`
    pub fn targets_by_role(&self, role: &Uri, rel_type: Option<&Uri>) -> Vec<ObjectRef> {
        self.iter_by_role(role, rel_type).map(|l| l.target).collect()
    }

    /// Links pointing at a given object
    pub fn links_to(&self, target: ObjectId) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter().filter(move |l| l.target.id == target)
    }

    /// Remove all links, returning them
    pub fn clear(&mut self) -> Vec<Link> {
        std::mem::take(&mut self.links)
    }

    /// Number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the set holds no links
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn position(&self, key: &LinkKey) -> Option<usize> {
        self.links.iter().position(|l| {
            l.target.id == key.target && l.role == key.role && l.rel_type == key.rel_type
        })
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{uris, ObjectKind};

    fn person() -> ObjectRef {
        ObjectRef::new(ObjectId::new(), ObjectKind::Person)
    }

    fn membership_link(target: ObjectRef) -> Link {
        Link::new(uris::MEMBERSHIP, uris::GROUP, target, uris::MEMBER)
    }

    #[test]
    fn test_empty_set() {
        let set = LinkSet::new(ObjectId::new());
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_add_and_find() {
        let mut set = LinkSet::new(ObjectId::new());
        let a = person();
        let link = membership_link(a);
        set.add(link.clone()).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.find(&link.key()), Some(&link));
        assert!(set.contains(&link.key()));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut set = LinkSet::new(ObjectId::new());
        let a = person();
        set.add(membership_link(a)).unwrap();

        let err = set.add(membership_link(a)).unwrap_err();
        assert!(matches!(err, LinkSetError::Duplicate(_)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_same_target_different_role_allowed() {
        let mut set = LinkSet::new(ObjectId::new());
        let a = person();
        set.add(membership_link(a)).unwrap();
        set.add(Link::new(uris::LEADERSHIP, uris::ASSET, a, uris::LEADER)).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.links_to(a.id).count(), 2);
    }

    #[test]
    fn test_remove() {
        let mut set = LinkSet::new(ObjectId::new());
        let a = person();
        let b = person();
        set.add(membership_link(a)).unwrap();
        set.add(membership_link(b)).unwrap();

        let removed = set.remove(&membership_link(b).key()).unwrap();
        assert_eq!(removed.target, b);
        assert_eq!(set.targets_by_role(&uris::MEMBER, None), vec![a]);

        let err = set.remove(&membership_link(b).key()).unwrap_err();
        assert!(matches!(err, LinkSetError::NotFound(_)));
    }

    #[test]
    fn test_iter_by_role() {
        let mut set = LinkSet::new(ObjectId::new());
        let a = person();
        let b = person();
        set.add(membership_link(a)).unwrap();
        set.add(Link::new(uris::TEACHING, uris::TAUGHT, b, uris::TEACHER)).unwrap();

        assert_eq!(set.targets_by_role(&uris::MEMBER, Some(&uris::MEMBERSHIP)), vec![a]);
        assert_eq!(set.targets_by_role(&uris::TEACHER, None), vec![b]);
        assert!(set.targets_by_role(&uris::TEACHER, Some(&uris::MEMBERSHIP)).is_empty());
    }

    #[test]
    fn test_iter_by_roles_checks_own_role() {
        let mut set = LinkSet::new(ObjectId::new());
        let (a, b) = (person(), person());
        set.add(membership_link(a)).unwrap();
        // Same type and target role, but the owner plays Group here too
        set.add(Link::new(uris::MEMBERSHIP, uris::MEMBER, b, uris::MEMBER)).unwrap();

        let found: Vec<_> = set
            .iter_by_roles(&uris::GROUP, &uris::MEMBER, &uris::MEMBERSHIP)
            .map(|l| l.target)
            .collect();
        assert_eq!(found, vec![a]);
        assert_eq!(set.targets_by_role(&uris::MEMBER, Some(&uris::MEMBERSHIP)).len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut set = LinkSet::new(ObjectId::new());
        set.add(membership_link(person())).unwrap();
        set.add(membership_link(person())).unwrap();

        let removed = set.clear();
        assert_eq!(removed.len(), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_links_rejects_duplicates() {
        let a = person();
        let result = LinkSet::from_links(ObjectId::new(), vec![membership_link(a), membership_link(a)]);
        assert!(result.is_err());
    }
}

//! Link module - one directed half of a relationship

use crate::{ObjectId, ObjectRef, Uri};
use std::fmt;

/// One half of a relationship, stored in the owner's [`crate::LinkSet`]
///
/// A relationship between A and B is represented by two links: one in A's
/// link set pointing at B, and a mirror in B's link set pointing at A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Type of the relationship
    pub rel_type: Uri,

    /// Role played by the owner of this link
    pub my_role: Uri,

    /// Role played by the target
    pub role: Uri,

    /// The related object (weak reference)
    pub target: ObjectRef,

    /// Extra information shared by both halves of the relationship
    pub extra_info: Option<String>,
}

impl Link {
    /// Create a new link
    pub fn new(rel_type: Uri, my_role: Uri, target: ObjectRef, role: Uri) -> Self {
        Self {
            rel_type,
            my_role,
            role,
            target,
            extra_info: None,
        }
    }

    /// Attach extra information
    pub fn with_extra_info(mut self, extra_info: Option<String>) -> Self {
        self.extra_info = extra_info;
        self
    }

    /// Uniqueness key of this link within its owner's link set
    pub fn key(&self) -> LinkKey {
        LinkKey {
            rel_type: self.rel_type.clone(),
            role: self.role.clone(),
            target: self.target.id,
        }
    }

    /// Key of the mirror link stored on the target, given this link's owner
    pub fn mirror_key(&self, owner: ObjectId) -> LinkKey {
        LinkKey {
            rel_type: self.rel_type.clone(),
            role: self.my_role.clone(),
            target: owner,
        }
    }

    /// Whether this link matches a role and an optional relationship type
    pub fn matches(&self, role: &Uri, rel_type: Option<&Uri>) -> bool {
        &self.role == role && rel_type.map_or(true, |t| &self.rel_type == t)
    }
}

/// The (relationship type, role, target) triple identifying a link
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    /// Type of the relationship
    pub rel_type: Uri,

    /// Role played by the target
    pub role: Uri,

    /// The related object
    pub target: ObjectId,
}

impl LinkKey {
    /// Create a new key
    pub fn new(rel_type: Uri, role: Uri, target: ObjectId) -> Self {
        Self {
            rel_type,
            role,
            target,
        }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.rel_type, self.role, self.target)
    }
}

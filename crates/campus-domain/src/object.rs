//! Object identity - ids, kind tags and references to related objects

use std::fmt;

/// Unique identifier for an application object based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability
/// - 128-bit uniqueness
/// - No coordination required for distributed generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u128);

impl ObjectId {
    /// Generate a new UUIDv7-based ObjectId
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_domain::ObjectId;
    ///
    /// let id = ObjectId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an ObjectId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an ObjectId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_domain::ObjectId;
    ///
    /// let id = ObjectId::new();
    /// let parsed = ObjectId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid object id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Type tag of an entity family
///
/// Constraints dispatch on this tag instead of inspecting the object itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    /// A person (student, teacher, staff)
    Person,
    /// A group of persons
    Group,
    /// A bookable resource (room, projector)
    Resource,
    /// A course of study
    Course,
    /// A section implementing a course
    Section,
    /// Anything else taking part in relationships
    Other,
}

impl ObjectKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Person => "person",
            ObjectKind::Group => "group",
            ObjectKind::Resource => "resource",
            ObjectKind::Course => "course",
            ObjectKind::Section => "section",
            ObjectKind::Other => "other",
        }
    }

    /// Parse a kind from a string (storage layer)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "person" => Some(ObjectKind::Person),
            "group" => Some(ObjectKind::Group),
            "resource" => Some(ObjectKind::Resource),
            "course" => Some(ObjectKind::Course),
            "section" => Some(ObjectKind::Section),
            "other" => Some(ObjectKind::Other),
            _ => None,
        }
    }

    /// Whether objects of this kind can act as a group in Membership
    ///
    /// Sections are groups of learners.
    pub fn is_group_like(&self) -> bool {
        matches!(self, ObjectKind::Group | ObjectKind::Section)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weak reference to an object taking part in relationships
///
/// Holding an `ObjectRef` does not keep the object alive; the store decides
/// whether the id still resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Identity of the object
    pub id: ObjectId,

    /// Entity family of the object
    pub kind: ObjectKind,
}

impl ObjectRef {
    /// Create a new reference
    pub fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self { id, kind }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

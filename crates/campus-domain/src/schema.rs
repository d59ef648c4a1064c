//! Relationship schemas - a relationship type bound to two named roles

use crate::{uris, ObjectRef, Uri};
use std::borrow::Cow;
use std::fmt;

/// Errors raised when addressing a schema by role names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Both ends of a schema were given the same name
    DuplicateRoleName(String),

    /// A role name was empty
    EmptyRoleName,

    /// A name does not belong to the schema
    UnknownRole(String),

    /// A party required by the schema was not supplied
    MissingRole(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateRoleName(name) => {
                write!(f, "A relationship must have two distinct ends (got {:?} twice)", name)
            }
            SchemaError::EmptyRoleName => write!(f, "Role names cannot be empty"),
            SchemaError::UnknownRole(name) => write!(f, "Unknown role name: {:?}", name),
            SchemaError::MissingRole(name) => write!(f, "Missing a {:?} party", name),
        }
    }
}

impl std::error::Error for SchemaError {}

/// One end of a relationship: an object and the role it plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// The participating object
    pub object: ObjectRef,

    /// The role the object plays
    pub role: Uri,
}

impl Participant {
    /// Create a new participant
    pub fn new(object: ObjectRef, role: Uri) -> Self {
        Self { object, role }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SchemaEnd {
    name: Cow<'static, str>,
    role: Uri,
}

/// A relationship type with exactly two named roles
///
/// Schemas let callers address the ends of a relationship by name, e.g.
/// `member` and `group` for [`MEMBERSHIP`], instead of passing URIs around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSchema {
    rel_type: Uri,
    ends: [SchemaEnd; 2],
}

impl RelationshipSchema {
    /// Declare a schema from static parts (usable in `static` items)
    pub const fn from_static(
        rel_type: Uri,
        first_name: &'static str,
        first_role: Uri,
        second_name: &'static str,
        second_role: Uri,
    ) -> Self {
        Self {
            rel_type,
            ends: [
                SchemaEnd {
                    name: Cow::Borrowed(first_name),
                    role: first_role,
                },
                SchemaEnd {
                    name: Cow::Borrowed(second_name),
                    role: second_role,
                },
            ],
        }
    }

    /// Create a schema with runtime role names
    ///
    /// # Errors
    /// Returns an error if a name is empty or both names are equal
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_domain::{RelationshipSchema, Uri};
    ///
    /// let friend = Uri::new("example:Friend").unwrap();
    /// let schema = RelationshipSchema::new(
    ///     Uri::new("example:Friendship").unwrap(),
    ///     ("one", friend.clone()),
    ///     ("other", friend),
    /// ).unwrap();
    /// assert_eq!(schema.rel_type().as_str(), "example:Friendship");
    /// ```
    pub fn new(
        rel_type: Uri,
        first: (impl Into<String>, Uri),
        second: (impl Into<String>, Uri),
    ) -> Result<Self, SchemaError> {
        let first_name = first.0.into();
        let second_name = second.0.into();
        if first_name.is_empty() || second_name.is_empty() {
            return Err(SchemaError::EmptyRoleName);
        }
        if first_name == second_name {
            return Err(SchemaError::DuplicateRoleName(first_name));
        }
        Ok(Self {
            rel_type,
            ends: [
                SchemaEnd {
                    name: Cow::Owned(first_name),
                    role: first.1,
                },
                SchemaEnd {
                    name: Cow::Owned(second_name),
                    role: second.1,
                },
            ],
        })
    }

    /// The relationship type
    pub fn rel_type(&self) -> &Uri {
        &self.rel_type
    }

    /// Role names and role URIs, in declaration order
    pub fn roles(&self) -> impl Iterator<Item = (&str, &Uri)> {
        self.ends.iter().map(|e| (e.name.as_ref(), &e.role))
    }

    /// Role URI for a role name
    pub fn role(&self, name: &str) -> Result<&Uri, SchemaError> {
        self.index_of(name).map(|i| &self.ends[i].role)
    }

    /// Role URI of the end opposite to `name`
    ///
    /// Querying "the members of group g" means asking g's link set for links
    /// whose target plays the member role, i.e. the role opposite to `group`.
    pub fn other_role(&self, name: &str) -> Result<&Uri, SchemaError> {
        self.index_of(name).map(|i| &self.ends[1 - i].role)
    }

    /// Turn named parties into participants, in schema declaration order
    ///
    /// # Errors
    /// Returns an error if a name is unknown or a party is missing
    pub fn bind(&self, parties: [(&str, ObjectRef); 2]) -> Result<(Participant, Participant), SchemaError> {
        let mut bound: [Option<ObjectRef>; 2] = [None, None];
        for (name, object) in parties {
            let index = self.index_of(name)?;
            if bound[index].is_some() {
                return Err(SchemaError::DuplicateRoleName(name.to_string()));
            }
            bound[index] = Some(object);
        }
        let [first, second] = bound;
        let first = first.ok_or_else(|| SchemaError::MissingRole(self.ends[0].name.to_string()))?;
        let second = second.ok_or_else(|| SchemaError::MissingRole(self.ends[1].name.to_string()))?;
        Ok((
            Participant::new(first, self.ends[0].role.clone()),
            Participant::new(second, self.ends[1].role.clone()),
        ))
    }

    /// Whether a relationship of `rel_type` between `role1` and `role2`
    /// is described by this schema (in either order)
    pub fn describes(&self, rel_type: &Uri, role1: &Uri, role2: &Uri) -> bool {
        if rel_type != &self.rel_type {
            return false;
        }
        let (a, b) = (&self.ends[0].role, &self.ends[1].role);
        (role1 == a && role2 == b) || (role1 == b && role2 == a)
    }

    fn index_of(&self, name: &str) -> Result<usize, SchemaError> {
        self.ends
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| SchemaError::UnknownRole(name.to_string()))
    }
}

/// Membership of persons in groups and sections
pub static MEMBERSHIP: RelationshipSchema =
    RelationshipSchema::from_static(uris::MEMBERSHIP, "member", uris::MEMBER, "group", uris::GROUP);

/// Instructors of sections
pub static INSTRUCTION: RelationshipSchema = RelationshipSchema::from_static(
    uris::INSTRUCTION,
    "instructor", uris::INSTRUCTOR,
    "section", uris::SECTION,
);

/// Sections implementing a course
pub static COURSE_SECTIONS: RelationshipSchema = RelationshipSchema::from_static(
    uris::COURSE_SECTIONS,
    "course", uris::COURSE,
    "section", uris::SECTION_OF_COURSE,
);

/// Leaders of assets
pub static LEADERSHIP: RelationshipSchema =
    RelationshipSchema::from_static(uris::LEADERSHIP, "leader", uris::LEADER, "asset", uris::ASSET);

/// Teachers of groups
pub static TEACHING: RelationshipSchema =
    RelationshipSchema::from_static(uris::TEACHING, "teacher", uris::TEACHER, "taught", uris::TAUGHT);

/// Resources booked by sections
pub static SECTION_BOOKING: RelationshipSchema = RelationshipSchema::from_static(
    uris::SECTION_BOOKING,
    "section", uris::BOOKING_SECTION,
    "resource", uris::BOOKED_RESOURCE,
);

/// Calendar subscriptions
pub static CALENDAR_SUBSCRIPTION: RelationshipSchema = RelationshipSchema::from_static(
    uris::CALENDAR_SUBSCRIPTION,
    "provider", uris::CALENDAR_PROVIDER,
    "subscriber", uris::CALENDAR_SUBSCRIBER,
);

/// Every standard schema
pub fn standard_schemas() -> Vec<RelationshipSchema> {
    [
        &MEMBERSHIP,
        &INSTRUCTION,
        &COURSE_SECTIONS,
        &LEADERSHIP,
        &TEACHING,
        &SECTION_BOOKING,
        &CALENDAR_SUBSCRIPTION,
    ]
    .into_iter()
    .cloned()
    .collect()
}

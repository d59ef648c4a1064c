//! Entity families taking part in relationships
//!
//! Each entity implements [`HasRelationshipLinks`], which is all the
//! relationship engine needs from it: a stable id and a kind tag. Entities
//! also expose [`RelationshipProperty`] descriptors for their usual
//! relationships, e.g. [`Group::MEMBERS`].

use crate::{uris, ObjectId, ObjectKind, ObjectRef, Uri};

/// Capability of an object to own a link set
pub trait HasRelationshipLinks {
    /// Reference used as a link target
    fn object_ref(&self) -> ObjectRef;

    /// Identity of the object
    fn object_id(&self) -> ObjectId {
        self.object_ref().id
    }
}

impl HasRelationshipLinks for ObjectRef {
    fn object_ref(&self) -> ObjectRef {
        *self
    }
}

/// Descriptor of a relationship seen from one end
///
/// `Group::MEMBERS` reads as: relationships of type Membership where the
/// owner plays Group, yielding the objects that play Member. The descriptor
/// carries no data about any particular object; bind it to one through the
/// relationship engine to query it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipProperty {
    /// Type of the relationship
    pub rel_type: Uri,

    /// Role of the object the property is bound to
    pub my_role: Uri,

    /// Role of the objects the property yields
    pub other_role: Uri,
}

impl RelationshipProperty {
    /// Create a new descriptor (usable in `const` items)
    pub const fn new(rel_type: Uri, my_role: Uri, other_role: Uri) -> Self {
        Self {
            rel_type,
            my_role,
            other_role,
        }
    }
}

macro_rules! entity {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $field:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            /// Unique identifier
            pub id: ObjectId,

            #[doc = concat!("Display ", stringify!($field))]
            pub $field: String,
        }

        impl $name {
            /// Create a new entity with a fresh id
            pub fn new(value: impl Into<String>) -> Self {
                Self {
                    id: ObjectId::new(),
                    $field: value.into(),
                }
            }
        }

        impl HasRelationshipLinks for $name {
            fn object_ref(&self) -> ObjectRef {
                ObjectRef::new(self.id, $kind)
            }
        }
    };
}

entity!(
    /// A person: student, teacher or staff member
    Person,
    ObjectKind::Person,
    full_name
);

entity!(
    /// A group of persons
    Group,
    ObjectKind::Group,
    title
);

entity!(
    /// A bookable resource such as a room
    Resource,
    ObjectKind::Resource,
    title
);

entity!(
    /// A course of study
    Course,
    ObjectKind::Course,
    title
);

entity!(
    /// A section of a course: a group of learners with instructors
    Section,
    ObjectKind::Section,
    title
);

impl Person {
    /// Groups and sections the person is a member of
    pub const GROUPS: RelationshipProperty = RelationshipProperty::new(uris::MEMBERSHIP, uris::MEMBER, uris::GROUP);

    /// Sections the person instructs
    pub const SECTIONS_TAUGHT: RelationshipProperty =
        RelationshipProperty::new(uris::INSTRUCTION, uris::INSTRUCTOR, uris::SECTION);

    /// Assets the person leads
    pub const LEADS: RelationshipProperty = RelationshipProperty::new(uris::LEADERSHIP, uris::LEADER, uris::ASSET);
}

impl Group {
    /// Members of the group
    pub const MEMBERS: RelationshipProperty = RelationshipProperty::new(uris::MEMBERSHIP, uris::GROUP, uris::MEMBER);

    /// Leaders of the group
    pub const LEADERS: RelationshipProperty = RelationshipProperty::new(uris::LEADERSHIP, uris::ASSET, uris::LEADER);
}

impl Resource {
    /// Sections that booked the resource
    pub const BOOKED_BY: RelationshipProperty =
        RelationshipProperty::new(uris::SECTION_BOOKING, uris::BOOKED_RESOURCE, uris::BOOKING_SECTION);
}

impl Course {
    /// Sections implementing the course
    pub const SECTIONS: RelationshipProperty =
        RelationshipProperty::new(uris::COURSE_SECTIONS, uris::COURSE, uris::SECTION_OF_COURSE);
}

impl Section {
    /// Learners of the section
    pub const MEMBERS: RelationshipProperty = RelationshipProperty::new(uris::MEMBERSHIP, uris::GROUP, uris::MEMBER);

    /// Instructors of the section
    pub const INSTRUCTORS: RelationshipProperty =
        RelationshipProperty::new(uris::INSTRUCTION, uris::SECTION, uris::INSTRUCTOR);

    /// Courses the section implements
    pub const COURSES: RelationshipProperty =
        RelationshipProperty::new(uris::COURSE_SECTIONS, uris::SECTION_OF_COURSE, uris::COURSE);

    /// Resources booked for the section
    pub const RESOURCES: RelationshipProperty =
        RelationshipProperty::new(uris::SECTION_BOOKING, uris::BOOKING_SECTION, uris::BOOKED_RESOURCE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_refs() {
        let person = Person::new("Jonas Petraitis");
        let section = Section::new("Math 7A");

        assert_eq!(person.object_ref().kind, ObjectKind::Person);
        assert_eq!(person.object_id(), person.id);
        assert_eq!(section.object_ref(), ObjectRef::new(section.id, ObjectKind::Section));
        assert_eq!(section.title, "Math 7A");
    }

    #[test]
    fn test_properties_are_mirrored() {
        assert_eq!(Person::GROUPS.my_role, Group::MEMBERS.other_role);
        assert_eq!(Person::GROUPS.other_role, Group::MEMBERS.my_role);
        assert_eq!(Section::INSTRUCTORS.other_role, Person::SECTIONS_TAUGHT.my_role);
        assert_eq!(Course::SECTIONS.other_role, Section::COURSES.my_role);
    }
}

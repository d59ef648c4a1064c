//! Standard relationship vocabulary
//!
//! Relationship types and roles used by the school administration core.
//! Role URIs are nested under the URI of the relationship they belong to.

use crate::Uri;

/// The membership relationship
pub const MEMBERSHIP: Uri = Uri::from_static(
    "http://schooltool.org/ns/membership",
    "Membership",
    "The membership relationship.",
);

/// A role of a containing group
pub const GROUP: Uri = Uri::from_static(
    "http://schooltool.org/ns/membership/group",
    "Group",
    "A role of a containing group.",
);

/// A group member role
pub const MEMBER: Uri = Uri::from_static(
    "http://schooltool.org/ns/membership/member",
    "Member",
    "A group member role.",
);

/// The instruction relationship (instructors of a section)
pub const INSTRUCTION: Uri = Uri::from_static(
    "http://schooltool.org/ns/instruction",
    "Instruction",
    "The instruction relationship.",
);

/// A role of a section that has instructors
pub const SECTION: Uri = Uri::from_static(
    "http://schooltool.org/ns/instruction/section",
    "Section",
    "A role of a containing section.",
);

/// A section instructor role
pub const INSTRUCTOR: Uri = Uri::from_static(
    "http://schooltool.org/ns/instruction/instructor",
    "Instructor",
    "A section instructor role.",
);

/// The sections that implement a course
pub const COURSE_SECTIONS: Uri = Uri::from_static(
    "http://schooltool.org/ns/coursesections",
    "Course Sections",
    "The sections that implement a course.",
);

/// A role of a course in CourseSections
pub const COURSE: Uri = Uri::from_static(
    "http://schooltool.org/ns/coursesections/course",
    "Course",
    "A section that implements a course.",
);

/// A role of a section in CourseSections
pub const SECTION_OF_COURSE: Uri = Uri::from_static(
    "http://schooltool.org/ns/coursesections/section",
    "Section",
    "A course of study.",
);

/// The leadership relationship
pub const LEADERSHIP: Uri = Uri::from_static(
    "http://schooltool.org/ns/leadership",
    "Leadership",
    "The leadership relationship.",
);

/// A role of a leader of an asset
pub const LEADER: Uri = Uri::from_static(
    "http://schooltool.org/ns/leadership/leader",
    "Leader",
    "A role of a leader of an asset.",
);

/// An asset of a leader
pub const ASSET: Uri = Uri::from_static(
    "http://schooltool.org/ns/leadership/asset",
    "Asset",
    "An asset of a leader.",
);

/// The teaching relationship
pub const TEACHING: Uri = Uri::from_static(
    "http://schooltool.org/ns/teaching",
    "Teaching",
    "The teaching relationship.",
);

/// A role of a teacher
pub const TEACHER: Uri = Uri::from_static(
    "http://schooltool.org/ns/teaching/teacher",
    "Teacher",
    "A role of a teacher.",
);

/// A role of a group that has a teacher
pub const TAUGHT: Uri = Uri::from_static(
    "http://schooltool.org/ns/teaching/taught",
    "Taught",
    "A role of a group that has a teacher.",
);

/// Resources booked for a section
pub const SECTION_BOOKING: Uri = Uri::from_static(
    "http://schooltool.org/ns/sectionbooking",
    "Section Booking",
    "Resources booked for the meetings of a section.",
);

/// A role of a section in SectionBooking
pub const BOOKING_SECTION: Uri = Uri::from_static(
    "http://schooltool.org/ns/sectionbooking/section",
    "Section",
    "A section that booked a resource.",
);

/// A role of a resource in SectionBooking
pub const BOOKED_RESOURCE: Uri = Uri::from_static(
    "http://schooltool.org/ns/sectionbooking/resource",
    "Resource",
    "A resource booked by a section.",
);

/// The calendar subscription relationship
pub const CALENDAR_SUBSCRIPTION: Uri = Uri::from_static(
    "http://schooltool.org/ns/calendar_subscription",
    "Calendar subscription",
    "The calendar subscription relationship.",
);

/// A role of an object providing a calendar
pub const CALENDAR_PROVIDER: Uri = Uri::from_static(
    "http://schooltool.org/ns/calendar_subscription/provider",
    "Calendar provider",
    "A role of an object providing a calendar.",
);

/// A role of an object that subscribes to a calendar
pub const CALENDAR_SUBSCRIBER: Uri = Uri::from_static(
    "http://schooltool.org/ns/calendar_subscription/subscriber",
    "Calendar subscriber",
    "A role of an object that subscribes to a calendar.",
);

/// Every URI of the standard vocabulary
pub fn all() -> Vec<Uri> {
    vec![
        MEMBERSHIP,
        GROUP,
        MEMBER,
        INSTRUCTION,
        SECTION,
        INSTRUCTOR,
        COURSE_SECTIONS,
        COURSE,
        SECTION_OF_COURSE,
        LEADERSHIP,
        LEADER,
        ASSET,
        TEACHING,
        TEACHER,
        TAUGHT,
        SECTION_BOOKING,
        BOOKING_SECTION,
        BOOKED_RESOURCE,
        CALENDAR_SUBSCRIPTION,
        CALENDAR_PROVIDER,
        CALENDAR_SUBSCRIBER,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::looks_like_a_uri;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_is_well_formed() {
        for uri in all() {
            assert!(looks_like_a_uri(uri.as_str()), "{} is malformed", uri);
            assert!(uri.name().is_some());
        }
    }

    #[test]
    fn test_vocabulary_is_unique() {
        let uris = all();
        let unique: HashSet<_> = uris.iter().collect();
        assert_eq!(unique.len(), uris.len());
    }
}

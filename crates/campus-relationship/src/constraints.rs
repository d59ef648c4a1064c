//! Constraints consulted before relationships change
//!
//! A constraint sees the `BeforeAdd` (or `BeforeRemove`) event and may veto
//! it. Constraints run before anything is written, so a veto leaves both
//! link sets untouched.

use campus_domain::{uris, LinkReader, ObjectId, ObjectKind, RelationshipEvent};
use std::collections::HashSet;
use std::fmt::Debug;

/// Outcome of a constraint check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConstraintResult {
    /// Let the operation proceed
    #[default]
    Continue,

    /// Reject the operation, with a reason
    Veto(String),
}

impl ConstraintResult {
    fn veto(reason: impl Into<String>) -> Self {
        ConstraintResult::Veto(reason.into())
    }
}

/// A check run before relationships are added or removed
///
/// Each method defaults to [`ConstraintResult::Continue`].
pub trait RelationshipConstraint: Send + Sync + Debug {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Called before a relationship is added
    fn before_add(&self, event: &RelationshipEvent, links: &dyn LinkReader) -> ConstraintResult {
        let _ = (event, links);
        ConstraintResult::Continue
    }

    /// Called before a relationship is removed
    fn before_remove(&self, event: &RelationshipEvent, links: &dyn LinkReader) -> ConstraintResult {
        let _ = (event, links);
        ConstraintResult::Continue
    }
}

/// Whether `obj` is a member of `group`, directly or through other groups
///
/// Every object counts as a transitive member of itself.
pub fn is_transitive_member(links: &dyn LinkReader, obj: ObjectId, group: ObjectId) -> Result<bool, String> {
    let mut stack = vec![obj];
    let mut seen = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == group {
            return Ok(true);
        }
        if !seen.insert(current) {
            continue;
        }
        let set = links.read_links(current)?;
        stack.extend(
            set.iter_by_role(&uris::GROUP, Some(&uris::MEMBERSHIP))
                .map(|l| l.target.id),
        );
    }
    Ok(false)
}

/// Rules of the Membership relationship
///
/// - one member and one group role
/// - resources cannot be members
/// - the group end must be a group or a section
/// - groups cannot be members, unless nesting is allowed
/// - no cycles
#[derive(Debug, Clone, Default)]
pub struct MembershipConstraint {
    /// Let groups be members of groups
    pub allow_nested_groups: bool,
}

impl RelationshipConstraint for MembershipConstraint {
    fn name(&self) -> &str {
        "membership"
    }

    fn before_add(&self, event: &RelationshipEvent, links: &dyn LinkReader) -> ConstraintResult {
        if event.rel_type != uris::MEMBERSHIP {
            return ConstraintResult::Continue;
        }
        if !event.has_roles(&uris::MEMBER, &uris::GROUP) {
            return ConstraintResult::veto("Membership must have one member and one group");
        }
        let (Some(member), Some(group)) = (event.participant(&uris::MEMBER), event.participant(&uris::GROUP)) else {
            return ConstraintResult::veto("Membership must have one member and one group");
        };
        if member.kind == ObjectKind::Resource {
            return ConstraintResult::veto("Resources cannot be members of a group");
        }
        if !group.kind.is_group_like() {
            return ConstraintResult::veto(format!("The group end must be a group, not a {}", group.kind));
        }
        if member.kind.is_group_like() && !self.allow_nested_groups {
            return ConstraintResult::veto("Groups cannot be members of a group");
        }
        match is_transitive_member(links, group.id, member.id) {
            Ok(true) => ConstraintResult::veto("No cycles are allowed"),
            Ok(false) => ConstraintResult::Continue,
            Err(e) => ConstraintResult::veto(format!("Cannot check membership cycles: {}", e)),
        }
    }
}

/// Rules of the Instruction relationship: one instructor, one section
#[derive(Debug, Clone, Default)]
pub struct InstructionConstraint;

impl RelationshipConstraint for InstructionConstraint {
    fn name(&self) -> &str {
        "instruction"
    }

    fn before_add(&self, event: &RelationshipEvent, _links: &dyn LinkReader) -> ConstraintResult {
        if event.rel_type != uris::INSTRUCTION {
            return ConstraintResult::Continue;
        }
        if !event.has_roles(&uris::INSTRUCTOR, &uris::SECTION) {
            return ConstraintResult::veto("Instruction must have one instructor and one section");
        }
        match event.participant(&uris::SECTION) {
            Some(section) if section.kind == ObjectKind::Section => ConstraintResult::Continue,
            _ => ConstraintResult::veto("The section end of Instruction must be a section"),
        }
    }
}

/// Rules of the CourseSections relationship: one course, one section
#[derive(Debug, Clone, Default)]
pub struct CourseSectionsConstraint;

impl RelationshipConstraint for CourseSectionsConstraint {
    fn name(&self) -> &str {
        "course-sections"
    }

    fn before_add(&self, event: &RelationshipEvent, _links: &dyn LinkReader) -> ConstraintResult {
        if event.rel_type != uris::COURSE_SECTIONS {
            return ConstraintResult::Continue;
        }
        if !event.has_roles(&uris::COURSE, &uris::SECTION_OF_COURSE) {
            return ConstraintResult::veto("CourseSections must have one course and one section");
        }
        if event.participant(&uris::SECTION_OF_COURSE).map(|o| o.kind) != Some(ObjectKind::Section) {
            return ConstraintResult::veto("The section end of CourseSections must be a section");
        }
        if event.participant(&uris::COURSE).map(|o| o.kind) != Some(ObjectKind::Course) {
            return ConstraintResult::veto("The course end of CourseSections must be a course");
        }
        ConstraintResult::Continue
    }
}

/// The built-in constraints, in evaluation order
pub fn standard_constraints(allow_nested_groups: bool) -> Vec<Box<dyn RelationshipConstraint>> {
    vec![
        Box::new(MembershipConstraint { allow_nested_groups }),
        Box::new(InstructionConstraint),
        Box::new(CourseSectionsConstraint),
    ]
}

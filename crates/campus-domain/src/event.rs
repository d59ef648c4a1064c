//! Relationship events, delivered to listeners and constraints

use crate::{ObjectRef, Participant, RelationshipSchema, Uri};

/// Stage of a relationship's lifecycle an event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipEventKind {
    /// A relationship is about to be established
    BeforeAdd,

    /// A relationship has been established
    Added,

    /// A relationship is about to be broken
    BeforeRemove,

    /// A relationship has been broken
    Removed,
}

/// A relationship lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEvent {
    /// What happened
    pub kind: RelationshipEventKind,

    /// Type of the relationship
    pub rel_type: Uri,

    /// First participant, as passed to relate/unrelate
    pub first: Participant,

    /// Second participant, as passed to relate/unrelate
    pub second: Participant,

    /// Extra information attached to the relationship
    pub extra_info: Option<String>,
}

impl RelationshipEvent {
    /// Create a new event
    pub fn new(
        kind: RelationshipEventKind,
        rel_type: Uri,
        first: Participant,
        second: Participant,
        extra_info: Option<String>,
    ) -> Self {
        Self {
            kind,
            rel_type,
            first,
            second,
            extra_info,
        }
    }

    /// The same relationship reported at a different stage
    pub fn with_kind(&self, kind: RelationshipEventKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// The participant playing `role`, if any
    pub fn participant(&self, role: &Uri) -> Option<ObjectRef> {
        if &self.first.role == role {
            Some(self.first.object)
        } else if &self.second.role == role {
            Some(self.second.object)
        } else {
            None
        }
    }

    /// Whether both roles are exactly `a` and `b`, in either order
    pub fn has_roles(&self, a: &Uri, b: &Uri) -> bool {
        (&self.first.role == a && &self.second.role == b) || (&self.first.role == b && &self.second.role == a)
    }

    /// Match the event against a schema, naming participants by role name
    pub fn matches(&self, schema: &RelationshipSchema) -> Option<RelationshipMatch> {
        if !schema.describes(&self.rel_type, &self.first.role, &self.second.role) {
            return None;
        }
        let parties = schema
            .roles()
            .filter_map(|(name, role)| self.participant(role).map(|obj| (name.to_string(), obj)))
            .collect();
        Some(RelationshipMatch {
            parties,
            extra_info: self.extra_info.clone(),
        })
    }
}

/// Participants of an event, addressed by schema role names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipMatch {
    parties: Vec<(String, ObjectRef)>,

    /// Extra information attached to the relationship
    pub extra_info: Option<String>,
}

impl RelationshipMatch {
    /// The participant with the given role name
    pub fn get(&self, name: &str) -> Option<ObjectRef> {
        self.parties.iter().find(|(n, _)| n == name).map(|(_, obj)| *obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema, uris, ObjectId, ObjectKind};

    fn membership_event() -> (RelationshipEvent, ObjectRef, ObjectRef) {
        let a = ObjectRef::new(ObjectId::new(), ObjectKind::Person);
        let b = ObjectRef::new(ObjectId::new(), ObjectKind::Group);
        let event = RelationshipEvent::new(
            RelationshipEventKind::Added,
            uris::MEMBERSHIP,
            Participant::new(a, uris::MEMBER),
            Participant::new(b, uris::GROUP),
            None,
        );
        (event, a, b)
    }

    #[test]
    fn test_participant_by_role() {
        let (event, a, b) = membership_event();
        assert_eq!(event.participant(&uris::MEMBER), Some(a));
        assert_eq!(event.participant(&uris::GROUP), Some(b));
        assert_eq!(event.participant(&uris::LEADER), None);
    }

    #[test]
    fn test_match_schema() {
        let (event, a, b) = membership_event();
        let matched = event.matches(&schema::MEMBERSHIP).unwrap();
        assert_eq!(matched.get("member"), Some(a));
        assert_eq!(matched.get("group"), Some(b));
        assert_eq!(matched.get("leader"), None);

        assert!(event.matches(&schema::LEADERSHIP).is_none());
    }

    #[test]
    fn test_with_kind() {
        let (event, _, _) = membership_event();
        let removed = event.with_kind(RelationshipEventKind::Removed);
        assert_eq!(removed.kind, RelationshipEventKind::Removed);
        assert_eq!(removed.first, event.first);
    }
}

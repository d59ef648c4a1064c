//! Relationship event listeners
//!
//! Listeners are told about every event after constraints had their say.
//! They cannot veto; the engine ignores anything they do.

use campus_domain::{RelationshipEvent, RelationshipEventKind};
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Receiver of relationship events
pub trait RelationshipListener: Send + Sync + Debug {
    /// Called for every event, in order
    fn notify(&self, event: &RelationshipEvent);
}

/// Logs every event at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl RelationshipListener for TracingListener {
    fn notify(&self, event: &RelationshipEvent) {
        debug!(
            kind = ?event.kind,
            rel_type = %event.rel_type,
            first = %event.first.object,
            first_role = %event.first.role,
            second = %event.second.object,
            second_role = %event.second.role,
            "Relationship event"
        );
    }
}

/// Keeps every event it receives
///
/// Clones share the same log, so one clone can be registered with the engine
/// while another is inspected.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RelationshipEvent>>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received so far
    pub fn events(&self) -> Vec<RelationshipEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Events of one kind
    pub fn of_kind(&self, kind: RelationshipEventKind) -> Vec<RelationshipEvent> {
        self.events().into_iter().filter(|e| e.kind == kind).collect()
    }

    /// Forget every event
    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl RelationshipListener for EventLog {
    fn notify(&self, event: &RelationshipEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_domain::{uris, ObjectId, ObjectKind, ObjectRef, Participant};

    fn event(kind: RelationshipEventKind) -> RelationshipEvent {
        RelationshipEvent::new(
            kind,
            uris::MEMBERSHIP,
            Participant::new(ObjectRef::new(ObjectId::new(), ObjectKind::Person), uris::MEMBER),
            Participant::new(ObjectRef::new(ObjectId::new(), ObjectKind::Group), uris::GROUP),
            None,
        )
    }

    #[test]
    fn test_event_log_shares_state() {
        let log = EventLog::new();
        let registered = log.clone();

        registered.notify(&event(RelationshipEventKind::BeforeAdd));
        registered.notify(&event(RelationshipEventKind::Added));

        assert_eq!(log.events().len(), 2);
        assert_eq!(log.of_kind(RelationshipEventKind::Added).len(), 1);

        log.clear();
        assert!(registered.events().is_empty());
    }

    #[test]
    fn test_tracing_listener_does_not_panic() {
        TracingListener.notify(&event(RelationshipEventKind::Removed));
    }
}

//! Timetable change notifications

use crate::TimetableKey;
use campus_domain::ObjectId;
use std::fmt::Debug;
use tracing::debug;

/// A change to the timetables held by a [`crate::TimetableRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableEvent {
    /// A timetable was given to an owner, possibly replacing one
    Attached {
        /// Owner of the timetable
        owner: ObjectId,
        /// Its key
        key: TimetableKey,
    },

    /// A timetable was taken away from an owner
    Detached {
        /// Former owner
        owner: ObjectId,
        /// Its key
        key: TimetableKey,
    },

    /// A term was added, replaced or removed
    TermChanged(String),

    /// A timetable schema was added, replaced, removed or opened for editing
    SchemaChanged(String),
}

/// Receiver of timetable events
pub trait TimetableListener: Send + Sync + Debug {
    /// Called after every change, in order
    fn notify(&self, event: &TimetableEvent);
}

/// Logs every timetable event at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTimetableListener;

impl TimetableListener for TracingTimetableListener {
    fn notify(&self, event: &TimetableEvent) {
        debug!(event = ?event, "Timetable event");
    }
}

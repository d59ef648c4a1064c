//! Meetings: concrete occurrences produced from timetables

use campus_domain::{ObjectId, Uri};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// A single timestamped occurrence of an activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meeting {
    /// Start, in UTC
    pub start: DateTime<Utc>,

    /// Length of the meeting
    pub duration: Duration,

    /// Title of the activity
    pub title: String,

    /// Timetable day the meeting belongs to
    pub day_id: String,

    /// Period the meeting fills
    pub period_id: String,

    /// Object whose timetable produced the meeting
    pub source: ObjectId,

    /// Resources used by the activity
    pub resources: Vec<ObjectId>,

    /// Relationship type through which a composed schedule reached the
    /// source; `None` for the object's own meetings
    pub via: Option<Uri>,
}

impl Meeting {
    /// End of the meeting, in UTC
    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.duration
    }

    /// Calendar date of the start in the given timezone
    pub fn local_date(&self, timezone: &FixedOffset) -> NaiveDate {
        self.start.with_timezone(timezone).date_naive()
    }

    /// Whether both meetings overlap in time
    pub fn overlaps(&self, other: &Meeting) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    pub(crate) fn with_via(mut self, via: &Uri) -> Self {
        self.via = Some(via.clone());
        self
    }
}

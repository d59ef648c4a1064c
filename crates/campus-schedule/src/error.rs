//! Error types for timetables and schedule composition

use campus_relationship::RelationshipError;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building timetables or composing schedules
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A term ends before it starts
    #[error("Term cannot end ({last}) before it starts ({first})")]
    InvalidTerm {
        /// First day of the term
        first: NaiveDate,
        /// Last day of the term
        last: NaiveDate,
    },

    /// A date range ends before it starts
    #[error("Date range {first}..={last} is empty")]
    InvalidRange {
        /// Requested first day
        first: NaiveDate,
        /// Requested last day
        last: NaiveDate,
    },

    /// A date does not belong to the term
    #[error("{0} is outside the term")]
    OutsideTerm(NaiveDate),

    /// A model has no day ids to cycle through
    #[error("Timetable model has no day ids")]
    NoDayIds,

    /// The same day or period id was given twice
    #[error("Duplicate id {0:?}")]
    DuplicateId(String),

    /// A model cannot find a day template
    #[error("No day template for {0}, and no fallback either")]
    MissingTemplate(String),

    /// A day id is not part of the model or timetable
    #[error("Unknown day id {0:?}")]
    UnknownDayId(String),

    /// A period id is not part of the timetable day
    #[error("Unknown period {period:?} on day {day_id:?}")]
    UnknownPeriod {
        /// Day the period was looked up in
        day_id: String,
        /// The missing period
        period: String,
    },

    /// A timetable does not have the day ids of its model
    #[error("Timetable days {found:?} do not match model days {expected:?}")]
    DayIdMismatch {
        /// Day ids of the model
        expected: Vec<String>,
        /// Day ids of the timetable
        found: Vec<String>,
    },

    /// A timetable key is not of the form `term.schema`
    #[error("Malformed timetable key {0:?}, expected \"term.schema\"")]
    InvalidTimetableKey(String),

    /// No term is registered under this id
    #[error("Unknown term {0:?}")]
    UnknownTerm(String),

    /// No timetable schema is registered under this id
    #[error("Unknown timetable schema {0:?}")]
    UnknownSchema(String),

    /// The timetable source failed for the composed object itself
    #[error("Timetable source error: {0}")]
    Source(String),

    /// The relationship layer failed
    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

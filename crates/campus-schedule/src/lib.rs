//! Campus Schedule Composer
//!
//! Timetables turned into meetings, and per-object schedules assembled
//! from the relationship graph.
//!
//! # Overview
//!
//! - **Terms**: date ranges with school weekdays and holidays
//! - **Models**: weekly or sequential mapping of dates to timetable days,
//!   with exception days and exception day ids
//! - **Timetables**: activities placed into the periods of each day,
//!   keyed per owner by `"term.schema"`
//! - **Notifications**: listeners told about attached and detached
//!   timetables and changed terms or schemas
//! - **Composition**: an object's own meetings plus those of its peers
//!   one relationship hop away; unresolvable peers are skipped, not fatal
//!
//! # Usage
//!
//! ```
//! use campus_domain::{Group, HasRelationshipLinks, ObjectStore, Person, Registry, schema};
//! use campus_relationship::{RelationshipEngine, SchemaExt};
//! use campus_schedule::{
//!     Activity, ScheduleComposer, SchooldaySlot, Term, Timetable, TimetableDay, TimetableKey,
//!     TimetableModel, TimetableRegistry, WeekdayTemplates,
//! };
//! use campus_store::MemoryStore;
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(Registry::standard()?);
//! let mut engine = RelationshipEngine::default_config(registry.clone());
//! let mut store = MemoryStore::new();
//! let (ona, choir) = (Person::new("Ona"), Group::new("Choir"));
//! store.insert_object(choir.object_ref())?;
//! schema::MEMBERSHIP.link(&mut engine, &mut store, [("member", ona.object_ref()), ("group", choir.object_ref())], None)?;
//!
//! let first = NaiveDate::from_ymd_opt(2024, 9, 2).ok_or("bad date")?;
//! let last = NaiveDate::from_ymd_opt(2024, 9, 6).ok_or("bad date")?;
//! let template = SchooldaySlot::at(15, 0, 60).into_iter().collect();
//!
//! let mut timetables = TimetableRegistry::new();
//! timetables.add_term("autumn", Term::new("Autumn", first, last)?)?;
//! timetables.add_schema("weekly", TimetableModel::weekly_default(WeekdayTemplates::uniform(template))?)?;
//!
//! let mut tt = Timetable::new(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"])?;
//! tt.set_day("Monday", TimetableDay::new(["afternoon"])?)?;
//! tt.add_activity("Monday", "afternoon", Activity::new("Choir practice"))?;
//! timetables.attach(choir.id, TimetableKey::parse("autumn.weekly")?, tt)?;
//!
//! let composer = ScheduleComposer::default_config(registry)?;
//! let schedule = composer.compose(&store, &timetables, &ona, first, last)?;
//! assert_eq!(schedule.len(), 1);
//! assert_eq!(schedule.meetings()[0].title, "Choir practice");
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [composer]
//! check_peer_objects = true
//!
//! [[composer.contributions]]
//! rel_type = "http://schooltool.org/ns/membership"
//! peer_role = "http://schooltool.org/ns/membership/group"
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod composer;
mod config;
mod error;
mod listener;
mod meeting;
mod model;
mod source;
mod term;
mod timetable;

pub use composer::{ComposedSchedule, Contribution, ScheduleComposer, SkippedPeer};
pub use config::{ComposerConfig, ContributionConfig};
pub use error::ScheduleError;
pub use listener::{TimetableEvent, TimetableListener, TracingTimetableListener};
pub use meeting::Meeting;
pub use model::{
    ModelKind, PeriodSlot, SchooldaySlot, SchooldayTemplate, TimetableModel, WeekdayTemplates,
    DEFAULT_WEEKLY_DAY_IDS,
};
pub use source::{TimetableRegistry, TimetableSource};
pub use term::{Term, DEFAULT_SCHOOL_WEEKDAYS};
pub use timetable::{Activity, Timetable, TimetableDay, TimetableKey};

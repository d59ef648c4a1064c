//! Timetable models
//!
//! A model maps calendar dates to timetable day ids and timetable periods
//! to times of the day. Three strategies are supported:
//!
//! - **Weekly**: the weekday picks the day id (Monday is the first id)
//! - **Sequential days**: day ids cycle over schooldays only, so a holiday
//!   shifts every following day; templates are chosen by weekday
//! - **Sequential day ids**: as above, with templates chosen by day id
//!
//! ```text
//! Mon  Day 1        Mon  Day 1
//! Tue  Day 2        Tue  Day 2
//! Wed  (holiday)    Wed  Day 3
//! Thu  Day 3        Thu  Day 4
//! Fri  Day 4        Fri  Day 1
//! ```
//!
//! Exception days replace the usual periods of a date; exception day ids
//! replace the day id of a date without advancing the sequential cycle.

use crate::{Meeting, ScheduleError, Term, Timetable};
use campus_domain::ObjectId;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc, Weekday};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Day ids of the weekly model when none are given
pub const DEFAULT_WEEKLY_DAY_IDS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// A time slot within a schoolday, ordered by start then duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchooldaySlot {
    /// Local start time
    pub tstart: NaiveTime,

    /// Length of the slot
    pub duration: Duration,
}

impl SchooldaySlot {
    /// Create a slot
    pub fn new(tstart: NaiveTime, duration: Duration) -> Self {
        Self { tstart, duration }
    }

    /// Slot starting at `hour:minute` lasting `minutes`
    ///
    /// Returns `None` for an invalid time of day.
    pub fn at(hour: u32, minute: u32, minutes: i64) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|t| Self::new(t, Duration::minutes(minutes)))
    }
}

/// The slots of one kind of schoolday
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchooldayTemplate {
    slots: BTreeSet<SchooldaySlot>,
}

impl SchooldayTemplate {
    /// Create an empty template
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot
    pub fn add(&mut self, slot: SchooldaySlot) {
        self.slots.insert(slot);
    }

    /// Remove a slot, returning whether it was present
    pub fn remove(&mut self, slot: &SchooldaySlot) -> bool {
        self.slots.remove(slot)
    }

    /// Slots in order
    pub fn iter(&self) -> impl Iterator<Item = &SchooldaySlot> {
        self.slots.iter()
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the template has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl FromIterator<SchooldaySlot> for SchooldayTemplate {
    fn from_iter<I: IntoIterator<Item = SchooldaySlot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Day templates indexed by weekday, with an optional fallback
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeekdayTemplates {
    by_weekday: BTreeMap<u32, SchooldayTemplate>,
    fallback: Option<SchooldayTemplate>,
}

impl WeekdayTemplates {
    /// Every weekday uses the same template
    pub fn uniform(template: SchooldayTemplate) -> Self {
        Self {
            by_weekday: BTreeMap::new(),
            fallback: Some(template),
        }
    }

    /// Use a specific template on one weekday
    pub fn with_day(mut self, weekday: Weekday, template: SchooldayTemplate) -> Self {
        self.by_weekday.insert(weekday.num_days_from_monday(), template);
        self
    }

    /// Use a template on weekdays without their own
    pub fn with_fallback(mut self, template: SchooldayTemplate) -> Self {
        self.fallback = Some(template);
        self
    }

    /// Template used on a weekday
    pub fn get(&self, weekday: Weekday) -> Option<&SchooldayTemplate> {
        self.by_weekday
            .get(&weekday.num_days_from_monday())
            .or(self.fallback.as_ref())
    }

    fn validate(&self) -> Result<(), ScheduleError> {
        if self.fallback.is_some() {
            return Ok(());
        }
        for index in 0..7 {
            if !self.by_weekday.contains_key(&index) {
                return Err(ScheduleError::MissingTemplate(format!("weekday {}", index)));
            }
        }
        Ok(())
    }
}

/// Strategy a model uses to pick day ids and templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    /// Day id by weekday, templates by weekday
    Weekly(WeekdayTemplates),

    /// Day ids cycle over schooldays, templates by weekday
    SequentialDays(WeekdayTemplates),

    /// Day ids cycle over schooldays, templates by day id
    SequentialDayIds(BTreeMap<String, SchooldayTemplate>),
}

impl ModelKind {
    /// Stable name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Weekly(_) => "weekly",
            ModelKind::SequentialDays(_) => "sequential_days",
            ModelKind::SequentialDayIds(_) => "sequential_day_ids",
        }
    }

    fn is_sequential(&self) -> bool {
        !matches!(self, ModelKind::Weekly(_))
    }
}

/// A period placed at a time of day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSlot {
    /// Period id from the timetable day
    pub period_id: String,

    /// When the period takes place
    pub slot: SchooldaySlot,
}

impl PeriodSlot {
    /// Create a period slot
    pub fn new(period_id: impl Into<String>, slot: SchooldaySlot) -> Self {
        Self {
            period_id: period_id.into(),
            slot,
        }
    }
}

/// Mapping between calendar days and timetable days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableModel {
    kind: ModelKind,
    day_ids: Vec<String>,
    exception_days: BTreeMap<NaiveDate, Vec<PeriodSlot>>,
    exception_day_ids: BTreeMap<NaiveDate, String>,
    timezone: FixedOffset,
}

impl TimetableModel {
    /// Weekly model: the n-th weekday (Monday first) gets the n-th day id
    ///
    /// # Errors
    /// Returns [`ScheduleError::MissingTemplate`] if some weekday has no
    /// template, or [`ScheduleError::DuplicateId`]
    pub fn weekly<I, D>(day_ids: I, templates: WeekdayTemplates) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        templates.validate()?;
        Self::build(ModelKind::Weekly(templates), day_ids)
    }

    /// Weekly model with Monday to Friday as day ids
    ///
    /// # Errors
    /// See [`TimetableModel::weekly`]
    pub fn weekly_default(templates: WeekdayTemplates) -> Result<Self, ScheduleError> {
        Self::weekly(DEFAULT_WEEKLY_DAY_IDS, templates)
    }

    /// Sequential model with templates chosen by weekday
    ///
    /// # Errors
    /// Returns [`ScheduleError::NoDayIds`], [`ScheduleError::DuplicateId`]
    /// or [`ScheduleError::MissingTemplate`]
    pub fn sequential_days<I, D>(day_ids: I, templates: WeekdayTemplates) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        templates.validate()?;
        Self::build(ModelKind::SequentialDays(templates), day_ids)
    }

    /// Sequential model with one template per day id
    ///
    /// # Errors
    /// Returns [`ScheduleError::MissingTemplate`] if a day id has no
    /// template, or any error of [`TimetableModel::sequential_days`]
    pub fn sequential_day_ids<I, D>(
        day_ids: I,
        templates: BTreeMap<String, SchooldayTemplate>,
    ) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let model = Self::build(ModelKind::SequentialDayIds(templates), day_ids)?;
        if let ModelKind::SequentialDayIds(templates) = &model.kind {
            if let Some(missing) = model.day_ids.iter().find(|id| !templates.contains_key(*id)) {
                return Err(ScheduleError::MissingTemplate(format!("day id {}", missing)));
            }
        }
        Ok(model)
    }

    fn build<I, D>(kind: ModelKind, day_ids: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        for id in day_ids {
            let id = id.into();
            if ids.contains(&id) {
                return Err(ScheduleError::DuplicateId(id));
            }
            ids.push(id);
        }
        if ids.is_empty() && kind.is_sequential() {
            return Err(ScheduleError::NoDayIds);
        }
        Ok(Self {
            kind,
            day_ids: ids,
            exception_days: BTreeMap::new(),
            exception_day_ids: BTreeMap::new(),
            timezone: Utc.fix(),
        })
    }

    /// Interpret slot times in this timezone
    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = timezone;
        self
    }

    /// Strategy of the model
    pub fn kind(&self) -> &ModelKind {
        &self.kind
    }

    /// Timetable day ids, in cycle order
    pub fn day_ids(&self) -> &[String] {
        &self.day_ids
    }

    /// Timezone of slot times
    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Replace the periods of a date; a later call for the same date wins
    pub fn add_exception_day(&mut self, date: NaiveDate, periods: Vec<PeriodSlot>) {
        self.exception_days.insert(date, periods);
    }

    /// Drop the exception for a date, returning it
    pub fn remove_exception_day(&mut self, date: NaiveDate) -> Option<Vec<PeriodSlot>> {
        self.exception_days.remove(&date)
    }

    /// Periods replacing the usual ones on a date
    pub fn exception_day(&self, date: NaiveDate) -> Option<&[PeriodSlot]> {
        self.exception_days.get(&date).map(Vec::as_slice)
    }

    /// Force the day id of a date
    ///
    /// # Errors
    /// Returns [`ScheduleError::UnknownDayId`] if the id is not in the model
    pub fn set_exception_day_id(&mut self, date: NaiveDate, day_id: impl Into<String>) -> Result<(), ScheduleError> {
        let day_id = day_id.into();
        if !self.day_ids.contains(&day_id) {
            return Err(ScheduleError::UnknownDayId(day_id));
        }
        self.exception_day_ids.insert(date, day_id);
        Ok(())
    }

    /// Drop a forced day id, returning it
    pub fn remove_exception_day_id(&mut self, date: NaiveDate) -> Option<String> {
        self.exception_day_ids.remove(&date)
    }

    fn cursor(&self) -> DayIdCursor<'_> {
        DayIdCursor { model: self, next: 0 }
    }

    /// Timetable day id of a date, or `None` if there are no classes
    pub fn day_id(&self, term: &Term, date: NaiveDate) -> Option<String> {
        if !term.is_schoolday(date) {
            return None;
        }
        let mut cursor = self.cursor();
        if self.kind.is_sequential() {
            for earlier in term.schooldays().take_while(|d| *d < date) {
                cursor.advance(earlier);
            }
        }
        cursor.advance(date)
    }

    /// Periods held on a date, ordered by start time
    ///
    /// An exception day registered for the date replaces the usual periods.
    pub fn periods_in_day(&self, term: &Term, timetable: &Timetable, date: NaiveDate) -> Vec<PeriodSlot> {
        self.day_id(term, date)
            .map(|day_id| self.periods_for(timetable, date, &day_id, false))
            .unwrap_or_default()
    }

    /// Periods a date would have without its exception day
    pub fn original_periods_in_day(&self, term: &Term, timetable: &Timetable, date: NaiveDate) -> Vec<PeriodSlot> {
        self.day_id(term, date)
            .map(|day_id| self.periods_for(timetable, date, &day_id, true))
            .unwrap_or_default()
    }

    fn usual_template(&self, date: NaiveDate, day_id: &str) -> Option<&SchooldayTemplate> {
        match &self.kind {
            ModelKind::Weekly(templates) | ModelKind::SequentialDays(templates) => templates.get(date.weekday()),
            ModelKind::SequentialDayIds(templates) => templates.get(day_id),
        }
    }

    fn periods_for(&self, timetable: &Timetable, date: NaiveDate, day_id: &str, original: bool) -> Vec<PeriodSlot> {
        let Some(day) = timetable.day(day_id) else {
            return Vec::new();
        };
        let exception = if original { None } else { self.exception_days.get(&date) };
        let mut periods: Vec<PeriodSlot> = match exception {
            Some(periods) => periods.iter().filter(|p| day.has_period(&p.period_id)).cloned().collect(),
            None => match self.usual_template(date, day_id) {
                Some(template) => day
                    .period_ids()
                    .zip(template.iter())
                    .map(|(period, slot)| PeriodSlot::new(period, *slot))
                    .collect(),
                None => Vec::new(),
            },
        };
        periods.sort_by_key(|p| p.slot.tstart);
        periods
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let utc = local - Duration::seconds(i64::from(self.timezone.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc, Utc)
    }

    /// Meetings of a timetable between `first` and `last` inclusive
    ///
    /// Dates outside the range still advance the sequential day cycle, so
    /// the day ids do not depend on the range asked for.
    pub fn create_meetings(
        &self,
        term: &Term,
        timetable: &Timetable,
        source: ObjectId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Vec<Meeting> {
        let mut meetings = Vec::new();
        let mut cursor = self.cursor();
        for date in term.schooldays() {
            if date > last {
                break;
            }
            let Some(day_id) = cursor.advance(date) else {
                continue;
            };
            if date < first {
                continue;
            }
            let Some(day) = timetable.day(&day_id) else {
                debug!(day_id = %day_id, date = %date, "Timetable has no such day");
                continue;
            };
            for period in self.periods_for(timetable, date, &day_id, false) {
                let start = self.to_utc(date.and_time(period.slot.tstart));
                for activity in day.activities(&period.period_id) {
                    meetings.push(Meeting {
                        start,
                        duration: period.slot.duration,
                        title: activity.title.clone(),
                        day_id: day_id.clone(),
                        period_id: period.period_id.clone(),
                        source,
                        resources: activity.resources.clone(),
                        via: None,
                    });
                }
            }
        }
        meetings
    }
}

/// Walks the day id sequence one schoolday at a time
struct DayIdCursor<'a> {
    model: &'a TimetableModel,
    next: usize,
}

impl DayIdCursor<'_> {
    /// Day id of a schoolday; must be called for schooldays in order
    fn advance(&mut self, date: NaiveDate) -> Option<String> {
        if let Some(day_id) = self.model.exception_day_ids.get(&date) {
            return Some(day_id.clone());
        }
        if self.model.kind.is_sequential() {
            let day_id = self.model.day_ids.get(self.next % self.model.day_ids.len().max(1)).cloned();
            self.next += 1;
            day_id
        } else {
            self.model
                .day_ids
                .get(date.weekday().num_days_from_monday() as usize)
                .cloned()
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sequential_ids_cycle_over_schooldays(
            holidays in proptest::collection::btree_set(0u64..60, 0..20),
            cycle in 1usize..7,
        ) {
            let first = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
            let mut term = Term::new("Term", first, first + Duration::days(59)).unwrap();
            for offset in holidays {
                term.add_holiday(first + Duration::days(offset as i64)).unwrap();
            }
            let ids: Vec<String> = (0..cycle).map(|i| format!("D{}", i)).collect();
            let template: SchooldayTemplate = SchooldaySlot::at(9, 0, 45).into_iter().collect();
            let model = TimetableModel::sequential_days(ids.clone(), WeekdayTemplates::uniform(template)).unwrap();

            for (n, day) in term.schooldays().enumerate() {
                prop_assert_eq!(model.day_id(&term, day), Some(ids[n % cycle].clone()));
            }
            for day in term.dates().filter(|d| !term.is_schoolday(*d)) {
                prop_assert_eq!(model.day_id(&term, day), None);
            }
        }
    }
}

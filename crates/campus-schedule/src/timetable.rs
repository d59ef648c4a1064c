//! Timetables: activities placed into the periods of timetable days

use crate::ScheduleError;
use campus_domain::ObjectId;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Something that happens in a period, e.g. a lesson
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Activity {
    /// Title shown on the meeting
    pub title: String,

    /// Object the activity belongs to, usually a section
    pub owner: Option<ObjectId>,

    /// Resources used by the activity
    pub resources: Vec<ObjectId>,
}

impl Activity {
    /// Create an activity with no owner or resources
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            owner: None,
            resources: Vec::new(),
        }
    }

    /// Set the owning object
    pub fn with_owner(mut self, owner: ObjectId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Add a resource
    pub fn with_resource(mut self, resource: ObjectId) -> Self {
        self.resources.push(resource);
        self
    }
}

/// One day of a timetable: ordered periods, each with its activities
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimetableDay {
    periods: Vec<(String, Vec<Activity>)>,
}

impl TimetableDay {
    /// Create a day with the given periods, in order
    ///
    /// # Errors
    /// Returns [`ScheduleError::DuplicateId`] if a period repeats
    pub fn new<I, P>(period_ids: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut periods: Vec<(String, Vec<Activity>)> = Vec::new();
        for id in period_ids {
            let id = id.into();
            if periods.iter().any(|(p, _)| *p == id) {
                return Err(ScheduleError::DuplicateId(id));
            }
            periods.push((id, Vec::new()));
        }
        Ok(Self { periods })
    }

    /// Period ids in order
    pub fn period_ids(&self) -> impl Iterator<Item = &str> {
        self.periods.iter().map(|(p, _)| p.as_str())
    }

    /// Whether the day has this period
    pub fn has_period(&self, period: &str) -> bool {
        self.periods.iter().any(|(p, _)| p == period)
    }

    /// Activities of a period (empty for unknown periods)
    pub fn activities(&self, period: &str) -> &[Activity] {
        self.periods
            .iter()
            .find(|(p, _)| p == period)
            .map(|(_, a)| a.as_slice())
            .unwrap_or(&[])
    }

    /// Place an activity into a period, ignoring exact duplicates
    pub(crate) fn add(&mut self, day_id: &str, period: &str, activity: Activity) -> Result<(), ScheduleError> {
        let (_, activities) = self
            .periods
            .iter_mut()
            .find(|(p, _)| p == period)
            .ok_or_else(|| ScheduleError::UnknownPeriod {
                day_id: day_id.to_string(),
                period: period.to_string(),
            })?;
        if !activities.contains(&activity) {
            activities.push(activity);
        }
        Ok(())
    }

    /// Remove every activity from a period
    pub fn clear(&mut self, period: &str) {
        if let Some((_, activities)) = self.periods.iter_mut().find(|(p, _)| p == period) {
            activities.clear();
        }
    }

    fn activity_count(&self) -> usize {
        self.periods.iter().map(|(_, a)| a.len()).sum()
    }
}

/// A timetable for one term and one timetable schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    day_ids: Vec<String>,
    days: BTreeMap<String, TimetableDay>,
}

impl Timetable {
    /// Create a timetable whose days have no periods yet
    ///
    /// # Errors
    /// Returns [`ScheduleError::DuplicateId`] if a day id repeats
    pub fn new<I, D>(day_ids: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        let mut days = BTreeMap::new();
        for id in day_ids {
            let id = id.into();
            if days.insert(id.clone(), TimetableDay::default()).is_some() {
                return Err(ScheduleError::DuplicateId(id));
            }
            ids.push(id);
        }
        Ok(Self { day_ids: ids, days })
    }

    /// Day ids in order
    pub fn day_ids(&self) -> &[String] {
        &self.day_ids
    }

    /// Set the periods of a day, dropping its activities
    ///
    /// # Errors
    /// Returns [`ScheduleError::UnknownDayId`] if the day is not part of
    /// the timetable
    pub fn set_day(&mut self, day_id: &str, day: TimetableDay) -> Result<(), ScheduleError> {
        let slot = self
            .days
            .get_mut(day_id)
            .ok_or_else(|| ScheduleError::UnknownDayId(day_id.to_string()))?;
        *slot = day;
        Ok(())
    }

    /// A day of the timetable
    pub fn day(&self, day_id: &str) -> Option<&TimetableDay> {
        self.days.get(day_id)
    }

    /// Place an activity into a period of a day
    ///
    /// # Errors
    /// Returns [`ScheduleError::UnknownDayId`] or
    /// [`ScheduleError::UnknownPeriod`]
    pub fn add_activity(&mut self, day_id: &str, period: &str, activity: Activity) -> Result<(), ScheduleError> {
        self.days
            .get_mut(day_id)
            .ok_or_else(|| ScheduleError::UnknownDayId(day_id.to_string()))?
            .add(day_id, period, activity)
    }

    /// Number of activities across all days
    pub fn activity_count(&self) -> usize {
        self.days.values().map(TimetableDay::activity_count).sum()
    }

    /// Same days and periods, no activities
    pub fn clone_empty(&self) -> Self {
        let days = self
            .days
            .iter()
            .map(|(id, day)| {
                let periods = day.periods.iter().map(|(p, _)| (p.clone(), Vec::new())).collect();
                (id.clone(), TimetableDay { periods })
            })
            .collect();
        Self {
            day_ids: self.day_ids.clone(),
            days,
        }
    }

    /// Add every activity of `other` whose day and period exist here
    ///
    /// Returns how many activities had no place to go.
    pub fn merge(&mut self, other: &Timetable) -> usize {
        let mut dropped = 0;
        for (day_id, day) in &other.days {
            for (period, activities) in &day.periods {
                for activity in activities {
                    if self.add_activity(day_id, period, activity.clone()).is_err() {
                        dropped += 1;
                    }
                }
            }
        }
        dropped
    }
}

/// Key of a timetable: the term id and the timetable schema id
///
/// Written as `"term.schema"`; neither part may be empty or contain a dot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimetableKey {
    /// Term id
    pub term: String,

    /// Timetable schema id
    pub schema: String,
}

impl TimetableKey {
    /// Build a key from its parts
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidTimetableKey`] if a part is empty or
    /// contains a dot
    pub fn new(term: impl Into<String>, schema: impl Into<String>) -> Result<Self, ScheduleError> {
        let (term, schema) = (term.into(), schema.into());
        if !valid_part(&term) || !valid_part(&schema) {
            return Err(ScheduleError::InvalidTimetableKey(format!("{}.{}", term, schema)));
        }
        Ok(Self { term, schema })
    }

    /// Parse a `"term.schema"` key
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidTimetableKey`] for anything else
    pub fn parse(key: &str) -> Result<Self, ScheduleError> {
        let (term, schema) = key
            .split_once('.')
            .ok_or_else(|| ScheduleError::InvalidTimetableKey(key.to_string()))?;
        Self::new(term, schema).map_err(|_| ScheduleError::InvalidTimetableKey(key.to_string()))
    }
}

fn valid_part(part: &str) -> bool {
    !part.is_empty() && !part.contains('.')
}

impl fmt::Display for TimetableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.term, self.schema)
    }
}

impl FromStr for TimetableKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_day_timetable() -> Timetable {
        let mut tt = Timetable::new(["A", "B"]).unwrap();
        tt.set_day("A", TimetableDay::new(["Green", "Blue"]).unwrap()).unwrap();
        tt.set_day("B", TimetableDay::new(["Green", "Blue"]).unwrap()).unwrap();
        tt
    }

    #[test]
    fn test_activities() {
        let mut tt = two_day_timetable();
        tt.add_activity("A", "Green", Activity::new("English")).unwrap();
        tt.add_activity("A", "Green", Activity::new("English")).unwrap();
        tt.add_activity("A", "Green", Activity::new("Math")).unwrap();

        let day = tt.day("A").unwrap();
        assert_eq!(day.activities("Green").len(), 2);
        assert!(day.activities("Blue").is_empty());
        assert!(day.activities("Red").is_empty());
        assert_eq!(tt.activity_count(), 2);
    }

    #[test]
    fn test_activity_builder() {
        let (section, room) = (ObjectId::new(), ObjectId::new());
        let activity = Activity::new("Chemistry").with_owner(section).with_resource(room);
        assert_eq!(activity.owner, Some(section));
        assert_eq!(activity.resources, vec![room]);
        assert_ne!(activity, Activity::new("Chemistry"));
    }

    #[test]
    fn test_unknown_day_and_period() {
        let mut tt = two_day_timetable();
        assert!(matches!(
            tt.add_activity("C", "Green", Activity::new("Art")),
            Err(ScheduleError::UnknownDayId(_))
        ));
        assert!(matches!(
            tt.add_activity("A", "Red", Activity::new("Art")),
            Err(ScheduleError::UnknownPeriod { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids() {
        assert!(matches!(Timetable::new(["A", "A"]), Err(ScheduleError::DuplicateId(_))));
        assert!(matches!(TimetableDay::new(["1", "1"]), Err(ScheduleError::DuplicateId(_))));
    }

    #[test]
    fn test_clone_empty_and_merge() {
        let mut english = two_day_timetable();
        english.add_activity("A", "Green", Activity::new("English")).unwrap();
        let mut math = two_day_timetable();
        math.add_activity("A", "Blue", Activity::new("Math")).unwrap();

        let mut composite = english.clone_empty();
        assert_eq!(composite.activity_count(), 0);
        assert_eq!(composite.merge(&english), 0);
        assert_eq!(composite.merge(&math), 0);
        assert_eq!(composite.activity_count(), 2);
        assert_eq!(composite.day("A").unwrap().activities("Blue")[0].title, "Math");
    }

    #[test]
    fn test_merge_drops_unplaceable() {
        let mut composite = two_day_timetable();
        let mut other = Timetable::new(["A"]).unwrap();
        other.set_day("A", TimetableDay::new(["Red"]).unwrap()).unwrap();
        other.add_activity("A", "Red", Activity::new("Art")).unwrap();
        assert_eq!(composite.merge(&other), 1);
    }

    #[test]
    fn test_timetable_key() {
        let key: TimetableKey = "2024-autumn.weekly".parse().unwrap();
        assert_eq!(key.term, "2024-autumn");
        assert_eq!(key.schema, "weekly");
        assert_eq!(key.to_string(), "2024-autumn.weekly");

        for bad in ["", "autumn", ".weekly", "autumn.", "a.b.c"] {
            assert!(TimetableKey::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}

//! School terms: a date range with school weekdays and holidays

use crate::ScheduleError;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Monday to Friday
pub const DEFAULT_SCHOOL_WEEKDAYS: [Weekday; 5] =
    [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];

/// A school term
///
/// A date is a schoolday when it lies within `first..=last`, falls on a
/// school weekday and is not a holiday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    title: String,
    first: NaiveDate,
    last: NaiveDate,
    weekdays: [bool; 7],
    holidays: BTreeSet<NaiveDate>,
}

impl Term {
    /// Create a term with the default school weekdays and no holidays
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidTerm`] if `last` is before `first`
    pub fn new(title: impl Into<String>, first: NaiveDate, last: NaiveDate) -> Result<Self, ScheduleError> {
        if last < first {
            return Err(ScheduleError::InvalidTerm { first, last });
        }
        let mut term = Self {
            title: title.into(),
            first,
            last,
            weekdays: [false; 7],
            holidays: BTreeSet::new(),
        };
        term.set_school_weekdays(&DEFAULT_SCHOOL_WEEKDAYS);
        Ok(term)
    }

    /// Replace the set of school weekdays
    pub fn with_school_weekdays(mut self, weekdays: &[Weekday]) -> Self {
        self.set_school_weekdays(weekdays);
        self
    }

    fn set_school_weekdays(&mut self, weekdays: &[Weekday]) {
        self.weekdays = [false; 7];
        for day in weekdays {
            self.weekdays[day.num_days_from_monday() as usize] = true;
        }
    }

    /// Mark a date as a holiday
    ///
    /// # Errors
    /// Returns [`ScheduleError::OutsideTerm`] if the date is not in the term
    pub fn add_holiday(&mut self, date: NaiveDate) -> Result<(), ScheduleError> {
        if !self.contains(date) {
            return Err(ScheduleError::OutsideTerm(date));
        }
        self.holidays.insert(date);
        Ok(())
    }

    /// Unmark a holiday, returning whether it was one
    pub fn remove_holiday(&mut self, date: NaiveDate) -> bool {
        self.holidays.remove(&date)
    }

    /// Title of the term
    pub fn title(&self) -> &str {
        &self.title
    }

    /// First day of the term
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the term
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Whether the date lies within the term
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Whether the weekday is a school weekday
    pub fn is_school_weekday(&self, weekday: Weekday) -> bool {
        self.weekdays[weekday.num_days_from_monday() as usize]
    }

    /// Whether classes may be held on this date
    pub fn is_schoolday(&self, date: NaiveDate) -> bool {
        self.contains(date) && self.is_school_weekday(date.weekday()) && !self.holidays.contains(&date)
    }

    /// Holidays, in date order
    pub fn holidays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.holidays.iter().copied()
    }

    /// Every date of the term, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last;
        self.first.iter_days().take_while(move |d| *d <= last)
    }

    /// Every schoolday of the term, in order
    pub fn schooldays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates().filter(move |d| self.is_schoolday(*d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invalid_term() {
        let err = Term::new("Backwards", date(2024, 9, 10), date(2024, 9, 1)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTerm { .. }));
    }

    #[test]
    fn test_schooldays() {
        // 2024-09-02 is a Monday
        let mut term = Term::new("Autumn", date(2024, 9, 2), date(2024, 9, 15)).unwrap();
        assert!(term.is_schoolday(date(2024, 9, 2)));
        assert!(!term.is_schoolday(date(2024, 9, 7)));
        assert!(!term.is_schoolday(date(2024, 9, 16)));

        term.add_holiday(date(2024, 9, 4)).unwrap();
        assert!(!term.is_schoolday(date(2024, 9, 4)));
        assert_eq!(term.schooldays().count(), 9);

        assert!(term.remove_holiday(date(2024, 9, 4)));
        assert_eq!(term.schooldays().count(), 10);
    }

    #[test]
    fn test_holiday_outside_term() {
        let mut term = Term::new("Autumn", date(2024, 9, 2), date(2024, 9, 6)).unwrap();
        assert!(matches!(
            term.add_holiday(date(2024, 10, 1)),
            Err(ScheduleError::OutsideTerm(_))
        ));
    }

    #[test]
    fn test_custom_weekdays() {
        let term = Term::new("Weekend school", date(2024, 9, 2), date(2024, 9, 8))
            .unwrap()
            .with_school_weekdays(&[Weekday::Sat, Weekday::Sun]);
        let days: Vec<_> = term.schooldays().collect();
        assert_eq!(days, vec![date(2024, 9, 7), date(2024, 9, 8)]);
    }

    #[test]
    fn test_dates_single_day() {
        let term = Term::new("One day", date(2024, 9, 2), date(2024, 9, 2)).unwrap();
        assert_eq!(term.dates().count(), 1);
    }
}

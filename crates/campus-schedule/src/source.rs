//! Timetable storage collaborator
//!
//! The composer asks a [`TimetableSource`] for the meetings an object owns
//! directly. [`TimetableRegistry`] is the in-process implementation: terms
//! and timetable schemas by id, and each owner's timetables keyed by
//! `"term.schema"`. Exception days live in the schema's model, so the
//! override table is effectively keyed by (date, schema id).

use crate::{Meeting, ScheduleError, Term, Timetable, TimetableEvent, TimetableKey, TimetableListener, TimetableModel};
use campus_domain::ObjectId;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Provider of the meetings an object owns directly
pub trait TimetableSource {
    /// Error type of the source
    type Error: Display;

    /// Meetings of `owner`'s own timetables within `first..=last`, ordered
    /// by start
    fn own_meetings(&self, owner: ObjectId, first: NaiveDate, last: NaiveDate) -> Result<Vec<Meeting>, Self::Error>;

    /// Keys of `owner`'s own timetables
    fn timetable_keys(&self, owner: ObjectId) -> Result<Vec<TimetableKey>, Self::Error>;
}

/// In-memory terms, schemas and timetables
#[derive(Debug, Clone, Default)]
pub struct TimetableRegistry {
    terms: BTreeMap<String, Term>,
    schemas: BTreeMap<String, TimetableModel>,
    timetables: HashMap<ObjectId, BTreeMap<TimetableKey, Timetable>>,
    listeners: Vec<Arc<dyn TimetableListener>>,
}

fn check_id(id: &str) -> Result<(), ScheduleError> {
    // Ids become halves of a timetable key
    TimetableKey::new(id, "x").map(|_| ())
}

impl TimetableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener told about every later change
    pub fn add_listener(&mut self, listener: Arc<dyn TimetableListener>) {
        self.listeners.push(listener);
    }

    fn notify(&self, event: TimetableEvent) {
        for listener in &self.listeners {
            listener.notify(&event);
        }
    }

    /// Register or replace a term
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidTimetableKey`] if the id is empty or
    /// contains a dot
    pub fn add_term(&mut self, id: impl Into<String>, term: Term) -> Result<(), ScheduleError> {
        let id = id.into();
        check_id(&id)?;
        self.terms.insert(id.clone(), term);
        self.notify(TimetableEvent::TermChanged(id));
        Ok(())
    }

    /// Remove a term; timetables referring to it become unresolvable
    pub fn remove_term(&mut self, id: &str) -> Option<Term> {
        let removed = self.terms.remove(id)?;
        self.notify(TimetableEvent::TermChanged(id.to_string()));
        Some(removed)
    }

    /// A registered term
    pub fn term(&self, id: &str) -> Option<&Term> {
        self.terms.get(id)
    }

    /// Register or replace a timetable schema
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidTimetableKey`] if the id is empty or
    /// contains a dot
    pub fn add_schema(&mut self, id: impl Into<String>, model: TimetableModel) -> Result<(), ScheduleError> {
        let id = id.into();
        check_id(&id)?;
        self.schemas.insert(id.clone(), model);
        self.notify(TimetableEvent::SchemaChanged(id));
        Ok(())
    }

    /// Remove a schema; timetables referring to it become unresolvable
    pub fn remove_schema(&mut self, id: &str) -> Option<TimetableModel> {
        let removed = self.schemas.remove(id)?;
        self.notify(TimetableEvent::SchemaChanged(id.to_string()));
        Some(removed)
    }

    /// A registered schema
    pub fn schema(&self, id: &str) -> Option<&TimetableModel> {
        self.schemas.get(id)
    }

    /// Edit a schema in place, e.g. to add exception days
    ///
    /// Returns `None` for an unknown schema. Listeners receive
    /// [`TimetableEvent::SchemaChanged`] once `edit` has returned.
    pub fn update_schema<R>(&mut self, id: &str, edit: impl FnOnce(&mut TimetableModel) -> R) -> Option<R> {
        let result = edit(self.schemas.get_mut(id)?);
        self.notify(TimetableEvent::SchemaChanged(id.to_string()));
        Some(result)
    }

    /// Give `owner` a timetable, replacing any under the same key
    ///
    /// # Errors
    /// Returns [`ScheduleError::UnknownTerm`], [`ScheduleError::UnknownSchema`]
    /// or [`ScheduleError::DayIdMismatch`] if the timetable's days differ
    /// from the schema's
    pub fn attach(&mut self, owner: ObjectId, key: TimetableKey, timetable: Timetable) -> Result<(), ScheduleError> {
        if !self.terms.contains_key(&key.term) {
            return Err(ScheduleError::UnknownTerm(key.term));
        }
        let model = self
            .schemas
            .get(&key.schema)
            .ok_or_else(|| ScheduleError::UnknownSchema(key.schema.clone()))?;
        if model.day_ids() != timetable.day_ids() {
            return Err(ScheduleError::DayIdMismatch {
                expected: model.day_ids().to_vec(),
                found: timetable.day_ids().to_vec(),
            });
        }
        debug!(owner = %owner, key = %key, "Timetable attached");
        self.timetables.entry(owner).or_default().insert(key.clone(), timetable);
        self.notify(TimetableEvent::Attached { owner, key });
        Ok(())
    }

    /// Take a timetable away from `owner`
    pub fn detach(&mut self, owner: ObjectId, key: &TimetableKey) -> Option<Timetable> {
        let timetables = self.timetables.get_mut(&owner)?;
        let removed = timetables.remove(key)?;
        if timetables.is_empty() {
            self.timetables.remove(&owner);
        }
        self.notify(TimetableEvent::Detached {
            owner,
            key: key.clone(),
        });
        Some(removed)
    }

    /// A timetable of `owner`
    pub fn timetable(&self, owner: ObjectId, key: &TimetableKey) -> Option<&Timetable> {
        self.timetables.get(&owner).and_then(|t| t.get(key))
    }

    /// Drop every timetable of `owner`, returning how many there were
    pub fn remove_owner(&mut self, owner: ObjectId) -> usize {
        let Some(timetables) = self.timetables.remove(&owner) else {
            return 0;
        };
        for key in timetables.keys() {
            self.notify(TimetableEvent::Detached {
                owner,
                key: key.clone(),
            });
        }
        timetables.len()
    }

    /// Owners of timetables for a term or a schema id
    pub fn owners_using(&self, id: &str) -> Vec<(ObjectId, TimetableKey)> {
        let mut found: Vec<_> = self
            .timetables
            .iter()
            .flat_map(|(owner, timetables)| timetables.keys().map(move |key| (*owner, key)))
            .filter(|(_, key)| key.term == id || key.schema == id)
            .map(|(owner, key)| (owner, key.clone()))
            .collect();
        found.sort();
        found
    }
}

impl TimetableSource for TimetableRegistry {
    type Error = ScheduleError;

    fn own_meetings(&self, owner: ObjectId, first: NaiveDate, last: NaiveDate) -> Result<Vec<Meeting>, ScheduleError> {
        if last < first {
            return Err(ScheduleError::InvalidRange { first, last });
        }
        let Some(timetables) = self.timetables.get(&owner) else {
            return Ok(Vec::new());
        };
        let mut meetings = Vec::new();
        for (key, timetable) in timetables {
            let term = self
                .terms
                .get(&key.term)
                .ok_or_else(|| ScheduleError::UnknownTerm(key.term.clone()))?;
            let model = self
                .schemas
                .get(&key.schema)
                .ok_or_else(|| ScheduleError::UnknownSchema(key.schema.clone()))?;
            meetings.extend(model.create_meetings(term, timetable, owner, first, last));
        }
        meetings.sort_by_key(|m| m.start);
        Ok(meetings)
    }

    fn timetable_keys(&self, owner: ObjectId) -> Result<Vec<TimetableKey>, ScheduleError> {
        Ok(self
            .timetables
            .get(&owner)
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default())
    }
}

//! Per-object schedule composition
//!
//! A composed schedule is the object's own meetings plus the own meetings
//! of every peer reached through a contributing relationship. Composition
//! goes exactly one hop: peers of peers never contribute.

use crate::{ComposerConfig, Meeting, ScheduleError, TimetableKey, TimetableSource};
use campus_domain::{HasRelationshipLinks, ObjectRef, ObjectStore, Registry, Uri};
use campus_relationship::related_objects;
use chrono::{FixedOffset, NaiveDate};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

/// A relationship type and the role its contributing peers play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    /// Relationship type
    pub rel_type: Uri,

    /// Role of the peer
    pub peer_role: Uri,
}

/// A peer left out of a composed schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPeer {
    /// The peer
    pub peer: ObjectRef,

    /// Relationship type that led to it
    pub via: Uri,

    /// Why its meetings are missing
    pub reason: String,
}

/// Result of a composition: meetings ordered by start, and skipped peers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedSchedule {
    meetings: Vec<Meeting>,
    skipped: Vec<SkippedPeer>,
}

impl ComposedSchedule {
    /// Meetings ordered by start
    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    /// Peers whose meetings could not be collected
    pub fn skipped(&self) -> &[SkippedPeer] {
        &self.skipped
    }

    /// Whether some peer was skipped
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Number of meetings
    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    /// Whether there are no meetings
    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Meetings starting on a calendar date in `timezone`
    pub fn on<'a>(&'a self, date: NaiveDate, timezone: &'a FixedOffset) -> impl Iterator<Item = &'a Meeting> + 'a {
        self.meetings.iter().filter(move |m| m.local_date(timezone) == date)
    }

    /// The meetings, dropping the skip report
    pub fn into_meetings(self) -> Vec<Meeting> {
        self.meetings
    }
}

/// Builds effective schedules from own and peer timetables
#[derive(Debug, Clone)]
pub struct ScheduleComposer {
    registry: Arc<Registry>,
    contributions: Vec<Contribution>,
    check_peer_objects: bool,
}

impl ScheduleComposer {
    /// Create a composer, resolving the configured URIs in the registry
    ///
    /// # Errors
    /// Returns [`ScheduleError::Config`] if a URI is not registered
    pub fn new(registry: Arc<Registry>, config: &ComposerConfig) -> Result<Self, ScheduleError> {
        let resolve = |uri: &str| {
            registry
                .resolve(uri)
                .ok_or_else(|| ScheduleError::Config(format!("URI {} is not registered", uri)))
        };
        let contributions = config
            .contributions
            .iter()
            .map(|c| {
                Ok(Contribution {
                    rel_type: resolve(&c.rel_type)?,
                    peer_role: resolve(&c.peer_role)?,
                })
            })
            .collect::<Result<Vec<_>, ScheduleError>>()?;
        Ok(Self {
            registry,
            contributions,
            check_peer_objects: config.check_peer_objects,
        })
    }

    /// Composer with the default contributions
    ///
    /// # Errors
    /// See [`ScheduleComposer::new`]
    pub fn default_config(registry: Arc<Registry>) -> Result<Self, ScheduleError> {
        Self::new(registry, &ComposerConfig::default())
    }

    /// The registry the composer resolved its URIs in
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Contributing relationships, in configuration order
    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    /// Compose the schedule of `obj` for `first..=last`
    ///
    /// Meetings are ordered by start. Identical meetings reached through
    /// different relationships are all kept, each with its `via`.
    ///
    /// # Errors
    /// Fails if the range is empty, if the object's own meetings cannot be
    /// read, or if its links cannot be read. A failing peer never fails
    /// the composition; it is reported in [`ComposedSchedule::skipped`].
    pub fn compose<S, T>(
        &self,
        store: &S,
        source: &T,
        obj: &impl HasRelationshipLinks,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<ComposedSchedule, ScheduleError>
    where
        S: ObjectStore,
        S::Error: Display,
        T: TimetableSource,
    {
        if last < first {
            return Err(ScheduleError::InvalidRange { first, last });
        }
        let me = obj.object_ref();
        let mut meetings = source
            .own_meetings(me.id, first, last)
            .map_err(|e| ScheduleError::Source(e.to_string()))?;
        let mut skipped = Vec::new();

        for contribution in &self.contributions {
            for peer in self.peers(store, obj, contribution)? {
                let found = self
                    .check_peer(store, peer)
                    .and_then(|()| source.own_meetings(peer.id, first, last).map_err(|e| e.to_string()));
                match found {
                    Ok(found) => meetings.extend(found.into_iter().map(|m| m.with_via(&contribution.rel_type))),
                    Err(reason) => skipped.push(skip(me, peer, contribution, reason)),
                }
            }
        }

        meetings.sort_by_key(|m| m.start);
        info!(
            object = %me,
            meetings = meetings.len(),
            skipped = skipped.len(),
            "Schedule composed"
        );
        Ok(ComposedSchedule { meetings, skipped })
    }

    /// Peers reached through one contribution, without the object itself
    fn peers<S>(
        &self,
        store: &S,
        obj: &impl HasRelationshipLinks,
        contribution: &Contribution,
    ) -> Result<Vec<ObjectRef>, ScheduleError>
    where
        S: ObjectStore,
        S::Error: Display,
    {
        let me = obj.object_id();
        Ok(related_objects(store, obj, &contribution.peer_role, Some(&contribution.rel_type))?
            .into_iter()
            .filter(|peer| peer.id != me)
            .collect())
    }

    fn check_peer<S>(&self, store: &S, peer: ObjectRef) -> Result<(), String>
    where
        S: ObjectStore,
        S::Error: Display,
    {
        if !self.check_peer_objects {
            return Ok(());
        }
        match store.object(peer.id) {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err("object no longer exists".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Keys of the timetables that contribute to the schedule of `obj`
    ///
    /// Peers are chosen as in [`ScheduleComposer::compose`]; those that
    /// cannot be read are left out with a warning.
    ///
    /// # Errors
    /// Fails if the object's own keys or links cannot be read
    pub fn composite_keys<S, T>(
        &self,
        store: &S,
        source: &T,
        obj: &impl HasRelationshipLinks,
    ) -> Result<BTreeSet<TimetableKey>, ScheduleError>
    where
        S: ObjectStore,
        S::Error: Display,
        T: TimetableSource,
    {
        let me = obj.object_ref();
        let mut keys: BTreeSet<TimetableKey> = source
            .timetable_keys(me.id)
            .map_err(|e| ScheduleError::Source(e.to_string()))?
            .into_iter()
            .collect();
        for contribution in &self.contributions {
            for peer in self.peers(store, obj, contribution)? {
                let found = self
                    .check_peer(store, peer)
                    .and_then(|()| source.timetable_keys(peer.id).map_err(|e| e.to_string()));
                match found {
                    Ok(found) => keys.extend(found),
                    Err(reason) => {
                        skip(me, peer, contribution, reason);
                    }
                }
            }
        }
        Ok(keys)
    }
}

fn skip(me: ObjectRef, peer: ObjectRef, contribution: &Contribution, reason: String) -> SkippedPeer {
    warn!(
        object = %me,
        peer = %peer,
        rel_type = %contribution.rel_type,
        reason = %reason,
        "Skipping peer with unresolvable timetable"
    );
    SkippedPeer {
        peer,
        via: contribution.rel_type.clone(),
        reason,
    }
}

//! Relate/unrelate engine
//!
//! Every mutation follows the same steps: load the link sets involved,
//! check for duplicates or missing halves, ask the constraints, then hand
//! all modified sets to the store in one commit. Nothing is written unless
//! every check passed.

use crate::constraints::{standard_constraints, ConstraintResult, RelationshipConstraint};
use crate::listener::{RelationshipListener, TracingListener};
use crate::query::{load, RelationshipInfo};
use crate::{EngineConfig, EngineMetrics, RelationshipError};
use campus_domain::{
    HasRelationshipLinks, Link, LinkKey, LinkReader, LinkSet, LinkStore, ObjectId, ObjectStore, Participant,
    Registry, RelationshipEvent, RelationshipEventKind, Uri,
};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

fn store_error(e: impl Display) -> RelationshipError {
    RelationshipError::Store(e.to_string())
}

/// The relationship engine
///
/// Holds the registry, the constraints and the listeners. Link sets are
/// never cached: each call reads them from the store it is given.
///
/// # Examples
///
/// ```
/// use campus_domain::{uris, Group, HasRelationshipLinks, Participant, Person, Registry};
/// use campus_relationship::{related_objects, EngineConfig, RelationshipEngine};
/// use campus_store::MemoryStore;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = Arc::new(Registry::standard()?);
/// let mut engine = RelationshipEngine::new(registry, EngineConfig::default());
/// let mut store = MemoryStore::new();
///
/// let group = Group::new("Chess club");
/// let person = Person::new("Ona");
/// engine.relate(
///     &mut store,
///     &uris::MEMBERSHIP,
///     Participant::new(person.object_ref(), uris::MEMBER),
///     Participant::new(group.object_ref(), uris::GROUP),
///     None,
/// )?;
///
/// let members = related_objects(&store, &group, &uris::MEMBER, Some(&uris::MEMBERSHIP))?;
/// assert!(members.contains(person.id));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RelationshipEngine {
    registry: Arc<Registry>,
    config: EngineConfig,
    constraints: Vec<Box<dyn RelationshipConstraint>>,
    listeners: Vec<Box<dyn RelationshipListener>>,
    metrics: EngineMetrics,
}

impl RelationshipEngine {
    /// Create an engine with the built-in constraints the config asks for
    pub fn new(registry: Arc<Registry>, config: EngineConfig) -> Self {
        let constraints = if config.enforce_constraints {
            standard_constraints(config.allow_nested_groups)
        } else {
            Vec::new()
        };
        let mut listeners: Vec<Box<dyn RelationshipListener>> = Vec::new();
        if config.log_events {
            listeners.push(Box::new(TracingListener));
        }
        Self {
            registry,
            config,
            constraints,
            listeners,
            metrics: EngineMetrics::new(),
        }
    }

    /// Create an engine with default configuration
    pub fn default_config(registry: Arc<Registry>) -> Self {
        Self::new(registry, EngineConfig::default())
    }

    /// Append a constraint, run after the existing ones
    pub fn with_constraint(mut self, constraint: impl RelationshipConstraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    /// Register a listener
    pub fn add_listener(&mut self, listener: impl RelationshipListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The registry the engine was built with
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    fn notify(&self, event: &RelationshipEvent) {
        for listener in &self.listeners {
            listener.notify(event);
        }
    }

    fn check(&mut self, event: &RelationshipEvent, links: &dyn LinkReader) -> Result<(), RelationshipError> {
        for constraint in &self.constraints {
            let result = match event.kind {
                RelationshipEventKind::BeforeAdd => constraint.before_add(event, links),
                RelationshipEventKind::BeforeRemove => constraint.before_remove(event, links),
                _ => ConstraintResult::Continue,
            };
            if let ConstraintResult::Veto(reason) = result {
                self.metrics.record_veto();
                warn!(
                    constraint = constraint.name(),
                    rel_type = %event.rel_type,
                    %reason,
                    "Relationship vetoed"
                );
                return Err(RelationshipError::InvalidRelationship(reason));
            }
        }
        Ok(())
    }

    /// Establish a relationship between two participants
    ///
    /// Adds a link to each participant's link set and commits both in one
    /// call. `extra_info` is shared by both halves.
    ///
    /// # Errors
    /// - [`RelationshipError::SelfRelationship`] if both ends are the same
    ///   object and the type does not allow it (or both roles are equal)
    /// - [`RelationshipError::DuplicateRelationship`] if either half exists
    /// - [`RelationshipError::InvalidRelationship`] if a constraint vetoes
    /// - [`RelationshipError::Store`] if the store fails
    pub fn relate<S>(
        &mut self,
        store: &mut S,
        rel_type: &Uri,
        first: Participant,
        second: Participant,
        extra_info: Option<String>,
    ) -> Result<(), RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let (a, b) = (first.object, second.object);
        let same = a.id == b.id;
        if same && (first.role == second.role || !self.registry.policy(rel_type).allow_self) {
            return Err(RelationshipError::SelfRelationship {
                rel_type: rel_type.clone(),
                object: a,
            });
        }

        let link_a = Link::new(rel_type.clone(), first.role.clone(), b, second.role.clone())
            .with_extra_info(extra_info.clone());
        let link_b = Link::new(rel_type.clone(), second.role.clone(), a, first.role.clone())
            .with_extra_info(extra_info.clone());

        let mut set_a = load(store, a.id)?;
        let mut set_b = if same { None } else { Some(load(store, b.id)?) };

        let duplicate = set_a.contains(&link_a.key()) || set_b.as_ref().unwrap_or(&set_a).contains(&link_b.key());
        if duplicate {
            self.metrics.record_duplicate();
            debug!(rel_type = %rel_type, first = %a, second = %b, "Duplicate relationship rejected");
            return Err(RelationshipError::DuplicateRelationship {
                rel_type: rel_type.clone(),
                first: a,
                second: b,
            });
        }

        let event = RelationshipEvent::new(RelationshipEventKind::BeforeAdd, rel_type.clone(), first, second, extra_info);
        self.check(&event, &*store)?;
        self.notify(&event);

        set_a.add(link_a)?;
        match set_b.as_mut() {
            Some(set) => set.add(link_b)?,
            None => set_a.add(link_b)?,
        }
        let mut sets = vec![set_a];
        sets.extend(set_b);
        store.commit(sets).map_err(store_error)?;

        self.metrics.record_created(2);
        debug!(rel_type = %rel_type, first = %a, second = %b, "Relationship added");
        self.notify(&event.with_kind(RelationshipEventKind::Added));
        Ok(())
    }

    /// Break a relationship between two participants
    ///
    /// # Errors
    /// - [`RelationshipError::NoSuchRelationship`] if either half is missing;
    ///   nothing is removed in that case
    /// - [`RelationshipError::InvalidRelationship`] if a constraint vetoes
    /// - [`RelationshipError::Store`] if the store fails
    pub fn unrelate<S>(
        &mut self,
        store: &mut S,
        rel_type: &Uri,
        first: Participant,
        second: Participant,
    ) -> Result<(), RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let (a, b) = (first.object, second.object);
        let same = a.id == b.id;
        let key_a = LinkKey::new(rel_type.clone(), second.role.clone(), b.id);
        let key_b = LinkKey::new(rel_type.clone(), first.role.clone(), a.id);

        let mut set_a = load(store, a.id)?;
        let mut set_b = if same { None } else { Some(load(store, b.id)?) };

        let extra_info = set_a.find(&key_a).map(|l| l.extra_info.clone());
        let mirrored = set_b.as_ref().unwrap_or(&set_a).contains(&key_b);
        let extra_info = match extra_info {
            Some(extra_info) if mirrored && key_a != key_b => extra_info,
            _ => {
                self.metrics.record_missing();
                warn!(rel_type = %rel_type, first = %a, second = %b, "Relationship to remove is missing a half");
                return Err(RelationshipError::NoSuchRelationship {
                    rel_type: rel_type.clone(),
                    first: a,
                    second: b,
                });
            }
        };

        let event = RelationshipEvent::new(
            RelationshipEventKind::BeforeRemove,
            rel_type.clone(),
            first,
            second,
            extra_info,
        );
        self.check(&event, &*store)?;
        self.notify(&event);

        set_a.remove(&key_a)?;
        match set_b.as_mut() {
            Some(set) => set.remove(&key_b)?,
            None => set_a.remove(&key_b)?,
        };
        let mut sets = vec![set_a];
        sets.extend(set_b);
        store.commit(sets).map_err(store_error)?;

        self.metrics.record_removed(1, 2);
        debug!(rel_type = %rel_type, first = %a, second = %b, "Relationship removed");
        self.notify(&event.with_kind(RelationshipEventKind::Removed));
        Ok(())
    }

    /// Break every relationship of an object
    ///
    /// Mirror links that cannot be found, or whose owner cannot be read, are
    /// skipped with a warning. Returns the number of relationships removed;
    /// a second call on the same object returns 0.
    ///
    /// # Errors
    /// - [`RelationshipError::InvalidRelationship`] if a constraint vetoes
    ///   any of the removals; nothing is removed in that case
    /// - [`RelationshipError::Store`] if the object's own links cannot be
    ///   read or the commit fails
    pub fn unrelate_all<S>(&mut self, store: &mut S, obj: &impl HasRelationshipLinks) -> Result<usize, RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let owner = obj.object_ref();
        let mut own = load(store, owner.id)?;
        if own.is_empty() {
            return Ok(0);
        }

        let mut peers: BTreeMap<ObjectId, LinkSet> = BTreeMap::new();
        let mut touched = BTreeSet::new();
        let mut events = Vec::new();
        let mut mirrors_removed = 0;

        for link in own.iter() {
            let event = RelationshipEvent::new(
                RelationshipEventKind::BeforeRemove,
                link.rel_type.clone(),
                Participant::new(owner, link.my_role.clone()),
                Participant::new(link.target, link.role.clone()),
                link.extra_info.clone(),
            );

            if link.target.id == owner.id {
                // Both halves of a self-relationship live in the cleared set
                if link.my_role < link.role {
                    events.push(event);
                }
                continue;
            }
            events.push(event);

            let peer = match peers.entry(link.target.id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => match store.link_set(link.target.id) {
                    Ok(set) => entry.insert(set),
                    Err(e) => {
                        self.metrics.record_dangling();
                        warn!(object = %owner, target = %link.target, error = %e, "Cannot read peer links, skipping mirror");
                        continue;
                    }
                },
            };
            match peer.remove(&link.mirror_key(owner.id)) {
                Ok(_) => {
                    mirrors_removed += 1;
                    touched.insert(link.target.id);
                }
                Err(_) => {
                    self.metrics.record_dangling();
                    warn!(
                        object = %owner,
                        target = %link.target,
                        rel_type = %link.rel_type,
                        "Mirror link missing, skipping"
                    );
                }
            }
        }

        for event in &events {
            self.check(event, &*store)?;
        }
        for event in &events {
            self.notify(event);
        }

        let links_removed = own.clear().len() + mirrors_removed;
        let mut sets = vec![own];
        sets.extend(
            peers
                .into_iter()
                .filter(|(id, _)| touched.contains(id))
                .map(|(_, set)| set),
        );
        store.commit(sets).map_err(store_error)?;

        self.metrics.record_removed(events.len(), links_removed);
        self.metrics.record_teardown();
        info!(object = %owner, relationships = events.len(), links = links_removed, "Removed all relationships");
        for event in &events {
            self.notify(&event.with_kind(RelationshipEventKind::Removed));
        }
        Ok(events.len())
    }

    /// Before-delete hook: break every relationship, then remove the object
    ///
    /// Returns whether the object existed in the store.
    pub fn delete_object<S>(&mut self, store: &mut S, obj: &impl HasRelationshipLinks) -> Result<bool, RelationshipError>
    where
        S: ObjectStore,
        S::Error: Display,
    {
        self.unrelate_all(store, obj)?;
        let existed = store.remove_object(obj.object_id()).map_err(store_error)?;
        debug!(object = %obj.object_ref(), existed, "Object deleted");
        Ok(existed)
    }

    /// Replace the extra information of an existing relationship
    ///
    /// Both halves are updated in one commit.
    ///
    /// # Errors
    /// Returns [`RelationshipError::NoSuchRelationship`] if either half is
    /// missing
    pub fn set_extra_info<S>(
        &mut self,
        store: &mut S,
        info: &RelationshipInfo,
        extra_info: Option<String>,
    ) -> Result<(), RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let (source, target) = (info.source, info.target);
        let same = source.id == target.id;
        let key_s = LinkKey::new(info.rel_type.clone(), info.target_role.clone(), target.id);
        let key_t = LinkKey::new(info.rel_type.clone(), info.source_role.clone(), source.id);

        let mut set_s = load(store, source.id)?;
        let mut set_t = if same { None } else { Some(load(store, target.id)?) };

        let found = set_s.contains(&key_s) && set_t.as_ref().unwrap_or(&set_s).contains(&key_t);
        if !found {
            self.metrics.record_missing();
            return Err(RelationshipError::NoSuchRelationship {
                rel_type: info.rel_type.clone(),
                first: source,
                second: target,
            });
        }

        for (set, key) in [(Some(&mut set_s), &key_s), (set_t.as_mut(), &key_t)] {
            let Some(set) = set else { continue };
            if let Some(link) = set.find_mut(key) {
                link.extra_info = extra_info.clone();
            }
        }
        if same {
            if let Some(link) = set_s.find_mut(&key_t) {
                link.extra_info = extra_info.clone();
            }
        }

        let mut sets = vec![set_s];
        sets.extend(set_t);
        store.commit(sets).map_err(store_error)?;
        debug!(rel_type = %info.rel_type, source = %source, target = %target, "Extra info updated");
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::query::related_objects;
    use campus_domain::{uris, ObjectKind, ObjectRef};
    use campus_store::MemoryStore;
    use proptest::prelude::*;

    fn people(n: usize) -> Vec<ObjectRef> {
        (0..n)
            .map(|i| ObjectRef::new(ObjectId::from_value(i as u128 + 1), ObjectKind::Person))
            .collect()
    }

    fn permissive() -> RelationshipEngine {
        RelationshipEngine::new(Arc::new(Registry::standard().unwrap()), EngineConfig::permissive())
    }

    proptest! {
        /// Property: every successful relate is visible from both ends
        #[test]
        fn test_symmetry(pairs in prop::collection::vec((0usize..6, 0usize..6), 1..20)) {
            let objects = people(6);
            let mut engine = permissive();
            let mut store = MemoryStore::new();

            for (i, j) in pairs {
                let (a, b) = (objects[i], objects[j]);
                let result = engine.relate(
                    &mut store,
                    &uris::TEACHING,
                    Participant::new(a, uris::TEACHER),
                    Participant::new(b, uris::TAUGHT),
                    None,
                );
                if result.is_ok() {
                    prop_assert!(related_objects(&store, &a, &uris::TAUGHT, Some(&uris::TEACHING)).unwrap().contains(b.id));
                    prop_assert!(related_objects(&store, &b, &uris::TEACHER, Some(&uris::TEACHING)).unwrap().contains(a.id));
                }
            }
            prop_assert_eq!(store.link_count(), engine.metrics().links_created);
        }

        /// Property: a duplicate relate leaves the graph as it was
        #[test]
        fn test_duplicate_rejection(i in 0usize..4, j in 4usize..8) {
            let objects = people(8);
            let mut engine = permissive();
            let mut store = MemoryStore::new();
            let relate = |engine: &mut RelationshipEngine, store: &mut MemoryStore| engine.relate(
                store,
                &uris::MEMBERSHIP,
                Participant::new(objects[i], uris::MEMBER),
                Participant::new(objects[j], uris::GROUP),
                None,
            );

            prop_assert!(relate(&mut engine, &mut store).is_ok());
            let before = (store.link_set(objects[i].id).unwrap(), store.link_set(objects[j].id).unwrap());
            let second = relate(&mut engine, &mut store);
            prop_assert!(
                matches!(second, Err(RelationshipError::DuplicateRelationship { .. })),
                "expected a duplicate rejection"
            );
            let after = (store.link_set(objects[i].id).unwrap(), store.link_set(objects[j].id).unwrap());
            prop_assert_eq!(before, after);
        }

        /// Property: teardown removes every mirror and is idempotent
        #[test]
        fn test_idempotent_teardown(pairs in prop::collection::vec((0usize..6, 0usize..6), 0..20), victim in 0usize..6) {
            let objects = people(6);
            let mut engine = permissive();
            let mut store = MemoryStore::new();
            for (i, j) in pairs {
                let _ = engine.relate(
                    &mut store,
                    &uris::TEACHING,
                    Participant::new(objects[i], uris::TEACHER),
                    Participant::new(objects[j], uris::TAUGHT),
                    None,
                );
            }

            let target = objects[victim];
            engine.unrelate_all(&mut store, &target).unwrap();
            prop_assert!(store.link_set(target.id).unwrap().is_empty());
            for other in &objects {
                prop_assert_eq!(store.link_set(other.id).unwrap().links_to(target.id).count(), 0);
            }
            prop_assert_eq!(engine.unrelate_all(&mut store, &target).unwrap(), 0);
        }
    }
}

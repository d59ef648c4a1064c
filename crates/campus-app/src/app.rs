//! Process wiring: one registry, engine, composer and store

use crate::config::{AppConfig, StoreBackend};
use crate::error::Result;
use campus_domain::{HasRelationshipLinks, LinkSet, LinkStore, ObjectId, ObjectRef, ObjectStore, Participant, Registry, Uri};
use campus_relationship::RelationshipEngine;
use campus_schedule::{ComposedSchedule, ScheduleComposer, TimetableRegistry, TracingTimetableListener};
use campus_store::{MemoryStore, SqliteStore, StoreError};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// The configured storage backend
#[derive(Debug)]
pub enum AppStore {
    /// In-memory store
    Memory(MemoryStore),

    /// SQLite store
    Sqlite(SqliteStore),
}

impl LinkStore for AppStore {
    type Error = StoreError;

    fn link_set(&self, owner: ObjectId) -> std::result::Result<LinkSet, StoreError> {
        match self {
            AppStore::Memory(store) => store.link_set(owner),
            AppStore::Sqlite(store) => store.link_set(owner),
        }
    }

    fn commit(&mut self, sets: Vec<LinkSet>) -> std::result::Result<(), StoreError> {
        match self {
            AppStore::Memory(store) => store.commit(sets),
            AppStore::Sqlite(store) => store.commit(sets),
        }
    }
}

impl ObjectStore for AppStore {
    fn insert_object(&mut self, object: ObjectRef) -> std::result::Result<(), StoreError> {
        match self {
            AppStore::Memory(store) => store.insert_object(object),
            AppStore::Sqlite(store) => store.insert_object(object),
        }
    }

    fn object(&self, id: ObjectId) -> std::result::Result<Option<ObjectRef>, StoreError> {
        match self {
            AppStore::Memory(store) => store.object(id),
            AppStore::Sqlite(store) => store.object(id),
        }
    }

    fn remove_object(&mut self, id: ObjectId) -> std::result::Result<bool, StoreError> {
        match self {
            AppStore::Memory(store) => store.remove_object(id),
            AppStore::Sqlite(store) => store.remove_object(id),
        }
    }
}

/// A fully wired campus instance
#[derive(Debug)]
pub struct App {
    registry: Arc<Registry>,
    engine: RelationshipEngine,
    composer: ScheduleComposer,
    store: AppStore,
    timetables: TimetableRegistry,
}

impl App {
    /// Build every component from configuration
    ///
    /// The registry starts from the standard vocabulary; per-type policies
    /// from `[engine]` are applied before it is frozen.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut registry = Registry::standard()?;
        config.engine.apply_policies(&mut registry)?;
        let registry = Arc::new(registry);

        let engine = RelationshipEngine::new(registry.clone(), config.engine.clone());
        let composer = ScheduleComposer::new(registry.clone(), &config.composer)?;
        let store = match config.store.backend {
            StoreBackend::Memory => AppStore::Memory(MemoryStore::new()),
            StoreBackend::Sqlite => AppStore::Sqlite(SqliteStore::with_registry(&config.store.path, registry.clone())?),
        };

        let mut timetables = TimetableRegistry::new();
        if config.engine.log_events {
            timetables.add_listener(Arc::new(TracingTimetableListener));
        }

        info!(
            backend = ?config.store.backend,
            schemas = registry.schemas().count(),
            contributions = composer.contributions().len(),
            "Campus initialised"
        );

        Ok(Self {
            registry,
            engine,
            composer,
            store,
            timetables,
        })
    }

    /// The frozen registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The relationship engine
    pub fn engine(&self) -> &RelationshipEngine {
        &self.engine
    }

    /// The schedule composer
    pub fn composer(&self) -> &ScheduleComposer {
        &self.composer
    }

    /// The store
    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Timetables, terms and schemas
    pub fn timetables(&self) -> &TimetableRegistry {
        &self.timetables
    }

    /// Mutable timetables, terms and schemas
    pub fn timetables_mut(&mut self) -> &mut TimetableRegistry {
        &mut self.timetables
    }

    /// Record an object in the store
    pub fn add_object(&mut self, obj: &impl HasRelationshipLinks) -> Result<()> {
        self.store.insert_object(obj.object_ref())?;
        Ok(())
    }

    /// Relate two objects
    pub fn relate(&mut self, rel_type: &Uri, first: Participant, second: Participant, extra_info: Option<String>) -> Result<()> {
        self.engine
            .relate(&mut self.store, rel_type, first, second, extra_info)?;
        Ok(())
    }

    /// Break a relationship
    pub fn unrelate(&mut self, rel_type: &Uri, first: Participant, second: Participant) -> Result<()> {
        self.engine.unrelate(&mut self.store, rel_type, first, second)?;
        Ok(())
    }

    /// Remove an object with its relationships and timetables
    ///
    /// Returns whether the object was in the store.
    pub fn delete_object(&mut self, obj: &impl HasRelationshipLinks) -> Result<bool> {
        let existed = self.engine.delete_object(&mut self.store, obj)?;
        self.timetables.remove_owner(obj.object_id());
        Ok(existed)
    }

    /// Compose the schedule of an object
    pub fn compose(&self, obj: &impl HasRelationshipLinks, first: NaiveDate, last: NaiveDate) -> Result<ComposedSchedule> {
        Ok(self
            .composer
            .compose(&self.store, &self.timetables, obj, first, last)?)
    }

    /// Engine counters as a text report
    pub fn metrics_summary(&self) -> String {
        self.engine.metrics().summary()
    }
}

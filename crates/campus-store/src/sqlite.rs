//! SQLite-backed link and object storage

use crate::StoreError;
use campus_domain::{Link, LinkSet, LinkStore, ObjectId, ObjectKind, ObjectRef, ObjectStore, Registry, Uri};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// rel_type, my_role, role, target_id, target_kind, extra_info
type LinkRow = (String, String, String, Vec<u8>, String, Option<String>);

/// SQLite-based implementation of [`LinkStore`] and [`ObjectStore`]
///
/// URIs are stored as strings. When a [`Registry`] is attached, stored
/// strings are resolved back to the registered definitions so names and
/// descriptions survive a round trip.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    registry: Arc<Registry>,
}

impl SqliteStore {
    /// Open a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use campus_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("campus.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_registry(path, Arc::new(Registry::new()))
    }

    /// Open a store that resolves URIs through `registry`
    pub fn with_registry<P: AsRef<Path>>(path: P, registry: Arc<Registry>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn, registry };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Total number of stored links (both halves of every relationship)
    pub fn link_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn id_to_bytes(id: ObjectId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<ObjectId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for ObjectId, got {}", bytes.len()))
        })?;
        Ok(ObjectId::from_value(u128::from_be_bytes(arr)))
    }

    fn parse_kind(s: &str) -> Result<ObjectKind, StoreError> {
        ObjectKind::parse(s).ok_or_else(|| StoreError::InvalidData(format!("Unknown object kind: {}", s)))
    }

    fn resolve_uri(&self, s: String) -> Result<Uri, StoreError> {
        match self.registry.resolve(&s) {
            Some(uri) => Ok(uri),
            None => Uri::new(s).map_err(|e| StoreError::InvalidData(e.to_string())),
        }
    }

    fn row_to_link(&self, row: LinkRow) -> Result<Link, StoreError> {
        let (rel_type, my_role, role, target_id, target_kind, extra_info) = row;
        let target = ObjectRef::new(Self::bytes_to_id(&target_id)?, Self::parse_kind(&target_kind)?);
        Ok(Link::new(
            self.resolve_uri(rel_type)?,
            self.resolve_uri(my_role)?,
            target,
            self.resolve_uri(role)?,
        )
        .with_extra_info(extra_info))
    }
}

impl LinkStore for SqliteStore {
    type Error = StoreError;

    fn link_set(&self, owner: ObjectId) -> Result<LinkSet, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT rel_type, my_role, role, target_id, target_kind, extra_info
             FROM links WHERE owner_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![Self::id_to_bytes(owner)], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
            })?
            .collect::<Result<Vec<LinkRow>, _>>()?;

        let links = rows
            .into_iter()
            .map(|row| self.row_to_link(row))
            .collect::<Result<Vec<_>, _>>()?;
        LinkSet::from_links(owner, links).map_err(|source| StoreError::CorruptLinkSet { owner, source })
    }

    fn commit(&mut self, sets: Vec<LinkSet>) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;
        for set in &sets {
            let owner = Self::id_to_bytes(set.owner());
            tx.execute("DELETE FROM links WHERE owner_id = ?1", params![&owner])?;
            for (position, link) in set.iter().enumerate() {
                tx.execute(
                    "INSERT INTO links (owner_id, position, rel_type, my_role, role, target_id, target_kind, extra_info)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        &owner,
                        position as i64,
                        link.rel_type.as_str(),
                        link.my_role.as_str(),
                        link.role.as_str(),
                        Self::id_to_bytes(link.target.id),
                        link.target.kind.as_str(),
                        link.extra_info.as_deref(),
                    ],
                )?;
            }
        }
        tx.commit()?;
        debug!(sets = sets.len(), "Committed link sets");
        Ok(())
    }
}

impl ObjectStore for SqliteStore {
    fn insert_object(&mut self, object: ObjectRef) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO objects (id, kind) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET kind = excluded.kind",
            params![Self::id_to_bytes(object.id), object.kind.as_str()],
        )?;
        Ok(())
    }

    fn object(&self, id: ObjectId) -> Result<Option<ObjectRef>, Self::Error> {
        let kind: Option<String> = self
            .conn
            .query_row(
                "SELECT kind FROM objects WHERE id = ?1",
                params![Self::id_to_bytes(id)],
                |row| row.get(0),
            )
            .optional()?;
        kind.map(|k| Ok(ObjectRef::new(id, Self::parse_kind(&k)?))).transpose()
    }

    fn remove_object(&mut self, id: ObjectId) -> Result<bool, Self::Error> {
        let id_bytes = Self::id_to_bytes(id);
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM links WHERE owner_id = ?1", params![&id_bytes])?;
        let removed = tx.execute("DELETE FROM objects WHERE id = ?1", params![&id_bytes])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_roundtrip() {
        let id = ObjectId::new();
        let bytes = SqliteStore::id_to_bytes(id);
        assert_eq!(SqliteStore::bytes_to_id(&bytes).unwrap(), id);
        assert!(SqliteStore::bytes_to_id(&bytes[..8]).is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(matches!(SqliteStore::parse_kind("spaceship"), Err(StoreError::InvalidData(_))));
        assert_eq!(SqliteStore::parse_kind("group").unwrap(), ObjectKind::Group);
    }
}

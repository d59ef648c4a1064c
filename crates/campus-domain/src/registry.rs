//! Registries for URIs, relationship schemas and per-type policies
//!
//! A [`Registry`] is built once at process start and then shared read-only
//! (typically behind an `Arc`) with the relationship engine, the stores and
//! the schedule composer.

use crate::schema::{self, RelationshipSchema};
use crate::uri::looks_like_a_uri;
use crate::{uris, Uri};
use std::collections::BTreeMap;
use std::fmt;

/// Errors raised while populating or querying a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The URI string is malformed
    Malformed(String),

    /// A different URI is already registered under the same string
    Collision {
        /// The URI string both definitions share
        uri: String,
        /// Label of the registered definition
        existing: String,
        /// Label of the rejected definition
        attempted: String,
    },

    /// No URI or relationship type is registered under this string
    NotFound(String),

    /// A different schema is already registered for the relationship type
    SchemaCollision(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Malformed(uri) => write!(f, "This does not look like a URI: {:?}", uri),
            RegistryError::Collision {
                uri,
                existing,
                attempted,
            } => write!(
                f,
                "URI {} is already registered as {:?}, cannot register {:?}",
                uri, existing, attempted
            ),
            RegistryError::NotFound(uri) => write!(f, "URI {} is not registered", uri),
            RegistryError::SchemaCollision(uri) => {
                write!(f, "A different schema is already registered for {}", uri)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Process-wide table of known URIs, keyed by URI string
#[derive(Debug, Clone, Default)]
pub struct UriRegistry {
    uris: BTreeMap<String, Uri>,
}

impl UriRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a URI
    ///
    /// Registering a URI that is already present with the same name and
    /// description is a no-op.
    ///
    /// # Errors
    /// Returns [`RegistryError::Malformed`] for a malformed string and
    /// [`RegistryError::Collision`] if the string is registered with a
    /// different name or description
    pub fn register(&mut self, uri: Uri) -> Result<(), RegistryError> {
        if !looks_like_a_uri(uri.as_str()) {
            return Err(RegistryError::Malformed(uri.as_str().to_string()));
        }
        match self.uris.get(uri.as_str()) {
            Some(existing) if existing.same_identity(&uri) => Ok(()),
            Some(existing) => Err(RegistryError::Collision {
                uri: uri.as_str().to_string(),
                existing: existing.label().to_string(),
                attempted: uri.label().to_string(),
            }),
            None => {
                self.uris.insert(uri.as_str().to_string(), uri);
                Ok(())
            }
        }
    }

    /// The registered URI with this string, if any
    pub fn get(&self, uri: &str) -> Option<&Uri> {
        self.uris.get(uri)
    }

    /// The registered URI with this string
    ///
    /// # Errors
    /// Returns [`RegistryError::NotFound`] if nothing is registered
    pub fn lookup(&self, uri: &str) -> Result<&Uri, RegistryError> {
        self.get(uri).ok_or_else(|| RegistryError::NotFound(uri.to_string()))
    }

    /// Whether a URI with this string is registered
    pub fn contains(&self, uri: &str) -> bool {
        self.uris.contains_key(uri)
    }

    /// All registered URIs, ordered by URI string
    pub fn iter(&self) -> impl Iterator<Item = &Uri> {
        self.uris.values()
    }

    /// Number of registered URIs
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

/// Per-relationship-type behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelationshipTypePolicy {
    /// Whether an object may be related to itself
    pub allow_self: bool,
}

/// URIs, schemas and relationship type policies known to the process
#[derive(Debug, Clone, Default)]
pub struct Registry {
    uris: UriRegistry,
    schemas: BTreeMap<String, RelationshipSchema>,
    policies: BTreeMap<String, RelationshipTypePolicy>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard vocabulary and schemas
    ///
    /// # Errors
    /// Only fails if the built-in vocabulary is inconsistent
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for uri in uris::all() {
            registry.register_uri(uri)?;
        }
        for schema in schema::standard_schemas() {
            registry.register_schema(schema)?;
        }
        Ok(registry)
    }

    /// Register a URI
    ///
    /// # Errors
    /// See [`UriRegistry::register`]
    pub fn register_uri(&mut self, uri: Uri) -> Result<(), RegistryError> {
        self.uris.register(uri)
    }

    /// Register a schema together with its relationship type and role URIs
    ///
    /// # Errors
    /// Returns [`RegistryError::SchemaCollision`] if a different schema is
    /// registered for the same relationship type, or any URI error
    pub fn register_schema(&mut self, schema: RelationshipSchema) -> Result<(), RegistryError> {
        let key = schema.rel_type().as_str().to_string();
        if let Some(existing) = self.schemas.get(&key) {
            if existing == &schema {
                return Ok(());
            }
            return Err(RegistryError::SchemaCollision(key));
        }
        self.register_uri(schema.rel_type().clone())?;
        for (_, role) in schema.roles() {
            self.register_uri(role.clone())?;
        }
        self.schemas.insert(key, schema);
        Ok(())
    }

    /// The schema registered for a relationship type
    pub fn schema(&self, rel_type: &Uri) -> Option<&RelationshipSchema> {
        self.schemas.get(rel_type.as_str())
    }

    /// All registered schemas
    pub fn schemas(&self) -> impl Iterator<Item = &RelationshipSchema> {
        self.schemas.values()
    }

    /// The URI table
    pub fn uris(&self) -> &UriRegistry {
        &self.uris
    }

    /// Resolve a URI string to its registered definition
    pub fn resolve(&self, uri: &str) -> Option<Uri> {
        self.uris.get(uri).cloned()
    }

    /// Set the policy of a registered relationship type
    ///
    /// # Errors
    /// Returns [`RegistryError::NotFound`] if the type is not registered
    pub fn set_policy(&mut self, rel_type: &Uri, policy: RelationshipTypePolicy) -> Result<(), RegistryError> {
        if !self.uris.contains(rel_type.as_str()) {
            return Err(RegistryError::NotFound(rel_type.as_str().to_string()));
        }
        self.policies.insert(rel_type.as_str().to_string(), policy);
        Ok(())
    }

    /// Policy of a relationship type (default if none was set)
    pub fn policy(&self, rel_type: &Uri) -> RelationshipTypePolicy {
        self.policies.get(rel_type.as_str()).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = UriRegistry::new();
        let uri = Uri::new("example:Friendship").unwrap().with_name("Friendship");
        registry.register(uri.clone()).unwrap();

        assert_eq!(registry.get("example:Friendship"), Some(&uri));
        assert_eq!(registry.lookup("example:Friendship").unwrap().name(), Some("Friendship"));
        assert_eq!(
            registry.lookup("example:Enmity"),
            Err(RegistryError::NotFound("example:Enmity".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregistration_is_noop() {
        let mut registry = UriRegistry::new();
        registry.register(uris::MEMBERSHIP).unwrap();
        registry.register(uris::MEMBERSHIP).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_collision() {
        let mut registry = UriRegistry::new();
        registry.register(uris::MEMBERSHIP).unwrap();

        let impostor = Uri::new(uris::MEMBERSHIP.as_str()).unwrap().with_name("Not membership");
        let err = registry.register(impostor).unwrap_err();
        assert!(matches!(err, RegistryError::Collision { .. }));
        assert_eq!(registry.get(uris::MEMBERSHIP.as_str()).unwrap().name(), uris::MEMBERSHIP.name());
    }

    #[test]
    fn test_malformed_static_uri_rejected() {
        let mut registry = UriRegistry::new();
        let bad = Uri::from_static("not a uri", "Bad", "Bad");
        assert!(matches!(registry.register(bad), Err(RegistryError::Malformed(_))));
    }

    #[test]
    fn test_standard_registry() {
        let registry = Registry::standard().unwrap();
        assert_eq!(registry.schema(&uris::MEMBERSHIP), Some(&schema::MEMBERSHIP));
        assert_eq!(registry.schemas().count(), schema::standard_schemas().len());
        assert_eq!(registry.resolve(uris::MEMBER.as_str()), Some(uris::MEMBER));
        assert!(registry.uris().contains(uris::CALENDAR_SUBSCRIBER.as_str()));
    }

    #[test]
    fn test_policies() {
        let mut registry = Registry::standard().unwrap();
        assert!(!registry.policy(&uris::MEMBERSHIP).allow_self);

        registry
            .set_policy(&uris::TEACHING, RelationshipTypePolicy { allow_self: true })
            .unwrap();
        assert!(registry.policy(&uris::TEACHING).allow_self);

        let unknown = Uri::new("example:Unknown").unwrap();
        assert!(registry.set_policy(&unknown, RelationshipTypePolicy::default()).is_err());
    }

    #[test]
    fn test_schema_collision() {
        let mut registry = Registry::standard().unwrap();
        registry.register_schema(schema::MEMBERSHIP.clone()).unwrap();

        let other = RelationshipSchema::new(uris::MEMBERSHIP, ("a", uris::MEMBER), ("b", uris::GROUP)).unwrap();
        assert!(matches!(
            registry.register_schema(other),
            Err(RegistryError::SchemaCollision(_))
        ));
    }
}

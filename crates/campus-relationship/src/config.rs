//! Configuration for the relationship engine
//!
//! Controls which built-in constraints run and which relationship types
//! accept self-relationships.

use crate::RelationshipError;
use campus_domain::{Registry, RelationshipTypePolicy};
use serde::{Deserialize, Serialize};

/// Policy entry for one relationship type
///
/// In TOML this is an `[[engine.relationship_types]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTypeConfig {
    /// URI of a registered relationship type
    pub uri: String,

    /// Whether an object may be related to itself
    #[serde(default)]
    pub allow_self: bool,
}

/// Configuration for the relationship engine
///
/// # Examples
///
/// ```
/// use campus_relationship::EngineConfig;
///
/// // Default configuration: built-in constraints enforced
/// let config = EngineConfig::default();
/// assert!(config.enforce_constraints);
///
/// // Nested: groups may contain groups, cycles are still rejected
/// let config = EngineConfig::nested_groups();
/// assert!(config.allow_nested_groups);
///
/// // Permissive: no constraints at all
/// let config = EngineConfig::permissive();
/// assert!(!config.enforce_constraints);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run the built-in constraints before every relate
    /// Default: true
    #[serde(default = "default_enforce_constraints")]
    pub enforce_constraints: bool,

    /// Let groups be members of other groups (cycles are still rejected)
    /// Default: false
    #[serde(default)]
    pub allow_nested_groups: bool,

    /// Log every relationship event through tracing
    /// Default: true
    #[serde(default = "default_log_events")]
    pub log_events: bool,

    /// Per-type policies
    #[serde(default)]
    pub relationship_types: Vec<RelationshipTypeConfig>,
}

fn default_enforce_constraints() -> bool {
    true
}

fn default_log_events() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enforce_constraints: true,
            allow_nested_groups: false,
            log_events: true,
            relationship_types: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Every built-in constraint, but groups may be members of groups
    pub fn nested_groups() -> Self {
        Self {
            allow_nested_groups: true,
            ..Self::default()
        }
    }

    /// No constraints; groups may nest
    ///
    /// Suitable for bulk imports where the data was validated elsewhere.
    pub fn permissive() -> Self {
        Self {
            enforce_constraints: false,
            allow_nested_groups: true,
            log_events: false,
            relationship_types: Vec::new(),
        }
    }

    /// Allow self-relationships for a relationship type
    pub fn allow_self(mut self, uri: impl Into<String>) -> Self {
        self.relationship_types.push(RelationshipTypeConfig {
            uri: uri.into(),
            allow_self: true,
        });
        self
    }

    /// Write the per-type policies into a registry
    ///
    /// # Errors
    /// Returns [`RelationshipError::Config`] if a type is not registered
    pub fn apply_policies(&self, registry: &mut Registry) -> Result<(), RelationshipError> {
        for entry in &self.relationship_types {
            let rel_type = registry
                .uris()
                .lookup(&entry.uri)
                .map_err(|e| RelationshipError::Config(e.to_string()))?
                .clone();
            registry
                .set_policy(
                    &rel_type,
                    RelationshipTypePolicy {
                        allow_self: entry.allow_self,
                    },
                )
                .map_err(|e| RelationshipError::Config(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_domain::uris;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.enforce_constraints);
        assert!(!config.allow_nested_groups);
        assert!(config.log_events);
        assert!(config.relationship_types.is_empty());
    }

    #[test]
    fn test_nested_groups_config() {
        let config = EngineConfig::nested_groups();
        assert!(config.enforce_constraints);
        assert!(config.allow_nested_groups);
    }

    #[test]
    fn test_permissive_config() {
        let config = EngineConfig::permissive();
        assert!(!config.enforce_constraints);
        assert!(config.allow_nested_groups);
    }

    #[test]
    fn test_apply_policies() {
        let mut registry = Registry::standard().unwrap();
        let config = EngineConfig::default().allow_self(uris::TEACHING.as_str());
        config.apply_policies(&mut registry).unwrap();

        assert!(registry.policy(&uris::TEACHING).allow_self);
        assert!(!registry.policy(&uris::MEMBERSHIP).allow_self);
    }

    #[test]
    fn test_apply_unknown_type() {
        let mut registry = Registry::standard().unwrap();
        let config = EngineConfig::default().allow_self("example:Unknown");
        assert!(matches!(
            config.apply_policies(&mut registry),
            Err(RelationshipError::Config(_))
        ));
    }

    #[test]
    fn test_toml_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [[relationship_types]]
            uri = "http://schooltool.org/ns/teaching"
            allow_self = true
            "#,
        )
        .unwrap();
        assert!(config.enforce_constraints);
        assert!(config.log_events);
        assert_eq!(config.relationship_types.len(), 1);
        assert!(config.relationship_types[0].allow_self);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::permissive().allow_self("example:Friendship");
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

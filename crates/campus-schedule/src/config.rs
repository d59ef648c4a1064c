//! Configuration for schedule composition

use campus_domain::uris;
use serde::{Deserialize, Serialize};

/// A relationship whose peers contribute their meetings
///
/// In TOML this is a `[[composer.contributions]]` table. Both URIs must be
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionConfig {
    /// Relationship type URI
    pub rel_type: String,

    /// Role the contributing peer plays
    pub peer_role: String,
}

impl ContributionConfig {
    /// Create a contribution entry
    pub fn new(rel_type: impl Into<String>, peer_role: impl Into<String>) -> Self {
        Self {
            rel_type: rel_type.into(),
            peer_role: peer_role.into(),
        }
    }
}

/// Configuration for the schedule composer
///
/// # Examples
///
/// ```
/// use campus_schedule::ComposerConfig;
///
/// // Default: groups and sections, sections taught, booking sections
/// let config = ComposerConfig::default();
/// assert_eq!(config.contributions.len(), 3);
///
/// // Own timetables only
/// let config = ComposerConfig::own_only();
/// assert!(config.contributions.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Relationships walked (one hop) to collect peer meetings
    /// Default: membership, instruction and section booking
    #[serde(default = "default_contributions")]
    pub contributions: Vec<ContributionConfig>,

    /// Skip peers the object store no longer knows
    /// Default: true
    #[serde(default = "default_check_peer_objects")]
    pub check_peer_objects: bool,
}

fn default_contributions() -> Vec<ContributionConfig> {
    vec![
        ContributionConfig::new(uris::MEMBERSHIP.as_str(), uris::GROUP.as_str()),
        ContributionConfig::new(uris::INSTRUCTION.as_str(), uris::SECTION.as_str()),
        ContributionConfig::new(uris::SECTION_BOOKING.as_str(), uris::BOOKING_SECTION.as_str()),
    ]
}

fn default_check_peer_objects() -> bool {
    true
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            contributions: default_contributions(),
            check_peer_objects: true,
        }
    }
}

impl ComposerConfig {
    /// No peers: a composed schedule holds the object's own meetings only
    pub fn own_only() -> Self {
        Self {
            contributions: Vec::new(),
            ..Self::default()
        }
    }

    /// Add a contributing relationship
    pub fn with_contribution(mut self, rel_type: impl Into<String>, peer_role: impl Into<String>) -> Self {
        self.contributions.push(ContributionConfig::new(rel_type, peer_role));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComposerConfig::default();
        assert!(config.check_peer_objects);
        assert_eq!(config.contributions[0].rel_type, uris::MEMBERSHIP.as_str());
        assert_eq!(config.contributions[0].peer_role, uris::GROUP.as_str());
    }

    #[test]
    fn test_builder() {
        let config = ComposerConfig::own_only()
            .with_contribution(uris::LEADERSHIP.as_str(), uris::ASSET.as_str());
        assert_eq!(config.contributions.len(), 1);
    }

    #[test]
    fn test_toml_defaults() {
        let config: ComposerConfig = toml::from_str("check_peer_objects = false").unwrap();
        assert!(!config.check_peer_objects);
        assert_eq!(config.contributions, default_contributions());
    }

    #[test]
    fn test_toml_contributions() {
        let toml = r#"
            [[contributions]]
            rel_type = "http://schooltool.org/ns/membership"
            peer_role = "http://schooltool.org/ns/membership/group"
        "#;
        let config: ComposerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.contributions.len(), 1);
        assert!(config.check_peer_objects);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ComposerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ComposerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}

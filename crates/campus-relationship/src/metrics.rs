//! Metrics collection for relationship operations

/// Counters maintained by the relationship engine
///
/// Links are counted individually, so an ordinary relationship adds two.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Relationships established
    pub relationships_created: usize,

    /// Relationships broken (by unrelate or teardown)
    pub relationships_removed: usize,

    /// Links written
    pub links_created: usize,

    /// Links removed
    pub links_removed: usize,

    /// relate calls rejected as duplicates
    pub duplicates_rejected: usize,

    /// unrelate calls rejected because a half was missing
    pub missing_rejected: usize,

    /// Operations vetoed by a constraint
    pub constraint_vetoes: usize,

    /// Mirror links that teardown could not find and skipped
    pub dangling_mirrors_skipped: usize,

    /// Teardown runs that removed at least one link
    pub teardowns: usize,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new relationship and the links it took
    pub fn record_created(&mut self, links: usize) {
        self.relationships_created += 1;
        self.links_created += links;
    }

    /// Record removed relationships and the links they took
    pub fn record_removed(&mut self, relationships: usize, links: usize) {
        self.relationships_removed += relationships;
        self.links_removed += links;
    }

    /// Record a duplicate rejection
    pub fn record_duplicate(&mut self) {
        self.duplicates_rejected += 1;
    }

    /// Record a missing-relationship rejection
    pub fn record_missing(&mut self) {
        self.missing_rejected += 1;
    }

    /// Record a constraint veto
    pub fn record_veto(&mut self) {
        self.constraint_vetoes += 1;
    }

    /// Record a skipped dangling mirror
    pub fn record_dangling(&mut self) {
        self.dangling_mirrors_skipped += 1;
    }

    /// Record a completed teardown
    pub fn record_teardown(&mut self) {
        self.teardowns += 1;
    }

    /// Relationships currently accounted as alive
    pub fn net_relationships(&self) -> isize {
        self.relationships_created as isize - self.relationships_removed as isize
    }

    /// Total rejected operations
    pub fn total_rejected(&self) -> usize {
        self.duplicates_rejected + self.missing_rejected + self.constraint_vetoes
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Relationship Metrics Summary".to_string(),
            "============================".to_string(),
            format!("Relationships created: {}", self.relationships_created),
            format!("Relationships removed: {}", self.relationships_removed),
            format!("Links created: {}", self.links_created),
            format!("Links removed: {}", self.links_removed),
            format!("Teardowns: {}", self.teardowns),
        ];

        if self.total_rejected() > 0 {
            lines.push(String::new());
            lines.push("Rejections:".to_string());
            lines.push(format!("  Duplicate: {}", self.duplicates_rejected));
            lines.push(format!("  Missing: {}", self.missing_rejected));
            lines.push(format!("  Vetoed: {}", self.constraint_vetoes));
            lines.push(format!("  Total: {}", self.total_rejected()));
        }

        if self.dangling_mirrors_skipped > 0 {
            lines.push(String::new());
            lines.push(format!("Dangling mirrors skipped: {}", self.dangling_mirrors_skipped));
        }

        lines.join("\n")
    }
}

//! Metrics collection for Janitor operations

use crate::report::CleanupReport;
use curator_domain::Tier;
use std::collections::BTreeMap;

/// Cumulative metrics across deep-clean runs
///
/// Tracks records kept, archived, deleted, deduplicated, and demoted by the
/// capacity cap, per tier.
#[derive(Debug, Clone, Default)]
pub struct JanitorMetrics {
    /// Records kept per tier
    pub kept: BTreeMap<Tier, usize>,

    /// Records archived per tier
    pub archived: BTreeMap<Tier, usize>,

    /// Records deleted per tier
    pub deleted: BTreeMap<Tier, usize>,

    /// Duplicates removed per tier
    pub duplicates: BTreeMap<Tier, usize>,

    /// Keep candidates demoted to the archive by capacity, per tier
    pub demoted: BTreeMap<Tier, usize>,

    /// Tier runs that failed
    pub tier_failures: usize,

    /// Total deep-clean runs completed
    pub deep_clean_runs: usize,

    /// Runs that escalated to emergency mode
    pub emergency_runs: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every tier outcome of a cleanup pass
    pub fn record_pass(&mut self, pass: &CleanupReport) {
        for report in pass.cleaned() {
            *self.kept.entry(report.tier).or_insert(0) += report.kept;
            *self.archived.entry(report.tier).or_insert(0) += report.archived;
            *self.deleted.entry(report.tier).or_insert(0) += report.deleted;
            *self.duplicates.entry(report.tier).or_insert(0) += report.duplicates;
            *self.demoted.entry(report.tier).or_insert(0) += report.capacity_demoted;
        }
        self.tier_failures += pass.failures().count();
    }

    /// Record a deep-clean completion
    pub fn record_run(&mut self, emergency: bool, runtime_ms: u64) {
        self.deep_clean_runs += 1;
        if emergency {
            self.emergency_runs += 1;
        }
        self.total_runtime_ms += runtime_ms;
    }

    /// Get total records archived across all tiers
    pub fn total_archived(&self) -> usize {
        self.archived.values().sum()
    }

    /// Get total records deleted across all tiers
    pub fn total_deleted(&self) -> usize {
        self.deleted.values().sum()
    }

    /// Get total duplicates removed across all tiers
    pub fn total_duplicates(&self) -> usize {
        self.duplicates.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Deep clean runs: {}", self.deep_clean_runs),
            format!("Emergency runs: {}", self.emergency_runs),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
        ];

        let sections = [
            ("Archived by tier:", &self.archived, self.total_archived()),
            ("Deleted by tier:", &self.deleted, self.total_deleted()),
            ("Duplicates by tier:", &self.duplicates, self.total_duplicates()),
        ];
        for (title, counts, total) in sections {
            if counts.is_empty() {
                continue;
            }
            lines.push(title.to_string());
            for (tier, count) in counts {
                lines.push(format!("  {}: {}", tier, count));
            }
            lines.push(format!("  Total: {}", total));
            lines.push(String::new());
        }

        if self.tier_failures > 0 {
            lines.push(format!("Tier failures: {}", self.tier_failures));
        }

        lines.join("\n")
    }
}

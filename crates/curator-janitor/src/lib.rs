//! Curator Janitor
//!
//! Retention and archival engine for the learning-data store.
//!
//! # Overview
//!
//! The Janitor decides, for every record in the three learning-data tiers,
//! whether to keep it, archive it, or delete it:
//! - **Deduplication**: repeat records are removed dataset-wide before classification
//! - **Classification**: a cross-tier value floor, then per-tier rate and age rules
//! - **Capacity**: overflow is demoted to the archive, never deleted
//! - **Archival**: evicted-but-valuable records go to write-once bundles
//! - **Integrity**: corrupted tier files are quarantined, missing ones created
//! - **Emergency mode**: one extra pass under tightened rules when over budget
//!
//! ## Classification
//!
//! | Step | Test | Result |
//! |------|------|--------|
//! | 1 | value score ≥ `min_total_value_score` | Keep |
//! | 2 | rate ≥ keep threshold and age within retention window | Keep |
//! | 3 | rate ≥ archive threshold | Archive |
//! | 4 | otherwise | Delete |
//!
//! High-engagement rates are discounted by 0.7 once a record is older than
//! `performance_decay_days`. Effective-topics records flagged `isSeasonal`
//! use a window of `seasonal_data_years` years.
//!
//! # Usage
//!
//! ```no_run
//! use curator_janitor::{Janitor, RuleStore};
//! use curator_store::{FsArchive, YamlTierStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = RuleStore::new("retention.toml");
//! let mut janitor = Janitor::new(rules.config().clone());
//!
//! let mut store = YamlTierStore::new("data/learning");
//! let mut archive = FsArchive::new("data");
//!
//! let report = janitor.deep_clean(&mut store, &mut archive)?;
//! println!("{}", report.summary());
//! println!("\n{}", janitor.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [success_patterns]
//! max_entries = 100
//! min_success_rate = 0.7
//! retention_days = 30
//! archive_threshold = 0.5
//!
//! [high_engagement]
//! max_entries = 50
//! min_engagement_rate = 3.0
//! retention_days = 60
//! performance_decay_days = 90
//!
//! [effective_topics]
//! max_entries = 75
//! effectiveness_threshold = 0.6
//! trend_data_retention_days = 45
//! seasonal_data_years = 1
//!
//! [performance_constraints]
//! max_file_size_mb = 5.0
//! max_total_learning_data_mb = 50.0
//!
//! [value_assessment]
//! min_total_value_score = 40.0
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod archiver;
mod cleaner;
mod config;
mod dedup;
mod error;
mod integrity;
mod janitor;
mod metrics;
mod report;
mod rules;
mod scoring;

#[cfg(test)]
mod test_support;

pub use archiver::Archiver;
pub use cleaner::{classify, partition, Disposition, Partition, TierCleaner};
pub use config::{
    load_or_default, EffectiveTopicsConfig, HighEngagementConfig, PerformanceConstraints,
    QualityFilters, RetentionConfig, RuleStore, SuccessPatternsConfig, ValueAssessment,
};
pub use dedup::{Blake3Hasher, Deduplicator};
pub use error::{DeepCleanError, JanitorError, RunPhase};
pub use integrity::{corruption_reason, IntegrityGuard, IntegrityReport, Quarantined};
pub use janitor::{Janitor, JanitorOptions};
pub use metrics::JanitorMetrics;
pub use report::{
    CleanupReport, DeepCleanReport, FailureKind, RunMode, RunState, TierFailure, TierOutcome,
    TierReport,
};
pub use rules::{RetentionRule, RuleSet, TierExtra};
pub use scoring::{quick_score, recency, ValueScorer, EDUCATIONAL_KEYWORDS};

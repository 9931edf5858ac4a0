//! Deep-clean orchestration

use crate::archiver::Archiver;
use crate::cleaner::TierCleaner;
use crate::dedup::{Blake3Hasher, Deduplicator};
use crate::error::{DeepCleanError, RunPhase};
use crate::integrity::IntegrityGuard;
use crate::report::{CleanupReport, DeepCleanReport, RunMode, RunState, TierFailure, TierOutcome};
use crate::{JanitorError, JanitorMetrics, RetentionConfig, RuleSet};
use chrono::{DateTime, Utc};
use curator_domain::{ArchiveSink, ContentHasher, RunId, Tier, TierStore};
use std::fmt::Display;
use std::time::Instant;

/// Runtime switches for a Janitor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JanitorOptions {
    /// Classify and report without writing tiers, bundles, or quarantines
    pub dry_run: bool,
}

/// Janitor service for learning-data retention
///
/// Responsible for:
/// - Cleaning every tier under the configured rules
/// - Repairing corrupted or missing tier files
/// - Re-running cleanup under tightened rules when the dataset is over budget
/// - Collecting metrics across runs
///
/// The active [`RuleSet`] is never modified. Emergency mode derives a
/// separate tightened set for the duration of one pass.
///
/// # Examples
///
/// ```no_run
/// use curator_janitor::{Janitor, RetentionConfig};
/// use curator_store::{FsArchive, YamlTierStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = YamlTierStore::new("learning");
/// let mut archive = FsArchive::new(".");
/// let mut janitor = Janitor::new(RetentionConfig::default());
///
/// let report = janitor.deep_clean(&mut store, &mut archive)?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: RetentionConfig,
    rules: RuleSet,
    options: JanitorOptions,
    metrics: JanitorMetrics,
    hasher: Box<dyn ContentHasher + Send + Sync>,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: RetentionConfig) -> Self {
        let rules = RuleSet::from_config(&config);
        Self {
            config,
            rules,
            options: JanitorOptions::default(),
            metrics: JanitorMetrics::new(),
            hasher: Box::new(Blake3Hasher),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(RetentionConfig::default())
    }

    /// Replace the content hasher used for deduplication
    pub fn with_hasher<H>(mut self, hasher: H) -> Self
    where
        H: ContentHasher + Send + Sync + 'static,
    {
        self.hasher = Box::new(hasher);
        self
    }

    /// Set runtime options
    pub fn with_options(mut self, options: JanitorOptions) -> Self {
        self.options = options;
        self
    }

    /// The configuration this Janitor was built from
    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// The active (normal) rule set
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Runtime options
    pub fn options(&self) -> JanitorOptions {
        self.options
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Run a deep clean at the current instant
    pub fn deep_clean<S, A>(
        &mut self,
        store: &mut S,
        sink: &mut A,
    ) -> Result<DeepCleanReport, DeepCleanError>
    where
        S: TierStore,
        S::Error: Display,
        A: ArchiveSink,
        A::Error: Display,
    {
        self.deep_clean_at(store, sink, Utc::now())
    }

    /// Run a deep clean, measuring record ages relative to `now`
    ///
    /// 1. Pre-flight integrity check
    /// 2. Normal pass over all tiers (failures isolated per tier)
    /// 3. Integrity check and corrupted-data sweep
    /// 4. Budget check; if over budget, one emergency pass under tightened rules
    ///
    /// An archive failure in the normal pass, a failed size measurement, or
    /// any failure in the emergency pass returns a [`DeepCleanError`] that
    /// still carries every completed tier's report.
    pub fn deep_clean_at<S, A>(
        &mut self,
        store: &mut S,
        sink: &mut A,
        now: DateTime<Utc>,
    ) -> Result<DeepCleanReport, DeepCleanError>
    where
        S: TierStore,
        S::Error: Display,
        A: ArchiveSink,
        A::Error: Display,
    {
        let run_id = RunId::new();
        let span = tracing::info_span!("deep_clean", run_id = %run_id);
        let _enter = span.enter();
        let start = Instant::now();
        let dry_run = self.options.dry_run;

        tracing::info!("Starting deep clean{}", if dry_run { " (dry run)" } else { "" });
        let guard = IntegrityGuard::new(&self.config, dry_run);

        let preflight = guard.check(store, now);
        let normal = self.clean_pass(&self.rules, RunMode::Normal, now, store, sink);
        self.metrics.record_pass(&normal);

        let mut integrity = guard.check(store, now);
        guard.sweep_corrupted_records(store, &mut integrity);

        let mut report = DeepCleanReport {
            run_id,
            started_at: now,
            dry_run,
            state: RunState::RunningNormal,
            preflight,
            normal,
            integrity,
            total_bytes: None,
            budget_bytes: self.config.total_budget_bytes(),
            emergency: None,
        };

        if let Some(failure) = report.normal.archive_failure() {
            let (tier, source) = (failure.tier, failure.to_error());
            return Err(fail(report, RunPhase::Normal, Some(tier), source));
        }

        report.state = RunState::CheckingBudget;
        let total = match total_size(store) {
            Ok(total) => total,
            Err(e) => {
                let source = JanitorError::Store(format!("size check failed: {}", e));
                return Err(fail(report, RunPhase::CheckingBudget, None, source));
            }
        };
        report.total_bytes = Some(total);

        if total > report.budget_bytes {
            tracing::warn!(
                "Learning data is {} bytes, over the {} byte budget; running emergency cleanup",
                total,
                report.budget_bytes
            );
            report.state = RunState::RunningEmergency;

            let emergency_rules = self.rules.emergency();
            let pass = self.clean_pass(&emergency_rules, RunMode::Emergency, now, store, sink);
            self.metrics.record_pass(&pass);

            let failure = pass.failures().next().map(|f| (f.tier, f.to_error()));
            report.emergency = Some(pass);
            if let Some((tier, e)) = failure {
                let source = JanitorError::Emergency(e.to_string());
                return Err(fail(report, RunPhase::Emergency, Some(tier), source));
            }
        }

        report.state = RunState::Done;
        self.metrics
            .record_run(report.emergency_triggered(), start.elapsed().as_millis() as u64);
        tracing::info!(
            "Deep clean done: kept {}, archived {}, deleted {}",
            report.normal.total_kept(),
            report.normal.total_archived(),
            report.normal.total_deleted()
        );
        Ok(report)
    }

    /// Clean every tier in order under `rules`
    ///
    /// One deduplicator spans the whole pass. A failing tier is recorded and
    /// the remaining tiers still run.
    fn clean_pass<S, A>(
        &self,
        rules: &RuleSet,
        mode: RunMode,
        now: DateTime<Utc>,
        store: &mut S,
        sink: &mut A,
    ) -> CleanupReport
    where
        S: TierStore,
        S::Error: Display,
        A: ArchiveSink,
        A::Error: Display,
    {
        let cleaner = TierCleaner::new(rules, now, self.options.dry_run);
        let mut archiver = Archiver::new(sink, self.options.dry_run);
        let mut dedup = Deduplicator::new(&*self.hasher);
        let mut pass = CleanupReport::new(mode);

        for tier in Tier::ALL {
            let outcome = match cleaner.clean(tier, store, &mut archiver, &mut dedup) {
                Ok(report) => TierOutcome::Cleaned(report),
                Err(e) => {
                    tracing::error!("{:?} cleanup of {} failed: {}", mode, tier, e);
                    TierOutcome::Failed(TierFailure::from_error(tier, &e))
                }
            };
            pass.push(outcome);
        }

        pass
    }
}

fn total_size<S: TierStore>(store: &S) -> Result<u64, S::Error> {
    Tier::ALL.iter().map(|tier| store.size_bytes(*tier)).sum()
}

fn fail(
    mut report: DeepCleanReport,
    phase: RunPhase,
    tier: Option<Tier>,
    source: JanitorError,
) -> DeepCleanError {
    report.state = RunState::Error;
    tracing::error!("Deep clean failed in {} phase: {}", phase, source);
    DeepCleanError {
        phase,
        tier,
        source,
        report: Box::new(report),
    }
}

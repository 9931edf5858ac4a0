//! Cleanup reports
//!
//! Every tier run yields either a [`TierReport`] or a [`TierFailure`]; a pass
//! over all tiers yields a [`CleanupReport`]; the orchestrator wraps normal
//! and emergency passes plus integrity results in a [`DeepCleanReport`].

use crate::integrity::IntegrityReport;
use crate::JanitorError;
use chrono::{DateTime, Utc};
use curator_domain::{RunId, Tier};
use serde::Serialize;

/// Which rule set a pass ran under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Configured rules
    Normal,
    /// Tightened rules after the budget was exceeded
    Emergency,
}

/// Orchestrator state
///
/// `Idle → RunningNormal → CheckingBudget → RunningEmergency? → Done`, with
/// `Error` reachable from any running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Not started
    Idle,
    /// Cleaning all tiers under normal rules
    RunningNormal,
    /// Comparing on-disk size with the budget
    CheckingBudget,
    /// Cleaning all tiers under emergency rules
    RunningEmergency,
    /// Finished
    Done,
    /// Stopped on an unrecoverable failure
    Error,
}

/// Counts for one successfully cleaned tier
///
/// `loaded == duplicates + kept + archived + deleted` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierReport {
    /// Tier cleaned
    pub tier: Tier,
    /// Records read from the store
    pub loaded: usize,
    /// Records removed as duplicates before classification
    pub duplicates: usize,
    /// Records written back
    pub kept: usize,
    /// Records moved into an archive bundle
    pub archived: usize,
    /// Records discarded for low value
    pub deleted: usize,
    /// Keep candidates demoted to the archive by the capacity cap
    pub capacity_demoted: usize,
    /// Where the archive bundle was written, if one was
    pub archive_location: Option<String>,
    /// Whether the tier was rewritten
    pub rewritten: bool,
}

impl TierReport {
    /// Whether every loaded record is accounted for exactly once
    pub fn is_balanced(&self) -> bool {
        self.loaded == self.duplicates + self.kept + self.archived + self.deleted
    }
}

/// Kind of per-tier failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The archive bundle could not be written; the tier was not rewritten
    ArchiveWrite,
    /// Any other load, classification, or save failure
    Cleanup,
}

/// A tier that could not be cleaned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierFailure {
    /// Tier that failed
    pub tier: Tier,
    /// Failure kind
    pub kind: FailureKind,
    /// Human-readable cause
    pub message: String,
}

impl TierFailure {
    /// Describe a failure of `tier`
    pub fn from_error(tier: Tier, error: &JanitorError) -> Self {
        let kind = match error {
            JanitorError::ArchiveWrite { .. } => FailureKind::ArchiveWrite,
            _ => FailureKind::Cleanup,
        };
        Self {
            tier,
            kind,
            message: error.to_string(),
        }
    }

    /// Rebuild the error this failure was recorded from
    pub fn to_error(&self) -> JanitorError {
        match self.kind {
            FailureKind::ArchiveWrite => JanitorError::ArchiveWrite {
                tier: self.tier,
                reason: self.message.clone(),
            },
            FailureKind::Cleanup => JanitorError::TierCleanup {
                tier: self.tier,
                reason: self.message.clone(),
            },
        }
    }
}

/// Outcome of cleaning one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TierOutcome {
    /// Tier cleaned
    Cleaned(TierReport),
    /// Tier left unmodified after a failure
    Failed(TierFailure),
}

impl TierOutcome {
    /// Tier the outcome belongs to
    pub fn tier(&self) -> Tier {
        match self {
            TierOutcome::Cleaned(report) => report.tier,
            TierOutcome::Failed(failure) => failure.tier,
        }
    }
}

/// Result of one pass over all tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    /// Rule set the pass ran under
    pub mode: RunMode,
    /// Per-tier outcomes in cleanup order
    pub outcomes: Vec<TierOutcome>,
}

impl CleanupReport {
    /// Empty report for a pass
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            outcomes: Vec::new(),
        }
    }

    /// Record a tier outcome
    pub fn push(&mut self, outcome: TierOutcome) {
        self.outcomes.push(outcome);
    }

    /// Counts for a tier, if it was cleaned
    pub fn tier(&self, tier: Tier) -> Option<&TierReport> {
        self.cleaned().find(|r| r.tier == tier)
    }

    /// Failure for a tier, if it failed
    pub fn failure(&self, tier: Tier) -> Option<&TierFailure> {
        self.failures().find(|f| f.tier == tier)
    }

    /// All successfully cleaned tiers
    pub fn cleaned(&self) -> impl Iterator<Item = &TierReport> {
        self.outcomes.iter().filter_map(|o| match o {
            TierOutcome::Cleaned(report) => Some(report),
            TierOutcome::Failed(_) => None,
        })
    }

    /// All failed tiers
    pub fn failures(&self) -> impl Iterator<Item = &TierFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            TierOutcome::Failed(failure) => Some(failure),
            TierOutcome::Cleaned(_) => None,
        })
    }

    /// First archive-write failure, which ends a normal pass in `Error`
    pub fn archive_failure(&self) -> Option<&TierFailure> {
        self.failures().find(|f| f.kind == FailureKind::ArchiveWrite)
    }

    /// Whether every tier was cleaned
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Total records kept across tiers
    pub fn total_kept(&self) -> usize {
        self.cleaned().map(|r| r.kept).sum()
    }

    /// Total records archived across tiers
    pub fn total_archived(&self) -> usize {
        self.cleaned().map(|r| r.archived).sum()
    }

    /// Total records deleted across tiers
    pub fn total_deleted(&self) -> usize {
        self.cleaned().map(|r| r.deleted).sum()
    }

    /// Total duplicates removed across tiers
    pub fn total_duplicates(&self) -> usize {
        self.cleaned().map(|r| r.duplicates).sum()
    }
}

/// Full result of a deep clean
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepCleanReport {
    /// Run identifier
    pub run_id: RunId,
    /// Instant the run used for ages and archive stamps
    pub started_at: DateTime<Utc>,
    /// Whether writes were suppressed
    pub dry_run: bool,
    /// Final orchestrator state (`Done` or `Error`)
    pub state: RunState,
    /// Integrity pass before cleaning
    pub preflight: IntegrityReport,
    /// Normal pass
    pub normal: CleanupReport,
    /// Integrity pass and corrupted-data sweep after cleaning
    pub integrity: IntegrityReport,
    /// Total on-disk size after the normal pass, once measured
    pub total_bytes: Option<u64>,
    /// Configured total-size budget
    pub budget_bytes: u64,
    /// Emergency pass, when the budget was exceeded
    pub emergency: Option<CleanupReport>,
}

impl DeepCleanReport {
    /// Whether emergency mode ran
    pub fn emergency_triggered(&self) -> bool {
        self.emergency.is_some()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Deep Clean {}", self.run_id),
            "======================".to_string(),
            format!("State: {:?}{}", self.state, if self.dry_run { " (dry run)" } else { "" }),
        ];

        for pass in std::iter::once(&self.normal).chain(self.emergency.as_ref()) {
            lines.push(String::new());
            lines.push(format!("{:?} pass:", pass.mode));
            for outcome in &pass.outcomes {
                match outcome {
                    TierOutcome::Cleaned(r) => lines.push(format!(
                        "  {}: kept {}, archived {}, deleted {}, duplicates {}",
                        r.tier, r.kept, r.archived, r.deleted, r.duplicates
                    )),
                    TierOutcome::Failed(f) => {
                        lines.push(format!("  {}: FAILED ({})", f.tier, f.message))
                    }
                }
            }
        }

        if let Some(total) = self.total_bytes {
            lines.push(String::new());
            lines.push(format!("Storage: {} / {} bytes", total, self.budget_bytes));
        }

        let quarantined = self.preflight.quarantined.len() + self.integrity.quarantined.len();
        if quarantined > 0 {
            lines.push(format!("Quarantined tier files: {}", quarantined));
        }
        let swept: usize = self.integrity.corrupted_records_removed.values().sum();
        if swept > 0 {
            lines.push(format!("Corrupted records removed: {}", swept));
        }

        lines.join("\n")
    }
}

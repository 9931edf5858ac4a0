//! Error types for Janitor operations

use crate::report::DeepCleanReport;
use curator_domain::Tier;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during Janitor operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JanitorError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An archive bundle could not be written; the tier was left unmodified
    #[error("Archive write failed for {tier}: {reason}")]
    ArchiveWrite {
        /// Tier whose bundle failed
        tier: Tier,
        /// Underlying failure
        reason: String,
    },

    /// A tier could not be cleaned
    #[error("Cleanup failed for {tier}: {reason}")]
    TierCleanup {
        /// Tier that failed
        tier: Tier,
        /// Underlying failure
        reason: String,
    },

    /// Emergency cleanup failed after the normal pass exceeded the budget
    #[error("Emergency cleanup failed: {0}")]
    Emergency(String),
}

impl JanitorError {
    /// Tier the error concerns, if any
    pub fn tier(&self) -> Option<Tier> {
        match self {
            JanitorError::ArchiveWrite { tier, .. } | JanitorError::TierCleanup { tier, .. } => {
                Some(*tier)
            }
            _ => None,
        }
    }
}

/// Phase of a deep clean in which a failure surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Normal cleanup of all tiers
    Normal,
    /// Measuring total on-disk size against the budget
    CheckingBudget,
    /// Re-run under tightened rules
    Emergency,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunPhase::Normal => "normal",
            RunPhase::CheckingBudget => "budget check",
            RunPhase::Emergency => "emergency",
        })
    }
}

fn tier_suffix(tier: &Option<Tier>) -> String {
    tier.map(|t| format!(" ({})", t)).unwrap_or_default()
}

/// Structured failure of a deep clean
///
/// Names the phase and tier that failed and carries the report of all work
/// completed before the failure, which remains valid.
#[derive(Error, Debug)]
#[error("Deep clean failed in {} phase{}: {}", .phase, tier_suffix(.tier), .source)]
pub struct DeepCleanError {
    /// Phase in which the failure surfaced
    pub phase: RunPhase,

    /// Tier that failed, when the failure is tier-specific
    pub tier: Option<Tier>,

    /// Underlying error
    pub source: JanitorError,

    /// Progress made before the failure
    pub report: Box<DeepCleanReport>,
}

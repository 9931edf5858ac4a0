//! Status command implementation.

use crate::config::Paths;
use crate::error::Result;
use crate::output::Formatter;
use curator_domain::{Tier, TierHealth, TierStore};
use curator_janitor::RuleSet;
use serde::Serialize;

/// Snapshot of every tier plus storage usage.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Per-tier state, in cleanup order
    pub tiers: Vec<TierStatus>,
    /// Combined size of all tier files
    pub total_bytes: u64,
    /// Configured storage budget
    pub budget_bytes: u64,
    /// Archive bundles on disk
    pub bundles: usize,
}

impl StatusReport {
    /// Whether the next deep clean would escalate to emergency mode.
    pub fn over_budget(&self) -> bool {
        self.total_bytes > self.budget_bytes
    }
}

/// State of a single tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierStatus {
    /// Tier
    pub tier: Tier,
    /// Health as reported by the store
    #[serde(flatten)]
    pub state: TierState,
    /// File size in bytes
    pub bytes: u64,
    /// Configured capacity
    pub max_entries: usize,
}

/// Serializable form of a tier's health.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TierState {
    /// File does not exist yet
    Missing,
    /// File parses
    Healthy {
        /// Record count
        entries: usize,
    },
    /// File cannot be parsed
    Corrupted {
        /// Parser message
        reason: String,
    },
}

/// Execute the status command.
pub async fn execute_status(paths: &Paths, formatter: &Formatter) -> Result<()> {
    let status = collect_status(paths.clone()).await?;
    println!("{}", formatter.status(&status)?);
    Ok(())
}

/// Inspect every tier and count archive bundles.
pub async fn collect_status(paths: Paths) -> Result<StatusReport> {
    let config = paths.load_config();
    tokio::task::spawn_blocking(move || -> Result<StatusReport> {
        let store = paths.store();
        let rules = RuleSet::from_config(&config);

        let mut tiers = Vec::with_capacity(Tier::ALL.len());
        for tier in Tier::ALL {
            let state = match store.inspect(tier)? {
                TierHealth::Missing => TierState::Missing,
                TierHealth::Healthy { entries, .. } => TierState::Healthy { entries },
                TierHealth::Corrupted { reason } => TierState::Corrupted { reason },
            };
            tiers.push(TierStatus {
                tier,
                state,
                bytes: store.size_bytes(tier)?,
                max_entries: rules.rule(tier).max_entries,
            });
        }

        Ok(StatusReport {
            total_bytes: tiers.iter().map(|t| t.bytes).sum(),
            budget_bytes: config.total_budget_bytes(),
            bundles: paths.archive().list_bundles()?.len(),
            tiers,
        })
    })
    .await?
}

//! Archive bundle - an immutable batch of evicted-but-valuable records

use crate::{Record, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A write-once batch of archived records for one tier and one cleanup run
///
/// Serialized field names match the on-disk bundle format:
/// `{archived_at, data_type, entry_count, entries}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveBundle {
    /// When the bundle was produced (the cleanup run's instant)
    pub archived_at: DateTime<Utc>,

    /// Tier the entries were evicted from
    pub data_type: Tier,

    /// Number of entries (always equals `entries.len()`)
    pub entry_count: usize,

    /// Archived records, in classification order
    pub entries: Vec<Record>,
}

impl ArchiveBundle {
    /// Create a bundle for the given tier and run instant
    pub fn new(tier: Tier, archived_at: DateTime<Utc>, entries: Vec<Record>) -> Self {
        Self {
            archived_at,
            data_type: tier,
            entry_count: entries.len(),
            entries,
        }
    }

    /// Tier the bundle belongs to
    pub fn tier(&self) -> Tier {
        self.data_type
    }

    /// Year-month bucket the bundle is filed under (e.g. `2024-03`)
    pub fn bucket(&self) -> String {
        self.archived_at.format("%Y-%m").to_string()
    }

    /// Run timestamp used in the bundle identifier, millisecond precision
    pub fn run_stamp(&self) -> String {
        self.archived_at.format("%Y%m%dT%H%M%S%3fZ").to_string()
    }

    /// Bundle identifier: `{tier}-archive-{runStamp}`
    pub fn identifier(&self) -> String {
        format!("{}-archive-{}", self.data_type, self.run_stamp())
    }
}

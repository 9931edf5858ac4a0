//! In-memory store and archive doubles for unit tests

#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use curator_domain::{ArchiveBundle, ArchiveSink, Record, Tier, TierHealth, TierStore};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("mock failure: {0}")]
pub struct MockError(String);

/// Tier store backed by hash maps, with switchable failures
#[derive(Debug, Default)]
pub struct MockStore {
    pub tiers: HashMap<Tier, Vec<Record>>,
    pub corrupted: HashMap<Tier, String>,
    /// Reported size of each record, in bytes
    pub bytes_per_record: u64,
    pub fail_inspect: bool,
    pub fail_load: HashSet<Tier>,
    pub fail_save: HashSet<Tier>,
    pub fail_size: bool,
    pub saves: Vec<Tier>,
    pub quarantined: Vec<Tier>,
}

impl MockStore {
    pub fn with_all_tiers() -> Self {
        let mut store = Self::default();
        for tier in Tier::ALL {
            store.tiers.insert(tier, Vec::new());
        }
        store
    }

    pub fn corrupt(&mut self, tier: Tier, reason: &str) {
        self.tiers.remove(&tier);
        self.corrupted.insert(tier, reason.to_string());
    }

    fn bytes(&self, tier: Tier) -> u64 {
        self.tiers.get(&tier).map_or(0, |r| r.len() as u64) * self.bytes_per_record
    }
}

impl TierStore for MockStore {
    type Error = MockError;

    fn load(&self, tier: Tier) -> Result<Vec<Record>, Self::Error> {
        if self.fail_load.contains(&tier) {
            return Err(MockError(format!("cannot read {}", tier)));
        }
        if let Some(reason) = self.corrupted.get(&tier) {
            return Err(MockError(format!("{} is corrupted: {}", tier, reason)));
        }
        Ok(self.tiers.get(&tier).cloned().unwrap_or_default())
    }

    fn save(&mut self, tier: Tier, records: &[Record]) -> Result<(), Self::Error> {
        if self.fail_save.contains(&tier) {
            return Err(MockError(format!("cannot write {}", tier)));
        }
        self.tiers.insert(tier, records.to_vec());
        self.saves.push(tier);
        Ok(())
    }

    fn inspect(&self, tier: Tier) -> Result<TierHealth, Self::Error> {
        if self.fail_inspect {
            return Err(MockError(format!("cannot stat {}", tier)));
        }
        if let Some(reason) = self.corrupted.get(&tier) {
            return Ok(TierHealth::Corrupted {
                reason: reason.clone(),
            });
        }
        Ok(match self.tiers.get(&tier) {
            Some(records) => TierHealth::Healthy {
                entries: records.len(),
                bytes: self.bytes(tier),
            },
            None => TierHealth::Missing,
        })
    }

    fn initialize(&mut self, tier: Tier) -> Result<(), Self::Error> {
        self.tiers.entry(tier).or_default();
        Ok(())
    }

    fn quarantine(&mut self, tier: Tier, at: DateTime<Utc>) -> Result<String, Self::Error> {
        self.corrupted.remove(&tier);
        self.tiers.insert(tier, Vec::new());
        self.quarantined.push(tier);
        Ok(format!("mock://{}.corrupted-{}", tier, at.format("%Y%m%dT%H%M%SZ")))
    }

    fn size_bytes(&self, tier: Tier) -> Result<u64, Self::Error> {
        if self.fail_size {
            return Err(MockError("cannot measure".to_string()));
        }
        Ok(self.bytes(tier))
    }
}

/// Archive sink that keeps bundles in memory
#[derive(Debug, Default)]
pub struct MockArchive {
    pub bundles: Vec<ArchiveBundle>,
    pub fail: bool,
    pub fail_tiers: HashSet<Tier>,
}

impl MockArchive {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl ArchiveSink for MockArchive {
    type Error = MockError;

    fn write_bundle(&mut self, bundle: &ArchiveBundle) -> Result<String, Self::Error> {
        if self.fail || self.fail_tiers.contains(&bundle.data_type) {
            return Err(MockError("read-only file system".to_string()));
        }
        self.bundles.push(bundle.clone());
        Ok(format!("mock://{}", bundle.identifier()))
    }
}

//! Tier file integrity checks
//!
//! The guard self-heals rather than failing: corrupted tier files are
//! quarantined and replaced with empty collections, missing tier files are
//! created, and every problem it cannot fix is logged and recorded in the
//! [`IntegrityReport`].

use crate::config::QualityFilters;
use crate::RetentionConfig;
use chrono::{DateTime, Utc};
use curator_domain::record::parse_timestamp;
use curator_domain::{Record, Tier, TierHealth, TierStore};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Rate fields checked for consistency
const RATE_FIELDS: [&str; 3] = ["successRate", "engagementRate", "effectiveness"];

/// A tier file moved aside because it failed to parse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quarantined {
    /// Tier whose file was corrupted
    pub tier: Tier,
    /// Where the corrupted copy was moved (None in dry-run mode)
    pub location: Option<String>,
    /// Parser message
    pub reason: String,
}

/// What an integrity pass found and did
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IntegrityReport {
    /// Corrupted tier files moved aside
    pub quarantined: Vec<Quarantined>,
    /// Tiers created as empty collections
    pub created: Vec<Tier>,
    /// Tier files larger than the per-file limit, with their size in bytes
    pub oversized: Vec<(Tier, u64)>,
    /// Malformed records removed by the corrupted-data sweep
    pub corrupted_records_removed: BTreeMap<Tier, usize>,
    /// Problems that could not be repaired
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Whether the pass found nothing to report
    pub fn is_clean(&self) -> bool {
        self.quarantined.is_empty()
            && self.created.is_empty()
            && self.oversized.is_empty()
            && self.corrupted_records_removed.is_empty()
            && self.errors.is_empty()
    }
}

/// Detects and repairs unreadable, missing, and malformed tier data
#[derive(Debug, Clone)]
pub struct IntegrityGuard {
    filters: QualityFilters,
    max_file_bytes: u64,
    dry_run: bool,
}

impl IntegrityGuard {
    /// Create a guard from the quality filters and per-file limit in `config`
    pub fn new(config: &RetentionConfig, dry_run: bool) -> Self {
        Self {
            filters: config.quality_filters.clone(),
            max_file_bytes: config.max_file_size_bytes(),
            dry_run,
        }
    }

    /// Verify every tier, quarantining corrupted files and creating missing ones
    ///
    /// Never fails; problems that cannot be repaired land in
    /// [`IntegrityReport::errors`].
    pub fn check<S>(&self, store: &mut S, at: DateTime<Utc>) -> IntegrityReport
    where
        S: TierStore,
        S::Error: Display,
    {
        let mut report = IntegrityReport::default();

        for tier in Tier::ALL {
            let health = match store.inspect(tier) {
                Ok(health) => health,
                Err(e) => {
                    tracing::error!("Failed to inspect {}: {}", tier, e);
                    report.errors.push(format!("{}: {}", tier, e));
                    continue;
                }
            };

            match health {
                TierHealth::Missing => {
                    if !self.dry_run {
                        if let Err(e) = store.initialize(tier) {
                            tracing::error!("Failed to create {}: {}", tier, e);
                            report.errors.push(format!("{}: {}", tier, e));
                            continue;
                        }
                    }
                    tracing::warn!("Created missing tier {}", tier);
                    report.created.push(tier);
                }
                TierHealth::Corrupted { reason } => {
                    if !self.filters.validate_yaml_syntax {
                        tracing::warn!("Tier {} is corrupted ({}), leaving it in place", tier, reason);
                        report.errors.push(format!("{}: corrupted: {}", tier, reason));
                        continue;
                    }
                    let location = if self.dry_run {
                        None
                    } else {
                        match store.quarantine(tier, at) {
                            Ok(location) => Some(location),
                            Err(e) => {
                                tracing::error!("Failed to quarantine {}: {}", tier, e);
                                report.errors.push(format!("{}: {}", tier, e));
                                continue;
                            }
                        }
                    };
                    tracing::warn!(
                        "Quarantined corrupted tier {} ({}) to {}",
                        tier,
                        reason,
                        location.as_deref().unwrap_or("<dry run>")
                    );
                    report.quarantined.push(Quarantined {
                        tier,
                        location,
                        reason,
                    });
                }
                TierHealth::Healthy { bytes, .. } => {
                    if bytes > self.max_file_bytes {
                        tracing::warn!(
                            "Tier {} is {} bytes, over the {} byte file limit",
                            tier,
                            bytes,
                            self.max_file_bytes
                        );
                        report.oversized.push((tier, bytes));
                    }
                }
            }
        }

        report
    }

    /// Remove malformed records from every tier
    ///
    /// Does nothing unless `remove_corrupted_data` is enabled. Counts are
    /// added to `report`.
    pub fn sweep_corrupted_records<S>(&self, store: &mut S, report: &mut IntegrityReport)
    where
        S: TierStore,
        S::Error: Display,
    {
        if !self.filters.remove_corrupted_data {
            return;
        }

        for tier in Tier::ALL {
            let records = match store.load(tier) {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("Corrupted-data sweep could not load {}: {}", tier, e);
                    report.errors.push(format!("{}: {}", tier, e));
                    continue;
                }
            };

            let before = records.len();
            let clean: Vec<Record> = records
                .into_iter()
                .filter(|record| match corruption_reason(record, self.filters.check_data_consistency) {
                    Some(reason) => {
                        tracing::debug!("Dropping corrupted {} record: {}", tier, reason);
                        false
                    }
                    None => true,
                })
                .collect();

            let removed = before - clean.len();
            if removed == 0 {
                continue;
            }

            if !self.dry_run {
                if let Err(e) = store.save(tier, &clean) {
                    tracing::error!("Failed to rewrite {} after sweep: {}", tier, e);
                    report.errors.push(format!("{}: {}", tier, e));
                    continue;
                }
            }
            tracing::warn!("Removed {} corrupted records from {}", removed, tier);
            report.corrupted_records_removed.insert(tier, removed);
        }
    }
}

/// Why a record counts as corrupted, if it does
///
/// A record that is not a mapping is always corrupted. With
/// `check_consistency`, an unparsable `timestamp` or a rate field that is not
/// a non-negative number is corruption too. Absent or null fields are fine.
pub fn corruption_reason(record: &Record, check_consistency: bool) -> Option<String> {
    if !record.is_mapping() {
        return Some("entry is not a mapping".to_string());
    }
    if !check_consistency {
        return None;
    }

    if let Some(ts) = record.field("timestamp").filter(|v| !v.is_null()) {
        if parse_timestamp(ts).is_none() {
            return Some(format!("unparsable timestamp {}", ts));
        }
    }

    for name in RATE_FIELDS {
        match record.field(name) {
            None | Some(Value::Null) => {}
            Some(value) => match value.as_f64() {
                Some(rate) if rate.is_finite() && rate >= 0.0 => {}
                Some(rate) => return Some(format!("{} is negative ({})", name, rate)),
                None => return Some(format!("{} is not a number", name)),
            },
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockStore;
    use serde_json::json;

    fn guard() -> IntegrityGuard {
        IntegrityGuard::new(&RetentionConfig::default(), false)
    }

    #[test]
    fn test_creates_missing_tiers() {
        let mut store = MockStore::default();
        let report = guard().check(&mut store, Utc::now());
        assert_eq!(report.created, Tier::ALL.to_vec());
        for tier in Tier::ALL {
            assert!(store.tiers.contains_key(&tier));
        }
    }

    #[test]
    fn test_quarantines_corrupted_tier() {
        let mut store = MockStore::with_all_tiers();
        store.corrupt(Tier::HighEngagement, "mapping values are not allowed here");

        let report = guard().check(&mut store, Utc::now());
        assert_eq!(report.quarantined.len(), 1);
        assert_eq!(report.quarantined[0].tier, Tier::HighEngagement);
        assert!(report.quarantined[0].location.is_some());
        assert_eq!(store.quarantined, vec![Tier::HighEngagement]);
        assert!(store.load(Tier::HighEngagement).unwrap().is_empty());
    }

    #[test]
    fn test_syntax_validation_disabled_leaves_file() {
        let mut config = RetentionConfig::default();
        config.quality_filters.validate_yaml_syntax = false;
        let mut store = MockStore::with_all_tiers();
        store.corrupt(Tier::SuccessPatterns, "bad indent");

        let report = IntegrityGuard::new(&config, false).check(&mut store, Utc::now());
        assert!(report.quarantined.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(store.quarantined.is_empty());
    }

    #[test]
    fn test_dry_run_repairs_nothing() {
        let mut store = MockStore::default();
        store.corrupt(Tier::EffectiveTopics, "tab character");

        let report = IntegrityGuard::new(&RetentionConfig::default(), true).check(&mut store, Utc::now());
        assert_eq!(report.created, vec![Tier::SuccessPatterns, Tier::HighEngagement]);
        assert_eq!(report.quarantined[0].location, None);
        assert!(store.quarantined.is_empty());
        assert!(!store.tiers.contains_key(&Tier::SuccessPatterns));
    }

    #[test]
    fn test_flags_oversized_tier() {
        let mut config = RetentionConfig::default();
        config.performance_constraints.max_file_size_mb = 0.001;
        let mut store = MockStore::with_all_tiers();
        store.bytes_per_record = 600;
        store.tiers.insert(
            Tier::SuccessPatterns,
            vec![Record::new(json!({ "id": 1 })), Record::new(json!({ "id": 2 }))],
        );

        let report = IntegrityGuard::new(&config, false).check(&mut store, Utc::now());
        assert_eq!(report.oversized, vec![(Tier::SuccessPatterns, 1200)]);
    }

    #[test]
    fn test_inspect_failure_is_recorded_not_raised() {
        let mut store = MockStore::with_all_tiers();
        store.fail_inspect = true;
        let report = guard().check(&mut store, Utc::now());
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_corruption_reasons() {
        assert!(corruption_reason(&Record::new(json!("plain string")), false).is_some());
        assert!(corruption_reason(&Record::new(json!({ "timestamp": "yesterday" })), false).is_none());
        assert!(corruption_reason(&Record::new(json!({ "timestamp": "yesterday" })), true).is_some());
        assert!(corruption_reason(&Record::new(json!({ "successRate": "high" })), true).is_some());
        assert!(corruption_reason(&Record::new(json!({ "engagementRate": -1.0 })), true).is_some());
        assert!(corruption_reason(
            &Record::new(json!({ "timestamp": "2024-05-01T10:00:00Z", "effectiveness": 0.4 })),
            true
        )
        .is_none());
        assert!(corruption_reason(&Record::new(json!({ "timestamp": null })), true).is_none());
    }

    #[test]
    fn test_sweep_removes_malformed_records() {
        let mut store = MockStore::with_all_tiers();
        store.tiers.insert(
            Tier::EffectiveTopics,
            vec![
                Record::new(json!({ "effectiveness": 0.9 })),
                Record::new(json!(42)),
                Record::new(json!({ "effectiveness": "very" })),
            ],
        );

        let mut report = IntegrityReport::default();
        guard().sweep_corrupted_records(&mut store, &mut report);

        assert_eq!(report.corrupted_records_removed.get(&Tier::EffectiveTopics), Some(&2));
        assert_eq!(
            store.load(Tier::EffectiveTopics).unwrap(),
            vec![Record::new(json!({ "effectiveness": 0.9 }))]
        );
    }

    #[test]
    fn test_sweep_disabled() {
        let mut config = RetentionConfig::default();
        config.quality_filters.remove_corrupted_data = false;
        let mut store = MockStore::with_all_tiers();
        store.tiers.insert(Tier::SuccessPatterns, vec![Record::new(json!(null))]);

        let mut report = IntegrityReport::default();
        IntegrityGuard::new(&config, false).sweep_corrupted_records(&mut store, &mut report);
        assert!(report.is_clean());
        assert_eq!(store.tiers[&Tier::SuccessPatterns].len(), 1);
    }
}

//! Per-tier cleanup pipeline
//!
//! load → deduplicate → classify → enforce capacity → archive → rewrite.
//! The archive is written before the tier is rewritten; if archiving fails
//! the tier is left untouched.

use crate::archiver::Archiver;
use crate::dedup::Deduplicator;
use crate::report::TierReport;
use crate::rules::{RetentionRule, RuleSet};
use crate::scoring::{quick_score, ValueScorer};
use crate::JanitorError;
use chrono::{DateTime, Utc};
use curator_domain::{ArchiveSink, ContentHasher, Record, Tier, TierStore};
use std::cmp::Ordering;
use std::fmt::Display;

/// Where a record goes after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Stays in the tier
    Keep,
    /// Moves into an archive bundle
    Archive,
    /// Discarded
    Delete,
}

/// Classify one record against a tier rule
///
/// In order: the cross-tier value floor keeps it; a recent record whose rate
/// meets the keep threshold keeps it; a rate meeting the archive threshold
/// archives it; anything else is deleted.
pub fn classify(
    record: &Record,
    rule: &RetentionRule,
    min_total_value_score: f64,
    scorer: &ValueScorer,
) -> Disposition {
    if scorer.score(record).total >= min_total_value_score {
        return Disposition::Keep;
    }

    let age = record.age_days(scorer.now());
    let rate = rule.effective_rate(record, age);

    if rate >= rule.min_rate_threshold && age <= rule.retention_days_for(record) {
        Disposition::Keep
    } else if rate >= rule.archive_threshold {
        Disposition::Archive
    } else {
        Disposition::Delete
    }
}

/// Records split by disposition, after capacity enforcement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Records to write back, in input order
    pub keep: Vec<Record>,
    /// Records to archive: classified archives first, then capacity overflow
    pub archive: Vec<Record>,
    /// Records to discard
    pub delete: Vec<Record>,
    /// How many keep candidates were demoted to the archive by the cap
    pub capacity_demoted: usize,
}

/// Partition deduplicated records for one tier
///
/// When more records qualify for keeping than `rule.max_entries` allows, the
/// lowest by [`quick_score`] are demoted to the archive (ties keep the earlier
/// record). Overflow is never deleted.
pub fn partition(
    records: Vec<Record>,
    rule: &RetentionRule,
    min_total_value_score: f64,
    now: DateTime<Utc>,
) -> Partition {
    let scorer = ValueScorer::new(now);
    let mut out = Partition::default();

    for record in records {
        match classify(&record, rule, min_total_value_score, &scorer) {
            Disposition::Keep => out.keep.push(record),
            Disposition::Archive => out.archive.push(record),
            Disposition::Delete => out.delete.push(record),
        }
    }

    if out.keep.len() > rule.max_entries {
        let (kept, demoted) = enforce_capacity(std::mem::take(&mut out.keep), rule.max_entries, now);
        out.capacity_demoted = demoted.len();
        out.keep = kept;
        out.archive.extend(demoted);
    }

    out
}

/// Keep the `max_entries` best candidates in their original order
fn enforce_capacity(
    candidates: Vec<Record>,
    max_entries: usize,
    now: DateTime<Utc>,
) -> (Vec<Record>, Vec<Record>) {
    let mut ranked: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, record)| (i, quick_score(record, now)))
        .collect();
    // stable: equal scores keep input order
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut survives = vec![false; candidates.len()];
    for &(i, _) in ranked.iter().take(max_entries) {
        survives[i] = true;
    }

    let mut kept = Vec::with_capacity(max_entries);
    let mut demoted = Vec::with_capacity(candidates.len().saturating_sub(max_entries));
    for (record, survives) in candidates.into_iter().zip(survives) {
        if survives {
            kept.push(record);
        } else {
            demoted.push(record);
        }
    }
    (kept, demoted)
}

/// Runs the cleanup pipeline for one tier under an explicit rule set
#[derive(Debug, Clone, Copy)]
pub struct TierCleaner<'r> {
    rules: &'r RuleSet,
    now: DateTime<Utc>,
    dry_run: bool,
}

impl<'r> TierCleaner<'r> {
    /// Create a cleaner evaluating ages relative to `now`
    pub fn new(rules: &'r RuleSet, now: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            rules,
            now,
            dry_run,
        }
    }

    /// Clean one tier
    ///
    /// `dedup` is shared across tiers so duplicates are removed dataset-wide.
    /// The tier is rewritten only when the kept set is smaller than what was
    /// loaded. On [`JanitorError::ArchiveWrite`] the tier is not modified.
    pub fn clean<S, A, H>(
        &self,
        tier: Tier,
        store: &mut S,
        archiver: &mut Archiver<'_, A>,
        dedup: &mut Deduplicator<H>,
    ) -> Result<TierReport, JanitorError>
    where
        S: TierStore,
        S::Error: Display,
        A: ArchiveSink,
        A::Error: Display,
        H: ContentHasher,
    {
        let records = store.load(tier).map_err(|e| JanitorError::TierCleanup {
            tier,
            reason: format!("load failed: {}", e),
        })?;
        let loaded = records.len();

        let (unique, duplicates) = dedup.dedup(records);
        let rule = self.rules.rule(tier);
        let parts = partition(unique, rule, self.rules.min_total_value_score, self.now);

        let archive_location = archiver.archive(tier, self.now, &parts.archive)?;

        let rewritten = !self.dry_run && parts.keep.len() != loaded;
        if rewritten {
            store.save(tier, &parts.keep).map_err(|e| JanitorError::TierCleanup {
                tier,
                reason: format!("save failed: {}", e),
            })?;
        }

        let report = TierReport {
            tier,
            loaded,
            duplicates,
            kept: parts.keep.len(),
            archived: parts.archive.len(),
            deleted: parts.delete.len(),
            capacity_demoted: parts.capacity_demoted,
            archive_location,
            rewritten,
        };
        tracing::info!(
            "Cleaned {}: loaded {}, kept {}, archived {}, deleted {}, duplicates {}",
            tier,
            report.loaded,
            report.kept,
            report.archived,
            report.deleted,
            report.duplicates
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::Blake3Hasher;
    use crate::test_support::{MockArchive, MockStore};
    use crate::RetentionConfig;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn aged(days: i64, mut fields: Value) -> Record {
        fields["timestamp"] = json!((now() - Duration::days(days)).to_rfc3339());
        Record::new(fields)
    }

    fn classify_default(tier: Tier, record: &Record) -> Disposition {
        let rules = RuleSet::default();
        classify(record, rules.rule(tier), rules.min_total_value_score, &ValueScorer::new(now()))
    }

    #[test]
    fn test_recent_high_success_is_kept() {
        let record = aged(5, json!({ "successRate": 0.95 }));
        assert_eq!(classify_default(Tier::SuccessPatterns, &record), Disposition::Keep);
    }

    #[test]
    fn test_decayed_engagement_is_deleted() {
        let record = aged(120, json!({ "engagementRate": 1.0 }));
        assert_eq!(classify_default(Tier::HighEngagement, &record), Disposition::Delete);
    }

    #[test]
    fn test_decay_can_push_into_archive_band() {
        // 3.2 * 0.7 = 2.24 < 2.4 archive bar
        let decayed = aged(120, json!({ "engagementRate": 3.2 }));
        assert_eq!(classify_default(Tier::HighEngagement, &decayed), Disposition::Delete);

        // 4.0 * 0.7 = 2.8: below keep, above archive
        let archived = aged(120, json!({ "engagementRate": 4.0 }));
        assert_eq!(classify_default(Tier::HighEngagement, &archived), Disposition::Archive);
    }

    #[test]
    fn test_old_decent_record_is_archived() {
        let record = aged(90, json!({ "successRate": 0.6 }));
        assert_eq!(classify_default(Tier::SuccessPatterns, &record), Disposition::Archive);
    }

    #[test]
    fn test_value_floor_overrides_rate() {
        let record = aged(
            400,
            json!({
                "successRate": 0.0,
                "educationalContent": { "complexity": 1.0, "topicRelevance": 1.0, "learningValue": 1.0 }
            }),
        );
        assert_eq!(classify_default(Tier::SuccessPatterns, &record), Disposition::Keep);
    }

    #[test]
    fn test_seasonal_records_live_longer() {
        let seasonal = aged(200, json!({ "effectiveness": 0.9, "isSeasonal": true }));
        let trend = aged(200, json!({ "effectiveness": 0.9 }));
        assert_eq!(classify_default(Tier::EffectiveTopics, &seasonal), Disposition::Keep);
        assert_eq!(classify_default(Tier::EffectiveTopics, &trend), Disposition::Archive);
    }

    #[test]
    fn test_capacity_demotes_lowest_quick_scores() {
        let mut rule = RuleSet::default().success_patterns;
        rule.max_entries = 50;
        let records: Vec<Record> = (0..60)
            .map(|i| aged(1, json!({ "id": i, "successRate": 0.7 + f64::from(i) * 0.001 })))
            .collect();

        let parts = partition(records, &rule, 1000.0, now());
        assert_eq!(parts.keep.len(), 50);
        assert_eq!(parts.archive.len(), 10);
        assert_eq!(parts.capacity_demoted, 10);
        assert!(parts.delete.is_empty());

        let demoted: Vec<i64> = parts
            .archive
            .iter()
            .map(|r| r.field("id").and_then(Value::as_i64).unwrap())
            .collect();
        assert_eq!(demoted, (0..10).collect::<Vec<_>>());

        let kept: Vec<i64> = parts
            .keep
            .iter()
            .map(|r| r.field("id").and_then(Value::as_i64).unwrap())
            .collect();
        assert_eq!(kept, (10..60).collect::<Vec<_>>());
    }

    #[test]
    fn test_capacity_ties_keep_earlier_records() {
        let mut rule = RuleSet::default().success_patterns;
        rule.max_entries = 2;
        let records: Vec<Record> = (0..4)
            .map(|i| aged(1, json!({ "id": i, "successRate": 0.9 })))
            .collect();
        let parts = partition(records, &rule, 1000.0, now());
        assert_eq!(parts.keep[0].field("id"), Some(&json!(0)));
        assert_eq!(parts.keep[1].field("id"), Some(&json!(1)));
    }

    #[test]
    fn test_clean_rewrites_and_archives() {
        let rules = RuleSet::default();
        let mut store = MockStore::with_all_tiers();
        store.tiers.insert(
            Tier::SuccessPatterns,
            vec![
                aged(5, json!({ "id": 1, "successRate": 0.95 })),
                aged(90, json!({ "id": 2, "successRate": 0.6 })),
                aged(90, json!({ "id": 3, "successRate": 0.1 })),
                aged(5, json!({ "id": 1, "successRate": 0.95 })),
            ],
        );
        let mut sink = MockArchive::default();
        let mut archiver = Archiver::new(&mut sink, false);
        let mut dedup = Deduplicator::new(Blake3Hasher);

        let report = TierCleaner::new(&rules, now(), false)
            .clean(Tier::SuccessPatterns, &mut store, &mut archiver, &mut dedup)
            .unwrap();

        assert_eq!(report.loaded, 4);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.kept, 1);
        assert_eq!(report.archived, 1);
        assert_eq!(report.deleted, 1);
        assert!(report.rewritten);
        assert!(report.is_balanced());
        assert!(report.archive_location.is_some());
        assert_eq!(store.tiers[&Tier::SuccessPatterns].len(), 1);
        assert_eq!(sink.bundles.len(), 1);
    }

    #[test]
    fn test_unchanged_tier_is_not_rewritten() {
        let rules = RuleSet::default();
        let mut store = MockStore::with_all_tiers();
        store
            .tiers
            .insert(Tier::SuccessPatterns, vec![aged(5, json!({ "successRate": 0.95 }))]);
        let mut sink = MockArchive::default();
        let mut archiver = Archiver::new(&mut sink, false);
        let mut dedup = Deduplicator::new(Blake3Hasher);

        let report = TierCleaner::new(&rules, now(), false)
            .clean(Tier::SuccessPatterns, &mut store, &mut archiver, &mut dedup)
            .unwrap();

        assert!(!report.rewritten);
        assert!(store.saves.is_empty());
        assert!(sink.bundles.is_empty());
    }

    #[test]
    fn test_archive_failure_leaves_tier_untouched() {
        let rules = RuleSet::default();
        let original = vec![
            aged(5, json!({ "successRate": 0.95 })),
            aged(90, json!({ "successRate": 0.6 })),
        ];
        let mut store = MockStore::with_all_tiers();
        store.tiers.insert(Tier::SuccessPatterns, original.clone());
        let mut sink = MockArchive::failing();
        let mut archiver = Archiver::new(&mut sink, false);
        let mut dedup = Deduplicator::new(Blake3Hasher);

        let err = TierCleaner::new(&rules, now(), false)
            .clean(Tier::SuccessPatterns, &mut store, &mut archiver, &mut dedup)
            .unwrap_err();

        assert!(matches!(err, JanitorError::ArchiveWrite { .. }));
        assert!(store.saves.is_empty());
        assert_eq!(store.tiers[&Tier::SuccessPatterns], original);
    }

    #[test]
    fn test_load_failure_is_tier_cleanup_error() {
        let rules = RuleSet::default();
        let mut store = MockStore::with_all_tiers();
        store.fail_load.insert(Tier::EffectiveTopics);
        let mut sink = MockArchive::default();
        let mut archiver = Archiver::new(&mut sink, false);
        let mut dedup = Deduplicator::new(Blake3Hasher);

        let err = TierCleaner::new(&rules, now(), false)
            .clean(Tier::EffectiveTopics, &mut store, &mut archiver, &mut dedup)
            .unwrap_err();
        assert_eq!(err.tier(), Some(Tier::EffectiveTopics));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let rules = RuleSet::default();
        let mut store = MockStore::with_all_tiers();
        store.tiers.insert(
            Tier::SuccessPatterns,
            vec![aged(90, json!({ "successRate": 0.6 })), aged(90, json!({ "successRate": 0.1 }))],
        );
        let mut sink = MockArchive::default();
        let mut archiver = Archiver::new(&mut sink, true);
        let mut dedup = Deduplicator::new(Blake3Hasher);

        let report = TierCleaner::new(&rules, now(), true)
            .clean(Tier::SuccessPatterns, &mut store, &mut archiver, &mut dedup)
            .unwrap();

        assert_eq!(report.archived, 1);
        assert_eq!(report.deleted, 1);
        assert!(!report.rewritten);
        assert!(store.saves.is_empty());
        assert!(sink.bundles.is_empty());
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        (0u32..400, 0.0f64..1.2, 0.0f64..6.0, 0.0f64..1.0, any::<bool>(), 0u8..20).prop_map(
            |(age, success, engagement, effectiveness, seasonal, tag)| {
                aged(
                    i64::from(age),
                    json!({
                        "successRate": success,
                        "engagementRate": engagement,
                        "effectiveness": effectiveness,
                        "isSeasonal": seasonal,
                        "tag": tag,
                    }),
                )
            },
        )
    }

    fn arb_config() -> impl Strategy<Value = RetentionConfig> {
        (1usize..30, 1usize..30, 1usize..30, 0.0f64..80.0).prop_map(|(sp, he, et, floor)| {
            let mut config = RetentionConfig::default();
            config.success_patterns.max_entries = sp;
            config.high_engagement.max_entries = he;
            config.effective_topics.max_entries = et;
            config.value_assessment.min_total_value_score = floor;
            config
        })
    }

    proptest! {
        #[test]
        fn kept_never_exceeds_capacity(
            config in arb_config(),
            records in prop::collection::vec(arb_record(), 0..80),
        ) {
            let rules = RuleSet::from_config(&config);
            for tier in Tier::ALL {
                let rule = rules.rule(tier);
                let parts = partition(records.clone(), rule, rules.min_total_value_score, now());
                prop_assert!(parts.keep.len() <= rule.max_entries);
            }
        }

        #[test]
        fn partition_accounts_for_every_record(
            config in arb_config(),
            records in prop::collection::vec(arb_record(), 0..80),
        ) {
            let (unique, _) = Deduplicator::new(Blake3Hasher).dedup(records);
            let rules = RuleSet::from_config(&config);
            for tier in Tier::ALL {
                let parts = partition(unique.clone(), rules.rule(tier), rules.min_total_value_score, now());
                prop_assert_eq!(parts.keep.len() + parts.archive.len() + parts.delete.len(), unique.len());

                let mut seen: Vec<Vec<u8>> = parts
                    .keep
                    .iter()
                    .chain(&parts.archive)
                    .chain(&parts.delete)
                    .map(Record::canonical_bytes)
                    .collect();
                let mut expected: Vec<Vec<u8>> = unique.iter().map(Record::canonical_bytes).collect();
                seen.sort();
                expected.sort();
                prop_assert_eq!(seen, expected);
            }
        }

        #[test]
        fn emergency_keeps_no_more_than_normal(
            config in arb_config(),
            records in prop::collection::vec(arb_record(), 0..80),
        ) {
            let normal = RuleSet::from_config(&config);
            let emergency = normal.emergency();
            for tier in Tier::ALL {
                let n = partition(records.clone(), normal.rule(tier), normal.min_total_value_score, now());
                let e = partition(records.clone(), emergency.rule(tier), emergency.min_total_value_score, now());
                prop_assert!(e.keep.len() <= n.keep.len());
            }
        }
    }
}

//! Resolved per-tier retention rules
//!
//! A [`RuleSet`] is derived from a [`RetentionConfig`] once and then passed
//! explicitly into every cleanup pass. Emergency mode builds a second,
//! tightened `RuleSet` instead of mutating the active one.

use crate::RetentionConfig;
use curator_domain::{Record, Tier};
use serde::Serialize;

/// Emergency capacity multiplier
pub const EMERGENCY_CAPACITY_FACTOR: f64 = 0.6;

/// Emergency multiplier for keep thresholds and the value floor
pub const EMERGENCY_KEEP_FACTOR: f64 = 1.2;

/// Emergency multiplier for archive thresholds
pub const EMERGENCY_ARCHIVE_FACTOR: f64 = 1.1;

/// Engagement multiplier applied once a record is older than the decay window
pub const ENGAGEMENT_DECAY_FACTOR: f64 = 0.7;

/// Archive threshold as a fraction of the keep threshold for rate-derived tiers
pub const DERIVED_ARCHIVE_RATIO: f64 = 0.8;

const DAYS_PER_YEAR: f64 = 365.0;

/// Tier-specific extension to the common rule shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierExtra {
    /// No extension
    None,

    /// Old records have their rate discounted before comparison
    PerformanceDecay {
        /// Age (days) after which the discount applies
        after_days: f64,
        /// Multiplier applied to the rate
        factor: f64,
    },

    /// Records flagged `isSeasonal` use a longer retention window
    Seasonal {
        /// Retention window (days) for seasonal records
        retention_days: f64,
    },
}

/// Numeric thresholds governing keep/archive/delete for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetentionRule {
    /// Tier the rule applies to
    pub tier: Tier,

    /// Maximum records kept after a run
    pub max_entries: usize,

    /// Keep threshold for the tier's primary rate
    pub min_rate_threshold: f64,

    /// Age (days) within which a record may be kept on its rate alone
    pub retention_days: f64,

    /// Archive threshold for the tier's primary rate (never above the keep threshold)
    pub archive_threshold: f64,

    /// Tier-specific extension
    pub extra: TierExtra,
}

impl RetentionRule {
    /// Primary rate after tier-specific adjustments
    pub fn effective_rate(&self, record: &Record, age_days: f64) -> f64 {
        let rate = record.rate(self.tier);
        match self.extra {
            TierExtra::PerformanceDecay { after_days, factor } if age_days > after_days => {
                rate * factor
            }
            _ => rate,
        }
    }

    /// Retention window (days) that applies to `record`
    pub fn retention_days_for(&self, record: &Record) -> f64 {
        match self.extra {
            TierExtra::Seasonal { retention_days } if record.is_seasonal() => {
                retention_days.max(self.retention_days)
            }
            _ => self.retention_days,
        }
    }

    /// Strictly tighter copy for emergency mode
    ///
    /// Capacity shrinks to 60% (at least 1), the keep threshold rises by 20%,
    /// and the archive threshold rises by 10% without exceeding the new keep
    /// threshold. Windows are unchanged.
    pub fn tightened(&self) -> Self {
        let max_entries = ((self.max_entries as f64) * EMERGENCY_CAPACITY_FACTOR).floor() as usize;
        let min_rate_threshold = self.min_rate_threshold * EMERGENCY_KEEP_FACTOR;
        let archive_threshold =
            (self.archive_threshold * EMERGENCY_ARCHIVE_FACTOR).min(min_rate_threshold);

        Self {
            max_entries: max_entries.clamp(1, self.max_entries.max(1)),
            min_rate_threshold,
            archive_threshold,
            ..*self
        }
    }
}

/// The complete set of rules for one cleanup pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSet {
    /// success-patterns rule
    pub success_patterns: RetentionRule,

    /// high-engagement rule
    pub high_engagement: RetentionRule,

    /// effective-topics rule
    pub effective_topics: RetentionRule,

    /// Cross-tier quality floor: a record scoring at least this is kept
    pub min_total_value_score: f64,
}

impl RuleSet {
    /// Resolve rules from a configuration document
    pub fn from_config(config: &RetentionConfig) -> Self {
        let sp = &config.success_patterns;
        let he = &config.high_engagement;
        let et = &config.effective_topics;

        Self {
            success_patterns: RetentionRule {
                tier: Tier::SuccessPatterns,
                max_entries: sp.max_entries,
                min_rate_threshold: sp.min_success_rate,
                retention_days: f64::from(sp.retention_days),
                archive_threshold: sp.archive_threshold.min(sp.min_success_rate),
                extra: TierExtra::None,
            },
            high_engagement: RetentionRule {
                tier: Tier::HighEngagement,
                max_entries: he.max_entries,
                min_rate_threshold: he.min_engagement_rate,
                retention_days: f64::from(he.retention_days),
                archive_threshold: he.min_engagement_rate * DERIVED_ARCHIVE_RATIO,
                extra: TierExtra::PerformanceDecay {
                    after_days: f64::from(he.performance_decay_days),
                    factor: ENGAGEMENT_DECAY_FACTOR,
                },
            },
            effective_topics: RetentionRule {
                tier: Tier::EffectiveTopics,
                max_entries: et.max_entries,
                min_rate_threshold: et.effectiveness_threshold,
                retention_days: f64::from(et.trend_data_retention_days),
                archive_threshold: et.effectiveness_threshold * DERIVED_ARCHIVE_RATIO,
                extra: TierExtra::Seasonal {
                    retention_days: f64::from(et.seasonal_data_years) * DAYS_PER_YEAR,
                },
            },
            min_total_value_score: config.value_assessment.min_total_value_score,
        }
    }

    /// Rule for a tier
    pub fn rule(&self, tier: Tier) -> &RetentionRule {
        match tier {
            Tier::SuccessPatterns => &self.success_patterns,
            Tier::HighEngagement => &self.high_engagement,
            Tier::EffectiveTopics => &self.effective_topics,
        }
    }

    /// Derived, strictly tighter rule set for emergency mode
    pub fn emergency(&self) -> Self {
        Self {
            success_patterns: self.success_patterns.tightened(),
            high_engagement: self.high_engagement.tightened(),
            effective_topics: self.effective_topics.tightened(),
            min_total_value_score: self.min_total_value_score * EMERGENCY_KEEP_FACTOR,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_config(&RetentionConfig::default())
    }
}

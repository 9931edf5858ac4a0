//! Record scoring
//!
//! Two scores exist. [`ValueScorer`] produces the multi-factor [`ValueScore`]
//! used for keep/archive/delete classification. [`quick_score`] is a cheaper
//! ranking-only score used to decide which keep candidates survive when a
//! tier is over capacity.

use chrono::{DateTime, Utc};
use curator_domain::{Record, ValueScore};
use serde_json::Value;

/// Weights applied to the structured educational sub-object
const COMPLEXITY_WEIGHT: f64 = 10.0;
const TOPIC_RELEVANCE_WEIGHT: f64 = 15.0;
const LEARNING_VALUE_WEIGHT: f64 = 20.0;

/// Content-length term: one point per ten characters, capped
const CONTENT_LENGTH_DIVISOR: f64 = 10.0;
const CONTENT_LENGTH_CAP: f64 = 30.0;
const EDUCATIONAL_KEYWORD_BONUS: f64 = 15.0;

const LIKE_WEIGHT: f64 = 0.5;
const RETWEET_WEIGHT: f64 = 2.0;
const REPLY_WEIGHT: f64 = 1.5;
const ENGAGEMENT_CAP: f64 = 50.0;

const RECENCY_MAX: f64 = 20.0;
const RECENCY_DECAY_PER_DAY: f64 = 0.5;

/// Keywords marking content as educational (matched case-insensitively)
pub const EDUCATIONAL_KEYWORDS: &[&str] = &[
    "tutorial",
    "learn",
    "guide",
    "explained",
    "how to",
    "lesson",
    "tip",
    "insight",
    "example",
    "beginner",
];

/// Recency term: 20 for a brand-new record, falling to 0 at 40 days
pub fn recency(age_days: f64) -> f64 {
    (RECENCY_MAX - age_days * RECENCY_DECAY_PER_DAY).max(0.0)
}

/// Ranking-only score used for capacity trimming
///
/// `engagementRate*30 + successRate*40 + recency + effectiveness*10`
pub fn quick_score(record: &Record, now: DateTime<Utc>) -> f64 {
    record.engagement_rate() * 30.0
        + record.success_rate() * 40.0
        + recency(record.age_days(now))
        + record.effectiveness() * 10.0
}

/// Multi-factor value scorer
///
/// Scoring never fails: missing or malformed sub-fields contribute 0.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use curator_domain::Record;
/// use curator_janitor::ValueScorer;
/// use serde_json::json;
///
/// let now = Utc::now();
/// let record = Record::new(json!({
///     "timestamp": now.to_rfc3339(),
///     "engagement": { "likes": 10, "retweets": 2, "replies": 4 }
/// }));
/// let score = ValueScorer::new(now).score(&record);
/// assert_eq!(score.engagement_score, 15.0);
/// assert_eq!(score.recency_score, 20.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValueScorer {
    now: DateTime<Utc>,
}

impl ValueScorer {
    /// Create a scorer evaluating recency relative to `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Reference instant for ages
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Score a record
    pub fn score(&self, record: &Record) -> ValueScore {
        ValueScore::from_components(
            educational_value(record),
            engagement_score(record),
            recency(record.age_days(self.now)),
            record.strategic_bonus(),
        )
    }
}

fn sub_number(object: &Value, name: &str) -> f64 {
    object.get(name).and_then(Value::as_f64).unwrap_or(0.0)
}

fn educational_value(record: &Record) -> f64 {
    if let Some(edu) = record.field("educationalContent").filter(|v| v.is_object()) {
        return sub_number(edu, "complexity") * COMPLEXITY_WEIGHT
            + sub_number(edu, "topicRelevance") * TOPIC_RELEVANCE_WEIGHT
            + sub_number(edu, "learningValue") * LEARNING_VALUE_WEIGHT;
    }

    match record.content() {
        Some(content) => {
            let length = (content.chars().count() as f64 / CONTENT_LENGTH_DIVISOR)
                .min(CONTENT_LENGTH_CAP);
            let lower = content.to_lowercase();
            let bonus = if EDUCATIONAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
                EDUCATIONAL_KEYWORD_BONUS
            } else {
                0.0
            };
            length + bonus
        }
        None => 0.0,
    }
}

fn engagement_score(record: &Record) -> f64 {
    match record.field("engagement").filter(|v| v.is_object()) {
        Some(eng) => (sub_number(eng, "likes") * LIKE_WEIGHT
            + sub_number(eng, "retweets") * RETWEET_WEIGHT
            + sub_number(eng, "replies") * REPLY_WEIGHT)
            .min(ENGAGEMENT_CAP),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn aged(days: i64, mut fields: Value) -> Record {
        fields["timestamp"] = json!((now() - Duration::days(days)).to_rfc3339());
        Record::new(fields)
    }

    #[test]
    fn test_recency_curve() {
        assert_eq!(recency(0.0), 20.0);
        assert_eq!(recency(10.0), 15.0);
        assert_eq!(recency(40.0), 0.0);
        assert_eq!(recency(400.0), 0.0);
    }

    #[test]
    fn test_structured_educational_content() {
        let record = aged(
            100,
            json!({
                "educationalContent": { "complexity": 1.0, "topicRelevance": 2.0, "learningValue": 0.5 },
                "content": "ignored when the structured object exists, even with a tutorial keyword"
            }),
        );
        let score = ValueScorer::new(now()).score(&record);
        assert_eq!(score.educational_value, 10.0 + 30.0 + 10.0);
    }

    #[test]
    fn test_content_length_and_keywords() {
        let scorer = ValueScorer::new(now());

        let short = aged(100, json!({ "content": "0123456789012345678901234" }));
        assert_eq!(scorer.score(&short).educational_value, 2.5);

        let long = aged(100, json!({ "content": "x".repeat(1000) }));
        assert_eq!(scorer.score(&long).educational_value, 30.0);

        let keyword = aged(100, json!({ "content": "A Beginner GUIDE" }));
        assert_eq!(scorer.score(&keyword).educational_value, 1.6 + 15.0);
    }

    #[test]
    fn test_engagement_cap() {
        let scorer = ValueScorer::new(now());
        let viral = aged(100, json!({ "engagement": { "likes": 1000, "retweets": 500 } }));
        assert_eq!(scorer.score(&viral).engagement_score, 50.0);
    }

    #[test]
    fn test_malformed_sub_objects_score_zero() {
        let scorer = ValueScorer::new(now());
        let record = aged(
            100,
            json!({
                "educationalContent": "not an object",
                "engagement": ["likes", 5],
            }),
        );
        let score = scorer.score(&record);
        assert_eq!(score.educational_value, 0.0);
        assert_eq!(score.engagement_score, 0.0);
        assert_eq!(score.total, 0.0);
    }

    #[test]
    fn test_strategic_bonus_and_floor() {
        let scorer = ValueScorer::new(now());
        let boosted = aged(0, json!({ "strategicBonus": 12.5 }));
        assert_eq!(scorer.score(&boosted).total, 32.5);

        let penalized = aged(0, json!({ "strategicBonus": -100 }));
        assert_eq!(scorer.score(&penalized).total, 0.0);
    }

    #[test]
    fn test_missing_timestamp_is_epoch() {
        let scorer = ValueScorer::new(now());
        let record = Record::new(json!({ "content": "" }));
        assert_eq!(scorer.score(&record).recency_score, 0.0);
    }

    #[test]
    fn test_quick_score() {
        let record = aged(
            10,
            json!({ "engagementRate": 2.0, "successRate": 0.5, "effectiveness": 0.8 }),
        );
        assert_eq!(quick_score(&record, now()), 60.0 + 20.0 + 15.0 + 8.0);
    }
}

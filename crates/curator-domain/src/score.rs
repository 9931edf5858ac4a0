//! Value score - multi-factor quality measure for a record

use serde::{Deserialize, Serialize};

/// Quality measure used for keep-vs-evict decisions
///
/// Four additive components; `total` is their sum, floored at 0 so a large
/// negative strategic bonus can never produce a negative score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueScore {
    /// Educational value (structured sub-object or content heuristics)
    pub educational_value: f64,

    /// Weighted engagement (likes, retweets, replies), capped
    pub engagement_score: f64,

    /// Recency term, 20 for a fresh record, 0 at 40 days old
    pub recency_score: f64,

    /// Caller-supplied strategic adjustment
    pub strategic_bonus: f64,

    /// Sum of the components, floored at 0
    pub total: f64,
}

impl ValueScore {
    /// Build a score from its components, computing the floored total
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::ValueScore;
    ///
    /// let score = ValueScore::from_components(10.0, 5.0, 2.5, -100.0);
    /// assert_eq!(score.total, 0.0);
    ///
    /// let score = ValueScore::from_components(10.0, 5.0, 2.5, 1.0);
    /// assert_eq!(score.total, 18.5);
    /// ```
    pub fn from_components(
        educational_value: f64,
        engagement_score: f64,
        recency_score: f64,
        strategic_bonus: f64,
    ) -> Self {
        let sum = educational_value + engagement_score + recency_score + strategic_bonus;
        Self {
            educational_value,
            engagement_score,
            recency_score,
            strategic_bonus,
            total: sum.max(0.0),
        }
    }
}

//! Tier module - the three named learning-data collections

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named learning-data tier
///
/// Each tier is an independent collection of records with its own retention
/// rule and its own primary rate metric:
/// - SuccessPatterns: posts and decisions that worked, rated by `successRate`
/// - HighEngagement: content that drew attention, rated by `engagementRate`
/// - EffectiveTopics: topics worth revisiting, rated by `effectiveness`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// Successful patterns (rated by success rate)
    SuccessPatterns,

    /// High-engagement content (rated by engagement rate, decays with age)
    HighEngagement,

    /// Effective topics (rated by effectiveness, seasonal entries live longer)
    EffectiveTopics,
}

impl Tier {
    /// All tiers in cleanup order
    pub const ALL: [Tier; 3] = [
        Tier::SuccessPatterns,
        Tier::HighEngagement,
        Tier::EffectiveTopics,
    ];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::SuccessPatterns => "success-patterns",
            Tier::HighEngagement => "high-engagement",
            Tier::EffectiveTopics => "effective-topics",
        }
    }

    /// Parse a tier from a string
    ///
    /// Accepts both the kebab-case name and the snake_case form used by
    /// configuration documents.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "success-patterns" => Some(Tier::SuccessPatterns),
            "high-engagement" => Some(Tier::HighEngagement),
            "effective-topics" => Some(Tier::EffectiveTopics),
            _ => None,
        }
    }

    /// Name of the record field holding this tier's primary rate metric
    pub fn rate_field(&self) -> &'static str {
        match self {
            Tier::SuccessPatterns => "successRate",
            Tier::HighEngagement => "engagementRate",
            Tier::EffectiveTopics => "effectiveness",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}

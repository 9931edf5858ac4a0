//! Record module - one learning-data entry
//!
//! Records are opaque structured documents produced upstream. The engine never
//! mutates them; it only reads the handful of fields that drive scoring and
//! classification, each of which has a defined default when absent or malformed.

use crate::Tier;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A single learning-data entry
///
/// Wraps the raw document so it round-trips through storage byte-for-byte
/// (modulo serialization). Field accessors follow the camelCase names the
/// upstream producers write.
///
/// # Examples
///
/// ```
/// use curator_domain::{Record, Tier};
/// use serde_json::json;
///
/// let record = Record::new(json!({ "successRate": 0.92, "isSeasonal": true }));
/// assert_eq!(record.rate(Tier::SuccessPatterns), 0.92);
/// assert!(record.is_seasonal());
/// assert_eq!(record.rate(Tier::HighEngagement), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Wrap a raw document
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the raw document
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the raw document
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Whether the document is a key/value mapping (the only well-formed shape)
    pub fn is_mapping(&self) -> bool {
        self.0.is_object()
    }

    /// Look up a top-level field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(name))
    }

    /// Read a numeric field, defaulting to 0 when absent or non-numeric
    pub fn number(&self, name: &str) -> f64 {
        self.field(name).and_then(as_number).unwrap_or(0.0)
    }

    /// Primary rate metric for the given tier
    pub fn rate(&self, tier: Tier) -> f64 {
        self.number(tier.rate_field())
    }

    /// `successRate`, default 0
    pub fn success_rate(&self) -> f64 {
        self.number("successRate")
    }

    /// `engagementRate`, default 0
    pub fn engagement_rate(&self) -> f64 {
        self.number("engagementRate")
    }

    /// `effectiveness`, default 0
    pub fn effectiveness(&self) -> f64 {
        self.number("effectiveness")
    }

    /// `strategicBonus`, default 0
    pub fn strategic_bonus(&self) -> f64 {
        self.number("strategicBonus")
    }

    /// `isSeasonal`, default false
    pub fn is_seasonal(&self) -> bool {
        self.field("isSeasonal")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Free-form `content` text, if present
    pub fn content(&self) -> Option<&str> {
        self.field("content").and_then(Value::as_str)
    }

    /// Creation instant, defaulting to the Unix epoch
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.field("timestamp")
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Age in fractional days relative to `now`
    ///
    /// Records stamped in the future have age 0.
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        let secs = (now - self.timestamp()).num_seconds().max(0);
        secs as f64 / SECONDS_PER_DAY
    }

    /// Serialize with object keys sorted at every depth
    ///
    /// Two documents that differ only in field insertion order produce
    /// identical bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonicalize(&self.0).to_string().into_bytes()
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Read a JSON number as `f64`
///
/// Non-finite values cannot appear in JSON, so any number is accepted.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Parse a record timestamp
///
/// Accepts RFC 3339 strings, naive `YYYY-mm-ddTHH:MM:SS[.f]` strings (read as
/// UTC), plain dates, and integer epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

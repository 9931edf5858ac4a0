//! Configuration for retention and archival
//!
//! Mirrors the retention document section by section. Every field has a
//! built-in default, so a partial document only overrides what it names.

use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Retention configuration document
///
/// # Examples
///
/// ```
/// use curator_janitor::RetentionConfig;
///
/// // Default configuration (balanced)
/// let config = RetentionConfig::default();
/// assert_eq!(config.success_patterns.max_entries, 100);
///
/// // Aggressive cleanup
/// let config = RetentionConfig::aggressive();
/// assert_eq!(config.success_patterns.max_entries, 50);
///
/// // Partial documents keep defaults for everything they omit
/// let config = RetentionConfig::from_toml("[high_engagement]\nmax_entries = 10\n").unwrap();
/// assert_eq!(config.high_engagement.max_entries, 10);
/// assert_eq!(config.high_engagement.min_engagement_rate, 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Rules for the success-patterns tier
    pub success_patterns: SuccessPatternsConfig,

    /// Rules for the high-engagement tier
    pub high_engagement: HighEngagementConfig,

    /// Rules for the effective-topics tier
    pub effective_topics: EffectiveTopicsConfig,

    /// Integrity and corrupted-data handling
    pub quality_filters: QualityFilters,

    /// File and dataset size budgets
    pub performance_constraints: PerformanceConstraints,

    /// Value scoring settings, including the cross-tier quality floor
    pub value_assessment: ValueAssessment,
}

/// Success-patterns tier rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessPatternsConfig {
    /// Maximum records kept after a run
    /// Default: 100
    pub max_entries: usize,

    /// Minimum `successRate` for a recent record to be kept
    /// Default: 0.7
    pub min_success_rate: f64,

    /// Age (days) within which a record may be kept on its rate alone
    /// Default: 30
    pub retention_days: u32,

    /// Minimum `successRate` for an old record to be archived rather than deleted
    /// Default: 0.5
    pub archive_threshold: f64,
}

/// High-engagement tier rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighEngagementConfig {
    /// Maximum records kept after a run
    /// Default: 50
    pub max_entries: usize,

    /// Minimum `engagementRate` (percent) for a recent record to be kept
    /// Default: 3.0
    pub min_engagement_rate: f64,

    /// Age (days) within which a record may be kept on its rate alone
    /// Default: 60
    pub retention_days: u32,

    /// Age (days) after which engagement is discounted
    /// Default: 90
    pub performance_decay_days: u32,
}

/// Effective-topics tier rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectiveTopicsConfig {
    /// Maximum records kept after a run
    /// Default: 75
    pub max_entries: usize,

    /// Minimum `effectiveness` for a recent record to be kept
    /// Default: 0.6
    pub effectiveness_threshold: f64,

    /// Age (days) within which a non-seasonal record may be kept on its rate alone
    /// Default: 45
    pub trend_data_retention_days: u32,

    /// Retention (years) for records flagged `isSeasonal`
    /// Default: 1
    pub seasonal_data_years: u32,
}

/// Integrity and corrupted-data handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityFilters {
    /// Minimum data quality score (reported, not enforced per record)
    /// Default: 0.6
    pub min_data_quality_score: f64,

    /// Remove malformed records during the corrupted-data sweep
    /// Default: true
    pub remove_corrupted_data: bool,

    /// Quarantine tier files that fail to parse
    /// Default: true
    pub validate_yaml_syntax: bool,

    /// Also treat bad timestamps and invalid rate fields as corruption
    /// Default: true
    pub check_data_consistency: bool,
}

/// File and dataset size budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConstraints {
    /// Size (MB) above which a single tier file is flagged
    /// Default: 5
    pub max_file_size_mb: f64,

    /// Total size (MB) across tier files; exceeding it triggers emergency mode
    /// Default: 50
    pub max_total_learning_data_mb: f64,
}

/// Value scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueAssessment {
    /// Relative weight of educational value
    pub educational_value_weight: f64,

    /// Relative weight of engagement
    pub engagement_score_weight: f64,

    /// Relative weight of recency
    pub recency_weight: f64,

    /// Relative weight of strategic relevance
    pub strategic_relevance_weight: f64,

    /// Cross-tier quality floor: records scoring at least this are always kept
    /// Default: 40
    pub min_total_value_score: f64,
}

impl Default for SuccessPatternsConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            min_success_rate: 0.7,
            retention_days: 30,
            archive_threshold: 0.5,
        }
    }
}

impl Default for HighEngagementConfig {
    fn default() -> Self {
        Self {
            max_entries: 50,
            min_engagement_rate: 3.0,
            retention_days: 60,
            performance_decay_days: 90,
        }
    }
}

impl Default for EffectiveTopicsConfig {
    fn default() -> Self {
        Self {
            max_entries: 75,
            effectiveness_threshold: 0.6,
            trend_data_retention_days: 45,
            seasonal_data_years: 1,
        }
    }
}

impl Default for QualityFilters {
    fn default() -> Self {
        Self {
            min_data_quality_score: 0.6,
            remove_corrupted_data: true,
            validate_yaml_syntax: true,
            check_data_consistency: true,
        }
    }
}

impl Default for PerformanceConstraints {
    fn default() -> Self {
        Self {
            max_file_size_mb: 5.0,
            max_total_learning_data_mb: 50.0,
        }
    }
}

impl Default for ValueAssessment {
    fn default() -> Self {
        Self {
            educational_value_weight: 0.4,
            engagement_score_weight: 0.3,
            recency_weight: 0.2,
            strategic_relevance_weight: 0.1,
            min_total_value_score: 40.0,
        }
    }
}

impl RetentionConfig {
    /// Aggressive preset: smaller tiers, higher bars, tighter budgets
    ///
    /// Suitable when storage is at a premium.
    pub fn aggressive() -> Self {
        Self {
            success_patterns: SuccessPatternsConfig {
                max_entries: 50,
                min_success_rate: 0.8,
                retention_days: 14,
                archive_threshold: 0.6,
            },
            high_engagement: HighEngagementConfig {
                max_entries: 25,
                min_engagement_rate: 4.0,
                retention_days: 30,
                performance_decay_days: 45,
            },
            effective_topics: EffectiveTopicsConfig {
                max_entries: 40,
                effectiveness_threshold: 0.7,
                trend_data_retention_days: 21,
                seasonal_data_years: 1,
            },
            quality_filters: QualityFilters::default(),
            performance_constraints: PerformanceConstraints {
                max_file_size_mb: 2.0,
                max_total_learning_data_mb: 20.0,
            },
            value_assessment: ValueAssessment {
                min_total_value_score: 50.0,
                ..ValueAssessment::default()
            },
        }
    }

    /// Lenient preset: larger tiers, lower bars, looser budgets
    ///
    /// Suitable for development or when history is cheap to keep.
    pub fn lenient() -> Self {
        Self {
            success_patterns: SuccessPatternsConfig {
                max_entries: 250,
                min_success_rate: 0.6,
                retention_days: 60,
                archive_threshold: 0.4,
            },
            high_engagement: HighEngagementConfig {
                max_entries: 120,
                min_engagement_rate: 2.0,
                retention_days: 120,
                performance_decay_days: 180,
            },
            effective_topics: EffectiveTopicsConfig {
                max_entries: 150,
                effectiveness_threshold: 0.5,
                trend_data_retention_days: 90,
                seasonal_data_years: 2,
            },
            quality_filters: QualityFilters::default(),
            performance_constraints: PerformanceConstraints {
                max_file_size_mb: 10.0,
                max_total_learning_data_mb: 200.0,
            },
            value_assessment: ValueAssessment {
                min_total_value_score: 30.0,
                ..ValueAssessment::default()
            },
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, JanitorError> {
        toml::from_str(toml_str)
            .map_err(|e| JanitorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml_str: &str) -> Result<Self, JanitorError> {
        serde_yaml::from_str(yaml_str)
            .map_err(|e| JanitorError::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Load and validate configuration from a file
    ///
    /// `.yaml` / `.yml` files are read as YAML, anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JanitorError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            JanitorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml(&contents)?
        } else {
            Self::from_toml(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, JanitorError> {
        toml::to_string_pretty(self)
            .map_err(|e| JanitorError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), JanitorError> {
        let caps = [
            ("success_patterns.max_entries", self.success_patterns.max_entries),
            ("high_engagement.max_entries", self.high_engagement.max_entries),
            ("effective_topics.max_entries", self.effective_topics.max_entries),
        ];
        for (name, value) in caps {
            if value == 0 {
                return Err(JanitorError::Config(format!("{} must be greater than 0", name)));
            }
        }

        let thresholds = [
            ("success_patterns.min_success_rate", self.success_patterns.min_success_rate),
            ("success_patterns.archive_threshold", self.success_patterns.archive_threshold),
            ("high_engagement.min_engagement_rate", self.high_engagement.min_engagement_rate),
            ("effective_topics.effectiveness_threshold", self.effective_topics.effectiveness_threshold),
            ("value_assessment.min_total_value_score", self.value_assessment.min_total_value_score),
            ("performance_constraints.max_file_size_mb", self.performance_constraints.max_file_size_mb),
            (
                "performance_constraints.max_total_learning_data_mb",
                self.performance_constraints.max_total_learning_data_mb,
            ),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(JanitorError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.success_patterns.archive_threshold > self.success_patterns.min_success_rate {
            return Err(JanitorError::Config(
                "success_patterns.archive_threshold cannot exceed min_success_rate".to_string(),
            ));
        }

        Ok(())
    }

    /// Per-file size limit in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        (self.performance_constraints.max_file_size_mb * BYTES_PER_MB) as u64
    }

    /// Total dataset budget in bytes
    pub fn total_budget_bytes(&self) -> u64 {
        (self.performance_constraints.max_total_learning_data_mb * BYTES_PER_MB) as u64
    }
}

/// Load a configuration file, falling back to built-in defaults
///
/// A missing, unparsable, or invalid document is never an error for the
/// caller: the problem is logged and [`RetentionConfig::default`] is used.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> RetentionConfig {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No retention config at {}, using defaults", path.display());
        return RetentionConfig::default();
    }

    match RetentionConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; falling back to default retention rules", e);
            RetentionConfig::default()
        }
    }
}

/// Cached source of retention rules
///
/// The document is read at most once per store; later calls return the
/// cached configuration.
///
/// ```
/// use curator_janitor::RuleStore;
///
/// let store = RuleStore::new("/nonexistent/retention.toml");
/// assert_eq!(store.config().success_patterns.max_entries, 100);
/// ```
#[derive(Debug, Default)]
pub struct RuleStore {
    path: Option<PathBuf>,
    cached: OnceLock<RetentionConfig>,
}

impl RuleStore {
    /// Rule store backed by a configuration file
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
            cached: OnceLock::new(),
        }
    }

    /// Rule store holding an already-resolved configuration
    pub fn from_config(config: RetentionConfig) -> Self {
        let cached = OnceLock::new();
        let _ = cached.set(config);
        Self { path: None, cached }
    }

    /// Path of the backing document, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The resolved configuration, loading it on first access
    pub fn config(&self) -> &RetentionConfig {
        self.cached.get_or_init(|| match &self.path {
            Some(path) => load_or_default(path),
            None => RetentionConfig::default(),
        })
    }
}

//! Monitoring configuration
//!
//! All drift thresholds and storage paths are injected at startup rather
//! than baked into the monitors. Defaults match the values the production
//! deployment runs with: PSI 0.2 for individual features, a stricter 0.1
//! for the aggregate score (the score distribution is the earliest warning
//! signal), KS p-value 0.05 for both.

use crate::error::{Result, ScorewatchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the monitoring core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Number of quantile bins used by the PSI computation
    #[serde(default = "default_psi_bins")]
    pub psi_bins: usize,
    /// PSI threshold above which a feature counts as drifted
    #[serde(default = "default_feature_psi")]
    pub feature_psi_threshold: f64,
    /// PSI threshold for the score distribution
    #[serde(default = "default_score_psi")]
    pub score_psi_threshold: f64,
    /// KS p-value below which a distribution shift counts as drift
    #[serde(default = "default_ks_pvalue")]
    pub ks_pvalue_threshold: f64,
    /// Minimum non-missing sample size on either side of a comparison
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// How many UTC calendar days of prediction logs to load (today inclusive)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Directory holding the daily prediction log segments
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Directory holding the reference snapshot Parquet files
    #[serde(default = "default_reference_dir")]
    pub reference_dir: PathBuf,
    /// Path of the append-only drift event log
    #[serde(default = "default_drift_log_path")]
    pub drift_log_path: PathBuf,
    /// Path of the externally produced labeled-sample CSV
    #[serde(default = "default_labels_path")]
    pub labels_path: PathBuf,
    /// Path of the decision-threshold artifact written by the training pipeline
    #[serde(default = "default_threshold_path")]
    pub threshold_path: PathBuf,
    /// Program the orchestrator launches to retrain the model
    #[serde(default = "default_trainer_program")]
    pub trainer_program: String,
    /// Arguments passed to the trainer program
    #[serde(default)]
    pub trainer_args: Vec<String>,
}

fn default_psi_bins() -> usize {
    10
}
fn default_feature_psi() -> f64 {
    0.2
}
fn default_score_psi() -> f64 {
    0.1
}
fn default_ks_pvalue() -> f64 {
    0.05
}
fn default_min_samples() -> usize {
    10
}
fn default_lookback_days() -> u32 {
    2
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("monitoring/logs")
}
fn default_reference_dir() -> PathBuf {
    PathBuf::from("monitoring/reference")
}
fn default_drift_log_path() -> PathBuf {
    PathBuf::from("monitoring/drift_logs/drift_log.jsonl")
}
fn default_labels_path() -> PathBuf {
    PathBuf::from("monitoring/logs/predictions_with_labels.csv")
}
fn default_threshold_path() -> PathBuf {
    PathBuf::from("models/decision_threshold.json")
}
fn default_trainer_program() -> String {
    "train_pipeline".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            psi_bins: default_psi_bins(),
            feature_psi_threshold: default_feature_psi(),
            score_psi_threshold: default_score_psi(),
            ks_pvalue_threshold: default_ks_pvalue(),
            min_samples: default_min_samples(),
            lookback_days: default_lookback_days(),
            log_dir: default_log_dir(),
            reference_dir: default_reference_dir(),
            drift_log_path: default_drift_log_path(),
            labels_path: default_labels_path(),
            threshold_path: default_threshold_path(),
            trainer_program: default_trainer_program(),
            trainer_args: Vec::new(),
        }
    }
}

impl MonitorConfig {
    /// Create a config with default thresholds and paths
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file; missing fields fall back to defaults
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScorewatchError::ConfigError(format!(
                "cannot read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ScorewatchError::ConfigError(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the PSI threshold for feature drift
    pub fn with_feature_psi_threshold(mut self, threshold: f64) -> Self {
        self.feature_psi_threshold = threshold.max(0.0);
        self
    }

    /// Set the PSI threshold for score drift
    pub fn with_score_psi_threshold(mut self, threshold: f64) -> Self {
        self.score_psi_threshold = threshold.max(0.0);
        self
    }

    /// Set the KS p-value threshold
    pub fn with_ks_pvalue_threshold(mut self, threshold: f64) -> Self {
        self.ks_pvalue_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum sample floor
    pub fn with_min_samples(mut self, n: usize) -> Self {
        self.min_samples = n.max(2);
        self
    }

    /// Root all storage paths under a single base directory
    pub fn with_base_dir<P: AsRef<Path>>(mut self, base: P) -> Self {
        let base = base.as_ref();
        self.log_dir = base.join("monitoring/logs");
        self.reference_dir = base.join("monitoring/reference");
        self.drift_log_path = base.join("monitoring/drift_logs/drift_log.jsonl");
        self.labels_path = base.join("monitoring/logs/predictions_with_labels.csv");
        self.threshold_path = base.join("models/decision_threshold.json");
        self
    }

    /// Set the trainer invocation
    pub fn with_trainer(mut self, program: &str, args: &[&str]) -> Self {
        self.trainer_program = program.to_string();
        self.trainer_args = args.iter().map(|s| s.to_string()).collect();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.psi_bins < 2 {
            return Err(ScorewatchError::ConfigError(
                "psi_bins must be at least 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ks_pvalue_threshold) {
            return Err(ScorewatchError::ConfigError(
                "ks_pvalue_threshold must lie in [0, 1]".to_string(),
            ));
        }
        if self.lookback_days == 0 {
            return Err(ScorewatchError::ConfigError(
                "lookback_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = MonitorConfig::default();
        assert_eq!(config.feature_psi_threshold, 0.2);
        assert_eq!(config.score_psi_threshold, 0.1);
        assert_eq!(config.ks_pvalue_threshold, 0.05);
        assert_eq!(config.min_samples, 10);
        assert_eq!(config.psi_bins, 10);
    }

    #[test]
    fn test_builder_methods() {
        let config = MonitorConfig::new()
            .with_feature_psi_threshold(0.3)
            .with_min_samples(20);
        assert_eq!(config.feature_psi_threshold, 0.3);
        assert_eq!(config.min_samples, 20);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"feature_psi_threshold": 0.25}"#).unwrap();
        assert_eq!(config.feature_psi_threshold, 0.25);
        assert_eq!(config.score_psi_threshold, 0.1);
        assert_eq!(config.min_samples, 10);
    }

    #[test]
    fn test_base_dir_roots_paths() {
        let config = MonitorConfig::new().with_base_dir("/tmp/deploy");
        assert!(config.log_dir.starts_with("/tmp/deploy"));
        assert!(config.drift_log_path.starts_with("/tmp/deploy"));
    }
}

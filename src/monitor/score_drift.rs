//! Score drift monitor
//!
//! Same two-day window as the feature check but over the scalar model
//! score. The PSI threshold is deliberately stricter (0.1 vs 0.2): the
//! aggregate score is the most sensitive early-warning signal, since every
//! upstream feature shift funnels into it.

use crate::config::MonitorConfig;
use crate::drift::DriftStats;
use crate::error::Result;
use crate::logs::{Component, DriftEventLog, DriftVerdict, PredictionLog};
use crate::reference::ReferenceStore;
use serde_json::json;
use tracing::{info, warn};

pub struct ScoreDriftMonitor {
    predictions: PredictionLog,
    reference: ReferenceStore,
    events: DriftEventLog,
    config: MonitorConfig,
}

impl ScoreDriftMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            predictions: PredictionLog::new(&config.log_dir),
            reference: ReferenceStore::new(&config.reference_dir),
            events: DriftEventLog::new(&config.drift_log_path),
            config: config.clone(),
        }
    }

    /// Run the check; records a verdict unless a soft-fail path was taken
    pub fn check(&self) -> Result<bool> {
        let Some(ref_scores) = self.reference.load_scores()? else {
            info!("no reference score snapshot, skipping score drift check");
            return Ok(false);
        };

        let current_scores: Vec<f64> = self
            .predictions
            .read_days(self.config.lookback_days)?
            .iter()
            .map(|r| r.score)
            .filter(|s| s.is_finite())
            .collect();
        if current_scores.len() < self.config.min_samples
            || ref_scores.len() < self.config.min_samples
        {
            info!(
                n_current = current_scores.len(),
                "not enough scores for drift analysis"
            );
            return Ok(false);
        }

        let stats = DriftStats::compute(&ref_scores, &current_scores, self.config.psi_bins)?;
        let drift_detected = stats.psi > self.config.score_psi_threshold
            || stats.ks_pvalue < self.config.ks_pvalue_threshold;

        self.events.append(&DriftVerdict::new(
            Component::ScoreDrift,
            drift_detected,
            json!({
                "psi": stats.psi,
                "ks_statistic": stats.ks_statistic,
                "ks_pvalue": stats.ks_pvalue,
                "n_ref": ref_scores.len(),
                "n_current": current_scores.len(),
            }),
        ))?;

        if drift_detected {
            warn!(
                psi = stats.psi,
                ks_pvalue = stats.ks_pvalue,
                "score drift detected"
            );
        } else {
            info!(
                psi = stats.psi,
                ks_pvalue = stats.ks_pvalue,
                "no score drift detected"
            );
        }
        Ok(drift_detected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use std::collections::BTreeMap;
    use std::fs::File;
    use tempfile::TempDir;

    fn write_reference_scores(config: &MonitorConfig, scores: &[f64]) {
        std::fs::create_dir_all(&config.reference_dir).unwrap();
        let mut df = df!("score" => scores).unwrap();
        let file = File::create(config.reference_dir.join("reference_scores.parquet")).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();
    }

    fn log_scores(config: &MonitorConfig, scores: &[f64]) {
        let log = PredictionLog::new(&config.log_dir);
        for &score in scores {
            log.append(BTreeMap::new(), score, "gbm_v1").unwrap();
        }
    }

    #[test]
    fn test_soft_fail_without_reference() {
        let tmp = TempDir::new().unwrap();
        let config = MonitorConfig::new().with_base_dir(tmp.path());
        log_scores(&config, &[0.5; 20]);

        let monitor = ScoreDriftMonitor::new(&config);
        assert!(!monitor.check().unwrap());
        assert!(DriftEventLog::new(&config.drift_log_path)
            .read_all()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_soft_fail_with_too_few_scores() {
        let tmp = TempDir::new().unwrap();
        let config = MonitorConfig::new().with_base_dir(tmp.path());
        let ref_scores: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        write_reference_scores(&config, &ref_scores);
        log_scores(&config, &[0.5; 9]);

        let monitor = ScoreDriftMonitor::new(&config);
        assert!(!monitor.check().unwrap());
        assert!(DriftEventLog::new(&config.drift_log_path)
            .read_all()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_shifted_scores_flag_drift() {
        let tmp = TempDir::new().unwrap();
        let config = MonitorConfig::new().with_base_dir(tmp.path());
        let ref_scores: Vec<f64> = (0..200).map(|i| 0.1 + 0.3 * (i as f64 / 200.0)).collect();
        write_reference_scores(&config, &ref_scores);
        let live: Vec<f64> = (0..50).map(|i| 0.85 + 0.1 * (i as f64 / 50.0)).collect();
        log_scores(&config, &live);

        let monitor = ScoreDriftMonitor::new(&config);
        assert!(monitor.check().unwrap());

        let events = DriftEventLog::new(&config.drift_log_path).read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].component, Component::ScoreDrift);
        assert!(events[0].drift_detected);
        assert_eq!(events[0].details["n_current"], json!(50));
    }
}

//! Model quality monitor
//!
//! Scores the model against realized outcomes once the label-acquisition
//! collaborator has delivered `(score, true_label)` pairs. Descriptive
//! only: the report lands in the drift event log for humans and external
//! alerting, it never triggers retraining.

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::logs::{Component, DriftEventLog, DriftVerdict};
use crate::metrics::{binarize, f1_score, roc_auc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};

/// Quality of the deployed model on a labeled sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub roc_auc: f64,
    pub f1_score: f64,
    pub n_samples: usize,
}

pub struct ModelQualityMonitor {
    labels_path: PathBuf,
    /// Production decision threshold, injected at startup
    decision_threshold: f64,
    events: DriftEventLog,
    min_samples: usize,
}

impl ModelQualityMonitor {
    pub fn new(config: &MonitorConfig, decision_threshold: f64) -> Self {
        Self {
            labels_path: config.labels_path.clone(),
            decision_threshold,
            events: DriftEventLog::new(&config.drift_log_path),
            min_samples: config.min_samples,
        }
    }

    /// Evaluate the labeled sample; `None` when no usable sample exists
    pub fn check(&self) -> Result<Option<QualityReport>> {
        if !self.labels_path.exists() {
            info!("no labeled sample available, skipping quality check");
            return Ok(None);
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .try_into_reader_with_file_path(Some(self.labels_path.clone()))?
            .finish()?;

        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        if !names.iter().any(|n| n == "score") || !names.iter().any(|n| n == "true_label") {
            warn!(
                file = %self.labels_path.display(),
                "labeled sample lacks 'score'/'true_label' columns"
            );
            return Ok(None);
        }

        // Keep only rows where both fields are present
        let score_col = df.column("score")?.cast(&DataType::Float64)?;
        let label_col = df.column("true_label")?.cast(&DataType::Float64)?;
        let mut scores = Vec::new();
        let mut labels = Vec::new();
        for (score, label) in score_col.f64()?.into_iter().zip(label_col.f64()?) {
            if let (Some(s), Some(l)) = (score, label) {
                if s.is_finite() && l.is_finite() {
                    scores.push(s);
                    labels.push(if l >= 0.5 { 1u8 } else { 0u8 });
                }
            }
        }

        if scores.len() < self.min_samples {
            info!(
                n_samples = scores.len(),
                "not enough labeled rows for quality check"
            );
            return Ok(None);
        }

        let auc = roc_auc(&labels, &scores)?;
        // Binarize at the production operating point, not a nominal 0.5
        let predictions = binarize(&scores, self.decision_threshold);
        let f1 = f1_score(&labels, &predictions);

        let report = QualityReport {
            roc_auc: auc,
            f1_score: f1,
            n_samples: scores.len(),
        };

        self.events.append(&DriftVerdict::new(
            Component::ModelQuality,
            false,
            json!({
                "roc_auc": report.roc_auc,
                "f1_score": report.f1_score,
                "n_samples": report.n_samples,
            }),
        ))?;

        info!(
            roc_auc = report.roc_auc,
            f1 = report.f1_score,
            n_samples = report.n_samples,
            "model quality evaluated"
        );
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn write_labels(config: &MonitorConfig, scores: &[f64], labels: &[u32]) {
        std::fs::create_dir_all(config.labels_path.parent().unwrap()).unwrap();
        let mut df = df!(
            "score" => scores,
            "true_label" => labels
        )
        .unwrap();
        let mut file = File::create(&config.labels_path).unwrap();
        CsvWriter::new(&mut file).finish(&mut df).unwrap();
    }

    #[test]
    fn test_missing_file_returns_none() {
        let tmp = TempDir::new().unwrap();
        let config = MonitorConfig::new().with_base_dir(tmp.path());
        let monitor = ModelQualityMonitor::new(&config, 0.5);
        assert!(monitor.check().unwrap().is_none());
    }

    #[test]
    fn test_missing_columns_return_none() {
        let tmp = TempDir::new().unwrap();
        let config = MonitorConfig::new().with_base_dir(tmp.path());
        std::fs::create_dir_all(config.labels_path.parent().unwrap()).unwrap();
        let mut df = df!("probability" => &[0.1, 0.9]).unwrap();
        let mut file = File::create(&config.labels_path).unwrap();
        CsvWriter::new(&mut file).finish(&mut df).unwrap();

        let monitor = ModelQualityMonitor::new(&config, 0.5);
        assert!(monitor.check().unwrap().is_none());
        assert!(DriftEventLog::new(&config.drift_log_path)
            .read_all()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_quality_report_on_separable_sample() {
        let tmp = TempDir::new().unwrap();
        let config = MonitorConfig::new().with_base_dir(tmp.path());
        let scores = [0.1, 0.15, 0.2, 0.25, 0.3, 0.7, 0.75, 0.8, 0.85, 0.9];
        let labels = [0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        write_labels(&config, &scores, &labels);

        let monitor = ModelQualityMonitor::new(&config, 0.5);
        let report = monitor.check().unwrap().unwrap();
        assert!((report.roc_auc - 1.0).abs() < 1e-12);
        assert!((report.f1_score - 1.0).abs() < 1e-12);
        assert_eq!(report.n_samples, 10);

        let events = DriftEventLog::new(&config.drift_log_path).read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].component, Component::ModelQuality);
        assert!(!events[0].drift_detected);
    }
}

//! Integration tests for the retraining decision and trainer invocation

#![cfg(unix)]

use polars::prelude::*;
use scorewatch::config::MonitorConfig;
use scorewatch::logs::PredictionLog;
use scorewatch::orchestrator::RetrainOrchestrator;
use std::collections::BTreeMap;
use std::fs::File;
use tempfile::TempDir;

fn uniform_grid(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect()
}

fn write_reference_scores(config: &MonitorConfig, scores: &[f64]) {
    std::fs::create_dir_all(&config.reference_dir).unwrap();
    let mut df = df!("score" => scores).unwrap();
    let file = File::create(config.reference_dir.join("reference_scores.parquet")).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();
}

/// Trainer that proves it ran by touching a marker file
fn marker_config(tmp: &TempDir, exit_code: i32) -> (MonitorConfig, std::path::PathBuf) {
    let marker = tmp.path().join("trainer_ran");
    let script = format!("touch {}; exit {}", marker.display(), exit_code);
    let config = MonitorConfig::new()
        .with_base_dir(tmp.path())
        .with_trainer("sh", &["-c", &script]);
    (config, marker)
}

#[test]
fn test_trainer_not_invoked_without_drift() {
    let tmp = TempDir::new().unwrap();
    let (config, marker) = marker_config(&tmp, 0);

    // No reference snapshots at all: both monitors soft-fail to "no drift"
    let report = RetrainOrchestrator::from_config(&config).run().unwrap();
    assert!(!report.feature_drift);
    assert!(!report.score_drift);
    assert!(report.outcome.is_none());
    assert!(!marker.exists());
}

#[test]
fn test_trainer_invoked_on_score_drift() {
    let tmp = TempDir::new().unwrap();
    let (config, marker) = marker_config(&tmp, 0);

    write_reference_scores(&config, &uniform_grid(500));
    let log = PredictionLog::new(&config.log_dir);
    for &s in uniform_grid(100).iter() {
        // Scores squeezed into a narrow band far from the reference shape
        log.append(BTreeMap::new(), 0.95 + s * 0.02, "gbm_v1").unwrap();
    }

    let report = RetrainOrchestrator::from_config(&config).run().unwrap();
    assert!(report.score_drift);
    let outcome = report.outcome.unwrap();
    assert!(outcome.success);
    assert!(marker.exists());
}

#[test]
fn test_failed_training_is_reported_not_raised() {
    let tmp = TempDir::new().unwrap();
    let (config, marker) = marker_config(&tmp, 7);

    write_reference_scores(&config, &uniform_grid(500));
    let log = PredictionLog::new(&config.log_dir);
    for &s in uniform_grid(100).iter() {
        log.append(BTreeMap::new(), 0.95 + s * 0.02, "gbm_v1").unwrap();
    }

    // Nonzero trainer exit must surface in the outcome, not as an Err
    let report = RetrainOrchestrator::from_config(&config).run().unwrap();
    let outcome = report.outcome.unwrap();
    assert!(!outcome.success);
    assert!(marker.exists());
}

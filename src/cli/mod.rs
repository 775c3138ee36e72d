//! Scorewatch CLI
//!
//! Thin command wrappers over the monitoring core: run individual checks,
//! run the full orchestrator pass, append a prediction record by hand, and
//! inspect the drift-verdict history.

use clap::{Parser, Subcommand};
use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::MonitorConfig;
use crate::logs::{DriftEventLog, PredictionLog};
use crate::model_store::ThresholdStore;
use crate::monitor::{FeatureDriftMonitor, ModelQualityMonitor, ScoreDriftMonitor};
use crate::orchestrator::RetrainOrchestrator;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn step_ok(msg: &str) {
    println!("  {} {}", "✓".truecolor(100, 210, 120), msg);
}

fn step_warn(msg: &str) {
    println!("  {} {}", "!".truecolor(240, 180, 80), msg.yellow());
}

fn step_info(msg: &str) {
    println!("  {} {}", "·".truecolor(140, 140, 140), msg);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "scorewatch")]
#[command(about = "Drift monitoring and retraining control loop for a fraud-risk scorer")]
pub struct Cli {
    /// Path to a JSON monitoring config; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the live feature distributions against the reference snapshot
    CheckFeatures,
    /// Check the live score distribution against the reference snapshot
    CheckScores,
    /// Evaluate model quality on the externally labeled sample
    CheckQuality,
    /// Run both drift checks and retrain if either fires
    Run,
    /// Append one prediction record (serving-endpoint stand-in)
    Log {
        /// Model score in [0, 1]
        #[arg(long)]
        score: f64,
        /// Model version tag recorded with the prediction
        #[arg(long, default_value = "gbm_v1")]
        model_version: String,
        /// Feature values as name=value pairs, comma separated
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
    },
    /// Print recent drift verdicts from the event log
    History {
        /// Show only the last N verdicts
        #[arg(long, default_value_t = 20)]
        last: usize,
    },
}

/// Load configuration from `--config` or fall back to defaults
pub fn load_config(path: Option<&PathBuf>) -> anyhow::Result<MonitorConfig> {
    match path {
        Some(p) => Ok(MonitorConfig::from_path(p)?),
        None => Ok(MonitorConfig::default()),
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_check_features(config: &MonitorConfig) -> anyhow::Result<()> {
    let drifted = FeatureDriftMonitor::new(config).check()?;
    if drifted {
        step_warn("feature drift detected");
    } else {
        step_ok("no feature drift detected");
    }
    Ok(())
}

pub fn cmd_check_scores(config: &MonitorConfig) -> anyhow::Result<()> {
    let drifted = ScoreDriftMonitor::new(config).check()?;
    if drifted {
        step_warn("score drift detected");
    } else {
        step_ok("no score drift detected");
    }
    Ok(())
}

pub fn cmd_check_quality(config: &MonitorConfig) -> anyhow::Result<()> {
    let threshold = ThresholdStore::load(&config.threshold_path)?;
    match ModelQualityMonitor::new(config, threshold).check()? {
        Some(report) => {
            step_ok(&format!(
                "ROC-AUC {:.4}, F1 {:.4} on {} labeled samples (threshold {:.4})",
                report.roc_auc, report.f1_score, report.n_samples, threshold
            ));
        }
        None => step_info("no usable labeled sample, quality check skipped"),
    }
    Ok(())
}

pub fn cmd_run(config: &MonitorConfig) -> anyhow::Result<()> {
    let report = RetrainOrchestrator::from_config(config).run()?;
    step_info(&format!(
        "feature drift: {}, score drift: {}",
        report.feature_drift, report.score_drift
    ));
    match report.outcome {
        None => step_ok("retraining not needed"),
        Some(outcome) if outcome.success => step_ok("model retrained"),
        Some(outcome) => {
            step_warn("training pipeline failed");
            if !outcome.stderr.is_empty() {
                eprintln!("{}", outcome.stderr.trim_end());
            }
        }
    }
    Ok(())
}

pub fn cmd_log(
    config: &MonitorConfig,
    score: f64,
    model_version: &str,
    features: &[String],
) -> anyhow::Result<()> {
    let features = parse_features(features)?;
    PredictionLog::new(&config.log_dir).append(features, score, model_version)?;
    step_ok(&format!("logged prediction with score {:.4}", score));
    Ok(())
}

pub fn cmd_history(config: &MonitorConfig, last: usize) -> anyhow::Result<()> {
    let verdicts = DriftEventLog::new(&config.drift_log_path).read_all()?;
    if verdicts.is_empty() {
        step_info("drift event log is empty");
        return Ok(());
    }
    let start = verdicts.len().saturating_sub(last);
    for verdict in &verdicts[start..] {
        let marker = if verdict.drift_detected {
            "drift".red().to_string()
        } else {
            "ok".green().to_string()
        };
        println!(
            "  {}  {:<14} {:>5}  {}",
            verdict.timestamp.format("%Y-%m-%d %H:%M:%S"),
            verdict.component.to_string(),
            marker,
            verdict.details
        );
    }
    Ok(())
}

fn parse_features(pairs: &[String]) -> anyhow::Result<BTreeMap<String, f64>> {
    let mut features = BTreeMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected name=value, got '{}'", pair))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("feature '{}' has non-numeric value '{}'", name, value))?;
        features.insert(name.trim().to_string(), value);
    }
    Ok(features)
}

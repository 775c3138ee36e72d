//! Drift event log
//!
//! The shared append-only ledger every monitor writes its verdict to. One
//! JSON line per monitoring run; this file is the system's drift history.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Which monitor produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    FeatureDrift,
    ScoreDrift,
    ModelQuality,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::FeatureDrift => write!(f, "feature_drift"),
            Component::ScoreDrift => write!(f, "score_drift"),
            Component::ModelQuality => write!(f, "model_quality"),
        }
    }
}

/// One monitoring run's outcome, immutable once appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftVerdict {
    pub timestamp: DateTime<Utc>,
    pub component: Component,
    pub drift_detected: bool,
    /// Per-feature or per-run statistics, shape depends on the component
    pub details: Value,
}

impl DriftVerdict {
    /// Build a verdict stamped with the current UTC time
    pub fn new(component: Component, drift_detected: bool, details: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            component,
            drift_detected,
            details,
        }
    }
}

/// Append-only ledger of drift verdicts
#[derive(Debug, Clone)]
pub struct DriftEventLog {
    path: PathBuf,
}

impl DriftEventLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one verdict as a single JSON line
    pub fn append(&self, verdict: &DriftVerdict) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Serialize before opening so a failed verdict never lands partially
        let line = serde_json::to_string(verdict)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Read the full verdict history, skipping malformed lines
    pub fn read_all(&self) -> Result<Vec<DriftVerdict>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut verdicts = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DriftVerdict>(&line) {
                Ok(verdict) => verdicts.push(verdict),
                Err(e) => {
                    warn!(
                        file = %self.path.display(),
                        line = line_num + 1,
                        error = %e,
                        "skipping malformed drift verdict"
                    );
                }
            }
        }
        Ok(verdicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_append_and_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let log = DriftEventLog::new(tmp.path().join("drift_logs/drift_log.jsonl"));

        let verdict = DriftVerdict::new(
            Component::ScoreDrift,
            true,
            json!({"psi": 0.178, "ks_pvalue": 0.003, "n_ref": 1000, "n_current": 240}),
        );
        log.append(&verdict).unwrap();

        let history = log.read_all().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].component, Component::ScoreDrift);
        assert!(history[0].drift_detected);
        assert_eq!(history[0].details["psi"], json!(0.178));
        assert_eq!(history[0].timestamp, verdict.timestamp);
    }

    #[test]
    fn test_component_wire_names() {
        let verdict = DriftVerdict::new(Component::FeatureDrift, false, json!({}));
        let line = serde_json::to_string(&verdict).unwrap();
        assert!(line.contains(r#""component":"feature_drift""#));

        let verdict = DriftVerdict::new(Component::ModelQuality, false, json!({}));
        let line = serde_json::to_string(&verdict).unwrap();
        assert!(line.contains(r#""component":"model_quality""#));
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let log = DriftEventLog::new(tmp.path().join("absent.jsonl"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_verdict_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("drift_log.jsonl");
        let log = DriftEventLog::new(&path);
        log.append(&DriftVerdict::new(Component::FeatureDrift, false, json!({})))
            .unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "broken line").unwrap();

        assert_eq!(log.read_all().unwrap().len(), 1);
    }
}

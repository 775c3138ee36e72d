//! Per-day prediction log
//!
//! Every scored input becomes one JSON line in the segment for the current
//! UTC day (`predictions_YYYY-MM-DD.jsonl`). Segments are append-only and
//! never rewritten; readers tolerate malformed lines by skipping them.

use crate::error::{Result, ScorewatchError};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// One scored input, as logged by the serving path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub timestamp: DateTime<Utc>,
    pub model_version: String,
    pub score: f64,
    pub features: BTreeMap<String, f64>,
}

/// Append-only daily prediction log
#[derive(Debug, Clone)]
pub struct PredictionLog {
    dir: PathBuf,
}

impl PredictionLog {
    /// Create a log rooted at the given directory (created lazily on append)
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the segment for a given UTC day
    pub fn segment_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("predictions_{}.jsonl", date.format("%Y-%m-%d")))
    }

    /// Append one record to the current UTC day's segment
    pub fn append(
        &self,
        features: BTreeMap<String, f64>,
        score: f64,
        model_version: &str,
    ) -> Result<()> {
        let now = Utc::now();
        let record = PredictionRecord {
            timestamp: now,
            model_version: model_version.to_string(),
            score,
            features,
        };
        self.append_record(&record)
    }

    /// Append a fully formed record (used by backfills and tests)
    pub fn append_record(&self, record: &PredictionRecord) -> Result<()> {
        if !(0.0..=1.0).contains(&record.score) {
            return Err(ScorewatchError::ValidationError(format!(
                "score must lie in [0, 1], got {}",
                record.score
            )));
        }
        for (name, value) in &record.features {
            if !value.is_finite() {
                return Err(ScorewatchError::SerializationError(format!(
                    "feature '{}' has non-finite value {}",
                    name, value
                )));
            }
        }

        fs::create_dir_all(&self.dir)?;
        // Serialize the whole line before touching the file so a failure
        // never leaves a partial record behind.
        let line = serde_json::to_string(record)?;
        let path = self.segment_path(record.timestamp.date_naive());
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Load all records from the last `days_back` UTC days, today inclusive
    ///
    /// Missing segments are skipped silently; malformed lines are skipped
    /// with a warning naming the file and line number.
    pub fn read_days(&self, days_back: u32) -> Result<Vec<PredictionRecord>> {
        let today = Utc::now().date_naive();
        let mut records = Vec::new();
        for offset in 0..days_back {
            let date = today - Duration::days(offset as i64);
            let path = self.segment_path(date);
            if !path.exists() {
                continue;
            }
            self.read_segment(&path, &mut records)?;
        }
        Ok(records)
    }

    fn read_segment(&self, path: &Path, out: &mut Vec<PredictionRecord>) -> Result<()> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PredictionRecord>(&line) {
                Ok(record) => out.push(record),
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        line = line_num + 1,
                        error = %e,
                        "skipping malformed prediction record"
                    );
                }
            }
        }
        Ok(())
    }
}

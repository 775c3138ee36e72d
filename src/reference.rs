//! Reference snapshot store
//!
//! The training pipeline writes two Parquet snapshots per training run: the
//! feature matrix of the training population and its score distribution.
//! They are read-only here and form the "expected" side of every drift
//! comparison.

use crate::error::{Result, ScorewatchError};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const FEATURES_FILE: &str = "reference_features.parquet";
pub const SCORES_FILE: &str = "reference_scores.parquet";

/// Read-only access to the training-time snapshots
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    dir: PathBuf,
}

impl ReferenceStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn features_path(&self) -> PathBuf {
        self.dir.join(FEATURES_FILE)
    }

    pub fn scores_path(&self) -> PathBuf {
        self.dir.join(SCORES_FILE)
    }

    /// Load the reference feature matrix; `None` when no snapshot exists yet
    pub fn load_features(&self) -> Result<Option<DataFrame>> {
        let path = self.features_path();
        if !path.exists() {
            return Ok(None);
        }
        let df = ParquetReader::new(File::open(&path)?).finish()?;
        Ok(Some(df))
    }

    /// Load the reference score sample; `None` when no snapshot exists yet
    pub fn load_scores(&self) -> Result<Option<Vec<f64>>> {
        let path = self.scores_path();
        if !path.exists() {
            return Ok(None);
        }
        let df = ParquetReader::new(File::open(&path)?).finish()?;
        let series = df.column("score").map_err(|_| {
            ScorewatchError::DataError(format!(
                "reference scores {} missing 'score' column",
                path.display()
            ))
        })?;
        let scores: Vec<f64> = series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .flatten()
            .collect();
        Ok(Some(scores))
    }
}

/// Extract a feature column as f64 values with nulls and NaNs dropped
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| ScorewatchError::DataError(format!("column '{}' not found", name)))?;
    let values: Vec<f64> = series
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_snapshots_are_none() {
        let tmp = TempDir::new().unwrap();
        let store = ReferenceStore::new(tmp.path());
        assert!(store.load_features().unwrap().is_none());
        assert!(store.load_scores().unwrap().is_none());
    }

    #[test]
    fn test_load_scores_drops_nulls() {
        let tmp = TempDir::new().unwrap();
        let store = ReferenceStore::new(tmp.path());

        let mut df = df!(
            "score" => &[Some(0.1), None, Some(0.8), Some(0.4)]
        )
        .unwrap();
        let file = File::create(store.scores_path()).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();

        let scores = store.load_scores().unwrap().unwrap();
        assert_eq!(scores, vec![0.1, 0.8, 0.4]);
    }

    #[test]
    fn test_column_values_skips_missing() {
        let df = df!(
            "a" => &[Some(1.0), None, Some(3.0)],
            "b" => &[Some(2.0), Some(4.0), None]
        )
        .unwrap();
        assert_eq!(column_values(&df, "a").unwrap(), vec![1.0, 3.0]);
        assert!(column_values(&df, "missing").is_err());
    }
}

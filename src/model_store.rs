//! Decision-threshold artifact
//!
//! The training pipeline selects the operating threshold (F1-optimized on a
//! validation split) and writes it next to the model. It is loaded once at
//! process startup and injected wherever a score has to be binarized; a new
//! threshold only takes effect after a restart following retraining.

use crate::error::{Result, ScorewatchError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThresholdArtifact {
    threshold: f64,
}

/// Loads the production decision threshold
pub struct ThresholdStore;

impl ThresholdStore {
    /// Read the threshold from its JSON artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<f64> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScorewatchError::ConfigError(format!(
                "cannot read threshold artifact {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let artifact: ThresholdArtifact = serde_json::from_str(&contents)?;
        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(ScorewatchError::ValidationError(format!(
                "decision threshold must lie in (0, 1), got {}",
                artifact.threshold
            )));
        }
        Ok(artifact.threshold)
    }
}

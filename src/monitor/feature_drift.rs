//! Feature drift monitor
//!
//! Compares every feature column shared between the reference snapshot and
//! the last two UTC days of logged predictions. A feature drifts when its
//! PSI exceeds the feature threshold or its KS p-value falls below the
//! significance threshold; any drifted feature drifts the whole check.

use crate::config::MonitorConfig;
use crate::drift::DriftStats;
use crate::error::Result;
use crate::logs::{Component, DriftEventLog, DriftVerdict, PredictionLog};
use crate::reference::{column_values, ReferenceStore};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use tracing::{info, warn};

pub struct FeatureDriftMonitor {
    predictions: PredictionLog,
    reference: ReferenceStore,
    events: DriftEventLog,
    config: MonitorConfig,
}

impl FeatureDriftMonitor {
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
        let Some(ref_df) = self.reference.load_features()? else {
            info!("no reference feature snapshot, skipping feature drift check");
            return Ok(false);
        };

        let records = self.predictions.read_days(self.config.lookback_days)?;
        if records.is_empty() {
            info!("no recent predictions, skipping feature drift check");
            return Ok(false);
        }

        // Intersect reference columns with the feature names seen live
        let live_names: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.features.keys().map(|k| k.as_str()))
            .collect();
        let common: Vec<String> = ref_df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| live_names.contains(name.as_str()))
            .collect();
        if common.is_empty() {
            warn!("no common features between reference and live data");
            return Ok(false);
        }

        let mut drift_detected = false;
        let mut details = Map::new();

        for name in &common {
            let ref_vals = column_values(&ref_df, name)?;
            let live_vals: Vec<f64> = records
                .iter()
                .filter_map(|r| r.features.get(name))
                .copied()
                .filter(|v| v.is_finite())
                .collect();

            // Statistical-power floor: too few values on either side
            if ref_vals.len() < self.config.min_samples
                || live_vals.len() < self.config.min_samples
            {
                continue;
            }

            let stats = DriftStats::compute(&ref_vals, &live_vals, self.config.psi_bins)?;
            details.insert(
                name.clone(),
                json!({"psi": stats.psi, "ks_pvalue": stats.ks_pvalue}),
            );

            if stats.psi > self.config.feature_psi_threshold
                || stats.ks_pvalue < self.config.ks_pvalue_threshold
            {
                warn!(
                    feature = %name,
                    psi = stats.psi,
                    ks_pvalue = stats.ks_pvalue,
                    "feature drift detected"
                );
                drift_detected = true;
            }
        }

        self.events.append(&DriftVerdict::new(
            Component::FeatureDrift,
            drift_detected,
            Value::Object(details),
        ))?;

        if !drift_detected {
            info!("no feature drift detected");
        }
        Ok(drift_detected)
    }
}

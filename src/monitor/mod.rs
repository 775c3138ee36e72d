//! Production monitors
//!
//! Three independent checks over the live prediction stream: feature-level
//! distribution drift, score-distribution drift, and model quality against
//! delayed ground-truth labels. Each one appends its verdict to the shared
//! drift event log.

mod feature_drift;
mod quality;
mod score_drift;

pub use feature_drift::FeatureDriftMonitor;
pub use quality::{ModelQualityMonitor, QualityReport};
pub use score_drift::ScoreDriftMonitor;

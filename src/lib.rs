//! Scorewatch - drift monitoring for a wallet fraud-risk scorer
//!
//! Watches whether the live population of input features and output scores
//! has drifted away from the distribution the model was trained on, tracks
//! model quality against delayed ground truth, and triggers retraining when
//! drift is detected.
//!
//! # Modules
//!
//! ## Monitoring core
//! - [`drift`] - Two-sample drift statistics (PSI, Kolmogorov-Smirnov)
//! - [`monitor`] - Feature-drift, score-drift, and model-quality monitors
//! - [`orchestrator`] - Retraining decision and training-pipeline launch
//!
//! ## Storage
//! - [`logs`] - Append-only prediction log and drift event log
//! - [`reference`] - Training-time reference snapshots (read-only)
//! - [`model_store`] - Decision-threshold artifact
//!
//! ## Support
//! - [`config`] - Injected thresholds, sample floors, and paths
//! - [`metrics`] - Binary classification metrics (ROC AUC, F1)
//! - [`cli`] - Command-line interface

pub mod error;

pub mod config;
pub mod drift;
pub mod logs;
pub mod metrics;
pub mod model_store;
pub mod monitor;
pub mod orchestrator;
pub mod reference;

pub mod cli;

pub use error::{Result, ScorewatchError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::MonitorConfig;
    pub use crate::drift::{ks_test, psi, DriftStats};
    pub use crate::error::{Result, ScorewatchError};
    pub use crate::logs::{Component, DriftEventLog, DriftVerdict, PredictionLog, PredictionRecord};
    pub use crate::model_store::ThresholdStore;
    pub use crate::monitor::{FeatureDriftMonitor, ModelQualityMonitor, QualityReport, ScoreDriftMonitor};
    pub use crate::orchestrator::{ProcessTrainer, RetrainOrchestrator, TrainOutcome, Trainer};
    pub use crate::reference::ReferenceStore;
}

//! Retraining orchestrator
//!
//! Runs both drift checks and launches the external training pipeline when
//! either one fires. The orchestrator holds no state between invocations;
//! an external scheduler decides how often it runs.

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::monitor::{FeatureDriftMonitor, ScoreDriftMonitor};
use std::process::Command;
use tracing::{error, info};

/// Outcome of one training-pipeline invocation
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Capability to retrain the model
///
/// The orchestrator only decides *whether* to retrain; how the pipeline is
/// invoked (child process, RPC, job queue) lives behind this trait.
pub trait Trainer {
    fn retrain(&self) -> Result<TrainOutcome>;
}

/// Trainer that runs the training pipeline as a blocking child process
pub struct ProcessTrainer {
    program: String,
    args: Vec<String>,
}

impl ProcessTrainer {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(&config.trainer_program, &config.trainer_args)
    }
}

impl Trainer for ProcessTrainer {
    fn retrain(&self) -> Result<TrainOutcome> {
        info!(program = %self.program, "launching training pipeline");
        let output = Command::new(&self.program).args(&self.args).output()?;
        Ok(TrainOutcome {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Result of one orchestrator pass
#[derive(Debug)]
pub struct RetrainReport {
    pub feature_drift: bool,
    pub score_drift: bool,
    /// `None` when no retraining was needed
    pub outcome: Option<TrainOutcome>,
}

pub struct RetrainOrchestrator<T: Trainer> {
    feature_monitor: FeatureDriftMonitor,
    score_monitor: ScoreDriftMonitor,
    trainer: T,
}

impl RetrainOrchestrator<ProcessTrainer> {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            FeatureDriftMonitor::new(config),
            ScoreDriftMonitor::new(config),
            ProcessTrainer::from_config(config),
        )
    }
}

impl<T: Trainer> RetrainOrchestrator<T> {
    pub fn new(
        feature_monitor: FeatureDriftMonitor,
        score_monitor: ScoreDriftMonitor,
        trainer: T,
    ) -> Self {
        Self {
            feature_monitor,
            score_monitor,
            trainer,
        }
    }

    /// Run both drift checks and retrain when either fires
    ///
    /// Both checks always run: each verdict is independently worth
    /// recording, so there is no short-circuit. A failed training run is
    /// reported, not escalated; the scheduler decides what happens next.
    pub fn run(&self) -> Result<RetrainReport> {
        let feature_drift = self.feature_monitor.check()?;
        let score_drift = self.score_monitor.check()?;

        if !feature_drift && !score_drift {
            info!("no drift detected, retraining not needed");
            return Ok(RetrainReport {
                feature_drift,
                score_drift,
                outcome: None,
            });
        }

        info!(feature_drift, score_drift, "drift detected, retraining model");
        let outcome = self.trainer.retrain()?;
        if outcome.success {
            info!("model retrained successfully");
        } else {
            error!(stderr = %outcome.stderr, "training pipeline failed");
        }

        Ok(RetrainReport {
            feature_drift,
            score_drift,
            outcome: Some(outcome),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct CountingTrainer {
        calls: RefCell<usize>,
        succeed: bool,
    }

    impl CountingTrainer {
        fn new(succeed: bool) -> Self {
            Self {
                calls: RefCell::new(0),
                succeed,
            }
        }
    }

    impl Trainer for CountingTrainer {
        fn retrain(&self) -> Result<TrainOutcome> {
            *self.calls.borrow_mut() += 1;
            Ok(TrainOutcome {
                success: self.succeed,
                stdout: String::new(),
                stderr: if self.succeed {
                    String::new()
                } else {
                    "boom".to_string()
                },
            })
        }
    }

    #[test]
    fn test_no_drift_means_no_training() {
        // Empty deployment: both monitors soft-fail to "no drift"
        let tmp = TempDir::new().unwrap();
        let config = MonitorConfig::new().with_base_dir(tmp.path());
        let trainer = CountingTrainer::new(true);
        let orchestrator = RetrainOrchestrator::new(
            FeatureDriftMonitor::new(&config),
            ScoreDriftMonitor::new(&config),
            trainer,
        );

        let report = orchestrator.run().unwrap();
        assert!(!report.feature_drift);
        assert!(!report.score_drift);
        assert!(report.outcome.is_none());
        assert_eq!(*orchestrator.trainer.calls.borrow(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_process_trainer_reports_nonzero_exit() {
        let trainer = ProcessTrainer::new("sh", &["-c".to_string(), "echo oops >&2; exit 3".to_string()]);
        let outcome = trainer.retrain().unwrap();
        assert!(!outcome.success);
        assert!(outcome.stderr.contains("oops"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_trainer_captures_stdout() {
        let trainer = ProcessTrainer::new("sh", &["-c".to_string(), "echo trained".to_string()]);
        let outcome = trainer.retrain().unwrap();
        assert!(outcome.success);
        assert!(outcome.stdout.contains("trained"));
    }
}

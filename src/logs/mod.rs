//! Append-only monitoring logs
//!
//! Two newline-delimited JSON ledgers: the per-day prediction log fed by
//! the serving path, and the drift event log shared by all monitors.

mod events;
mod predictions;

pub use events::{Component, DriftEventLog, DriftVerdict};
pub use predictions::{PredictionLog, PredictionRecord};

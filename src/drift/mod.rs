//! Two-sample drift statistics
//!
//! The comparator is the shared statistical core of the feature-drift and
//! score-drift monitors: population stability index over quantile bins and
//! the two-sample Kolmogorov-Smirnov test.

mod comparator;

pub use comparator::{ks_test, psi, DriftStats};

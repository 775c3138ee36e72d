//! Distribution comparison statistics
//!
//! Both functions are pure and deterministic: identical inputs always
//! produce identical statistics, and bin edges are recomputed from the
//! expected sample on every call rather than cached.

use crate::error::{Result, ScorewatchError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Guard against zero-range samples during min-max normalization
const RANGE_EPSILON: f64 = 1e-8;

/// Drift statistics for a single feature or for the score distribution
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DriftStats {
    /// Population stability index, >= 0
    pub psi: f64,
    /// Two-sample KS statistic, in [0, 1]
    pub ks_statistic: f64,
    /// Asymptotic two-sided KS p-value, in [0, 1]
    pub ks_pvalue: f64,
}

impl DriftStats {
    /// Compute both statistics for one expected/actual pair
    pub fn compute(expected: &[f64], actual: &[f64], bins: usize) -> Result<Self> {
        let psi = psi(expected, actual, bins)?;
        let (ks_statistic, ks_pvalue) = ks_test(expected, actual)?;
        Ok(Self {
            psi,
            ks_statistic,
            ks_pvalue,
        })
    }
}

/// Population Stability Index between two samples
///
/// Both samples are min-max normalized independently, bin edges are taken
/// as quantiles of the normalized expected sample at evenly spaced
/// percentiles, and every bin count gets +1 Laplace smoothing so empty bins
/// never produce log(0).
pub fn psi(expected: &[f64], actual: &[f64], bins: usize) -> Result<f64> {
    if expected.is_empty() || actual.is_empty() {
        return Err(ScorewatchError::ValidationError(
            "Empty samples provided to PSI".to_string(),
        ));
    }
    if bins < 2 {
        return Err(ScorewatchError::ValidationError(format!(
            "PSI needs at least 2 bins, got {}",
            bins
        )));
    }

    let expected_norm = min_max_normalize(expected);
    let actual_norm = min_max_normalize(actual);

    let edges = quantile_edges(&expected_norm, bins);
    let expected_counts = histogram(&expected_norm, &edges);
    let actual_counts = histogram(&actual_norm, &edges);

    // Laplace smoothing, then convert to probability vectors
    let expected_total: f64 = expected_counts.iter().map(|&c| (c + 1) as f64).sum();
    let actual_total: f64 = actual_counts.iter().map(|&c| (c + 1) as f64).sum();

    let psi = expected_counts
        .iter()
        .zip(actual_counts.iter())
        .map(|(&e, &a)| {
            let p_e = (e + 1) as f64 / expected_total;
            let p_a = (a + 1) as f64 / actual_total;
            (p_e - p_a) * (p_e / p_a).ln()
        })
        .sum();

    Ok(psi)
}

/// Two-sample Kolmogorov-Smirnov test
///
/// Returns the KS statistic (maximum absolute ECDF difference over the
/// pooled support) and its asymptotic two-sided p-value.
pub fn ks_test(expected: &[f64], actual: &[f64]) -> Result<(f64, f64)> {
    if expected.is_empty() || actual.is_empty() {
        return Err(ScorewatchError::ValidationError(
            "Empty samples provided to KS test".to_string(),
        ));
    }

    let mut expected_sorted = expected.to_vec();
    let mut actual_sorted = actual.to_vec();
    expected_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    actual_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n1 = expected_sorted.len();
    let n2 = actual_sorted.len();

    // Sweep the merged samples, tracking both ECDFs
    let mut i = 0;
    let mut j = 0;
    let mut statistic = 0.0f64;
    while i < n1 && j < n2 {
        let x = expected_sorted[i].min(actual_sorted[j]);
        while i < n1 && expected_sorted[i] <= x {
            i += 1;
        }
        while j < n2 && actual_sorted[j] <= x {
            j += 1;
        }
        let f1 = i as f64 / n1 as f64;
        let f2 = j as f64 / n2 as f64;
        statistic = statistic.max((f1 - f2).abs());
    }

    let en = (n1 as f64 * n2 as f64) / (n1 + n2) as f64;
    let p_value = kolmogorov_survival((en.sqrt() + 0.12 + 0.11 / en.sqrt()) * statistic);

    Ok((statistic, p_value))
}

/// Survival function of the Kolmogorov distribution
///
/// Alternating series 2 * sum_{k>=1} (-1)^{k-1} exp(-2 k^2 lambda^2),
/// truncated once terms stop mattering.
fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let term = (-2.0 * (k as f64).powi(2) * lambda * lambda).exp();
        sum += sign * term;
        if term < 1e-10 {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

fn min_max_normalize(data: &[f64]) -> Vec<f64> {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min + RANGE_EPSILON;
    data.iter().map(|&x| (x - min) / range).collect()
}

/// Bin edges at evenly spaced percentiles of the sample (linear interpolation)
fn quantile_edges(data: &[f64], bins: usize) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    (0..=bins)
        .map(|i| {
            let rank = (i as f64 / bins as f64) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                let frac = rank - lo as f64;
                sorted[lo] + frac * (sorted[hi] - sorted[lo])
            }
        })
        .collect()
}

/// Histogram counts over half-open bins; the last bin includes its right edge.
/// Values outside the edge range are dropped, matching quantile-edge binning
/// where out-of-range mass only occurs on the actual side.
fn histogram(data: &[f64], edges: &[f64]) -> Vec<usize> {
    let n_bins = edges.len() - 1;
    let mut counts = vec![0usize; n_bins];
    for &value in data {
        if value < edges[0] || value > edges[n_bins] {
            continue;
        }
        let mut bin = n_bins - 1;
        for i in 0..n_bins {
            if value < edges[i + 1] {
                bin = i;
                break;
            }
        }
        counts[bin] += 1;
    }
    counts
}

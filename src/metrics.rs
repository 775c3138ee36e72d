//! Binary classification metrics
//!
//! Discrimination (rank-based ROC AUC) and threshold-based quality (F1),
//! used by the model-quality monitor against delayed ground-truth labels.

use crate::error::{Result, ScorewatchError};

/// Area under the ROC curve via the rank-sum (Mann-Whitney) formulation,
/// with midranks for tied scores
pub fn roc_auc(labels: &[u8], scores: &[f64]) -> Result<f64> {
    if labels.len() != scores.len() {
        return Err(ScorewatchError::ValidationError(format!(
            "label/score length mismatch: {} vs {}",
            labels.len(),
            scores.len()
        )));
    }
    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ScorewatchError::ComputationError(
            "ROC AUC undefined with a single class".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Midrank assignment over tied score groups
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = midrank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = labels
        .iter()
        .zip(ranks.iter())
        .filter(|(&l, _)| l == 1)
        .map(|(_, &r)| r)
        .sum();

    let auc = (rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos * n_neg) as f64;
    Ok(auc)
}

/// Confusion counts (tp, fp, tn, fn) for binary predictions
pub fn confusion_counts(labels: &[u8], predictions: &[u8]) -> (usize, usize, usize, usize) {
    let mut tp = 0;
    let mut fp = 0;
    let mut tn = 0;
    let mut fn_ = 0;
    for (&l, &p) in labels.iter().zip(predictions.iter()) {
        match (l == 1, p == 1) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (false, false) => tn += 1,
            (true, false) => fn_ += 1,
        }
    }
    (tp, fp, tn, fn_)
}

/// F1 score for binary predictions; 0.0 when precision + recall is zero
pub fn f1_score(labels: &[u8], predictions: &[u8]) -> f64 {
    let (tp, fp, _, fn_) = confusion_counts(labels, predictions);
    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };
    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        0.0
    };
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Binarize scores at a decision threshold (score >= threshold -> 1)
pub fn binarize(scores: &[f64], threshold: f64) -> Vec<u8> {
    scores
        .iter()
        .map(|&s| if s >= threshold { 1 } else { 0 })
        .collect()
}

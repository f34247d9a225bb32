//! ROC and precision-recall curve primitives
//!
//! All functions take binary ground truth as a 0/1-valued float vector
//! (an indicator-matrix column slots in directly) and real-valued scores.
//! Scores are consumed as relative rankings only, so uncalibrated decision
//! scores work the same as probabilities.
//!
//! Single-class inputs never error here: rates whose denominator is zero
//! come out as NaN, and the AUC helpers return NaN outright. Callers decide
//! whether that is acceptable.

use crate::error::{EvalError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::cmp::Ordering;

fn check_lengths(labels: ArrayView1<f64>, scores: ArrayView1<f64>) -> Result<()> {
    if labels.len() != scores.len() {
        return Err(EvalError::ShapeError(format!(
            "labels length {} != scores length {}",
            labels.len(),
            scores.len()
        )));
    }
    if labels.is_empty() {
        return Err(EvalError::DataError("empty input".to_string()));
    }
    Ok(())
}

/// One sweep point: cumulative counts after lowering the threshold to `score`.
struct SweepPoint {
    threshold: f64,
    tp: usize,
    fp: usize,
}

/// Walk distinct scores in descending order, accumulating tied scores into a
/// single point. Returns the points plus the total positive/negative counts.
fn threshold_sweep(
    labels: ArrayView1<f64>,
    scores: ArrayView1<f64>,
) -> (Vec<SweepPoint>, usize, usize) {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    // Stable descending sort under the IEEE total order, so NaN scores form
    // their own tie group instead of breaking the grouping below.
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let total_pos = labels.iter().filter(|&&l| l > 0.5).count();
    let total_neg = labels.len() - total_pos;

    let mut points = Vec::new();
    let mut tp = 0usize;
    let mut fp = 0usize;

    let mut i = 0;
    while i < indices.len() {
        let current = scores[indices[i]];
        while i < indices.len() && scores[indices[i]].total_cmp(&current) == Ordering::Equal {
            if labels[indices[i]] > 0.5 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(SweepPoint {
            threshold: current,
            tp,
            fp,
        });
    }

    (points, total_pos, total_neg)
}

/// ROC curve as three parallel vectors: false-positive rates, true-positive
/// rates, thresholds. Thresholds descend from infinity (nothing predicted
/// positive) and the rates rise towards (1, 1).
pub fn roc_curve(
    labels: ArrayView1<f64>,
    scores: ArrayView1<f64>,
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    check_lengths(labels, scores)?;
    let (points, pos, neg) = threshold_sweep(labels, scores);
    let p = pos as f64;
    let n = neg as f64;

    let mut fprs = vec![0.0 / n];
    let mut tprs = vec![0.0 / p];
    let mut thresholds = vec![f64::INFINITY];
    for pt in &points {
        fprs.push(pt.fp as f64 / n);
        tprs.push(pt.tp as f64 / p);
        thresholds.push(pt.threshold);
    }

    Ok((fprs, tprs, thresholds))
}

/// Precision-recall curve as three parallel vectors: precisions, recalls,
/// thresholds. Ordered by ascending threshold so recall decreases along the
/// curve; the final synthetic point is (precision 1, recall 0) at threshold
/// infinity.
pub fn precision_recall_curve(
    labels: ArrayView1<f64>,
    scores: ArrayView1<f64>,
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    check_lengths(labels, scores)?;
    let (points, pos, _) = threshold_sweep(labels, scores);
    let p = pos as f64;

    let mut precisions = Vec::with_capacity(points.len() + 1);
    let mut recalls = Vec::with_capacity(points.len() + 1);
    let mut thresholds = Vec::with_capacity(points.len() + 1);
    for pt in points.iter().rev() {
        precisions.push(pt.tp as f64 / (pt.tp + pt.fp) as f64);
        recalls.push(pt.tp as f64 / p);
        thresholds.push(pt.threshold);
    }
    precisions.push(1.0);
    recalls.push(0.0 / p);
    thresholds.push(f64::INFINITY);

    Ok((precisions, recalls, thresholds))
}

/// Area under the ROC curve via the trapezoidal rule.
///
/// NaN when the input contains only one class: without both positives and
/// negatives there is no true/false-positive tradeoff.
pub fn binary_roc_auc(labels: ArrayView1<f64>, scores: ArrayView1<f64>) -> Result<f64> {
    check_lengths(labels, scores)?;
    let (points, pos, neg) = threshold_sweep(labels, scores);
    if pos == 0 || neg == 0 {
        return Ok(f64::NAN);
    }
    let p = pos as f64;
    let n = neg as f64;

    let mut auc = 0.0;
    let mut prev_fpr = 0.0;
    let mut prev_tpr = 0.0;
    for pt in &points {
        let fpr = pt.fp as f64 / n;
        let tpr = pt.tp as f64 / p;
        auc += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        prev_fpr = fpr;
        prev_tpr = tpr;
    }
    Ok(auc)
}

/// Average precision: the step-interpolated area under the precision-recall
/// curve, `sum((R_i - R_{i-1}) * P_i)` over descending thresholds.
///
/// Defined (as 1.0) when every sample is positive; defined as 0.0 when no
/// positive samples exist, keeping the score finite for degenerate inputs.
pub fn average_precision(labels: ArrayView1<f64>, scores: ArrayView1<f64>) -> Result<f64> {
    check_lengths(labels, scores)?;
    let (points, pos, _) = threshold_sweep(labels, scores);
    if pos == 0 {
        return Ok(0.0);
    }
    let p = pos as f64;

    let mut ap = 0.0;
    let mut prev_recall = 0.0;
    for pt in &points {
        let precision = pt.tp as f64 / (pt.tp + pt.fp) as f64;
        let recall = pt.tp as f64 / p;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
    }
    Ok(ap)
}

fn check_matrix_shapes(y_bin: ArrayView2<f64>, scores: ArrayView2<f64>) -> Result<()> {
    if y_bin.dim() != scores.dim() {
        return Err(EvalError::ShapeError(format!(
            "indicator matrix {:?} and score matrix {:?} differ in shape",
            y_bin.dim(),
            scores.dim()
        )));
    }
    if y_bin.ncols() == 0 {
        return Err(EvalError::DataError("indicator matrix has no columns".to_string()));
    }
    Ok(())
}

/// Micro-averaged multilabel ROC-AUC: flatten the indicator and score
/// matrices into single vectors and score them as one binary problem.
pub fn roc_auc_micro(y_bin: ArrayView2<f64>, scores: ArrayView2<f64>) -> Result<f64> {
    check_matrix_shapes(y_bin, scores)?;
    let flat_labels = Array1::from_iter(y_bin.iter().copied());
    let flat_scores = Array1::from_iter(scores.iter().copied());
    binary_roc_auc(flat_labels.view(), flat_scores.view())
}

/// Macro-averaged multilabel ROC-AUC: unweighted mean of per-column AUCs.
pub fn roc_auc_macro(y_bin: ArrayView2<f64>, scores: ArrayView2<f64>) -> Result<f64> {
    check_matrix_shapes(y_bin, scores)?;
    let mut sum = 0.0;
    for j in 0..y_bin.ncols() {
        sum += binary_roc_auc(y_bin.column(j), scores.column(j))?;
    }
    Ok(sum / y_bin.ncols() as f64)
}

/// Macro-averaged multilabel average precision: unweighted mean of
/// per-column AP scores.
pub fn average_precision_macro(y_bin: ArrayView2<f64>, scores: ArrayView2<f64>) -> Result<f64> {
    check_matrix_shapes(y_bin, scores)?;
    let mut sum = 0.0;
    for j in 0..y_bin.ncols() {
        sum += average_precision(y_bin.column(j), scores.column(j))?;
    }
    Ok(sum / y_bin.ncols() as f64)
}

//! Curve extraction for binary label/score pairs
//!
//! Wraps the curve primitives into serializable point-sequence bundles for
//! embedding in metric reports.

use crate::error::Result;
use crate::stats::curves::{precision_recall_curve, roc_curve};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// ROC curve points as three parallel sequences of equal length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocCurveData {
    pub fprs: Vec<f64>,
    pub tprs: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// Precision-recall curve points as three parallel sequences of equal length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrCurveData {
    pub precisions: Vec<f64>,
    pub recalls: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// Extract ROC and precision-recall curves for binary ground truth (0/1
/// indicator values) and positive-class scores. Pure function of its inputs;
/// runs regardless of class balance.
pub fn extract_curves(
    labels: ArrayView1<f64>,
    pos_scores: ArrayView1<f64>,
) -> Result<(RocCurveData, PrCurveData)> {
    let (fprs, tprs, roc_thresholds) = roc_curve(labels, pos_scores)?;
    let (precisions, recalls, pr_thresholds) = precision_recall_curve(labels, pos_scores)?;

    Ok((
        RocCurveData {
            fprs,
            tprs,
            thresholds: roc_thresholds,
        },
        PrCurveData {
            precisions,
            recalls,
            thresholds: pr_thresholds,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_curve_sequences_equal_length() {
        let labels = array![0.0, 1.0, 0.0, 1.0];
        let scores = array![0.1, 0.8, 0.3, 0.4];
        let (roc, pr) = extract_curves(labels.view(), scores.view()).unwrap();
        assert_eq!(roc.fprs.len(), roc.tprs.len());
        assert_eq!(roc.tprs.len(), roc.thresholds.len());
        assert_eq!(pr.precisions.len(), pr.recalls.len());
        assert_eq!(pr.recalls.len(), pr.thresholds.len());
    }

    #[test]
    fn test_single_class_input_does_not_error() {
        let labels = array![1.0, 1.0, 1.0];
        let scores = array![0.2, 0.5, 0.9];
        let result = extract_curves(labels.view(), scores.view());
        assert!(result.is_ok());
    }
}

//! Binary-classification metric bundle

use crate::error::{EvalError, Result};
use crate::metrics::curves::{extract_curves, PrCurveData, RocCurveData};
use crate::metrics::indicator::{class_indicator_matrix, inferred_classes};
use crate::stats;
use crate::stats::curves::{average_precision_macro, roc_auc_macro};
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The closed set of binary-mode metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryMetric {
    Accuracy,
    CohenKappa,
    F1,
    Mcc,
    RocAuc,
    AveragePrecision,
}

impl BinaryMetric {
    pub const ALL: [BinaryMetric; 6] = [
        BinaryMetric::Accuracy,
        BinaryMetric::CohenKappa,
        BinaryMetric::F1,
        BinaryMetric::Mcc,
        BinaryMetric::RocAuc,
        BinaryMetric::AveragePrecision,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BinaryMetric::Accuracy => "accuracy",
            BinaryMetric::CohenKappa => "cohen_kappa",
            BinaryMetric::F1 => "f1",
            BinaryMetric::Mcc => "mcc",
            BinaryMetric::RocAuc => "roc_auc",
            BinaryMetric::AveragePrecision => "average_precision",
        }
    }
}

impl std::fmt::Display for BinaryMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Metric bundle for one binary evaluation.
///
/// Every [`BinaryMetric`] key is always present in `scores`; NaN marks a
/// metric whose mathematical precondition failed. Curves are present only
/// when requested and computable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryReport {
    pub scores: HashMap<BinaryMetric, f64>,
    pub roc_curve: Option<RocCurveData>,
    pub pr_curve: Option<PrCurveData>,
}

impl BinaryReport {
    pub fn score(&self, metric: BinaryMetric) -> Option<f64> {
        self.scores.get(&metric).copied()
    }
}

/// Compute the full binary metric bundle.
///
/// `probs` is S x 2 with column 1 = P(class 1); decision scores are accepted
/// as-is since only the ranking matters. Accuracy, kappa, F1, and MCC come
/// from the labels alone and are always defined. Any NaN in `probs` leaves
/// ROC-AUC and average precision as NaN and suppresses curves even when
/// requested. With valid probabilities, average precision is computed via a
/// two-column indicator over {0, 1} whether or not both classes appear;
/// ROC-AUC additionally requires both classes in `y_true`.
pub fn compute_binary_metrics(
    y_true: ArrayView1<usize>,
    y_pred: ArrayView1<usize>,
    probs: ArrayView2<f64>,
    include_curves: bool,
) -> Result<BinaryReport> {
    if probs.ncols() != 2 {
        return Err(EvalError::ShapeError(format!(
            "binary probability matrix must have 2 columns, got {}",
            probs.ncols()
        )));
    }
    if probs.nrows() != y_true.len() {
        return Err(EvalError::ShapeError(format!(
            "{} labels but {} probability rows",
            y_true.len(),
            probs.nrows()
        )));
    }
    if y_true.iter().chain(y_pred.iter()).any(|&l| l > 1) {
        return Err(EvalError::DataError(
            "binary labels must lie in {0, 1}".to_string(),
        ));
    }

    let mut scores = HashMap::from([
        (BinaryMetric::Accuracy, stats::accuracy(y_true, y_pred)?),
        (BinaryMetric::CohenKappa, stats::cohen_kappa(y_true, y_pred)?),
        (BinaryMetric::F1, stats::f1_binary(y_true, y_pred)?),
        (BinaryMetric::Mcc, stats::matthews_corrcoef(y_true, y_pred)?),
        (BinaryMetric::RocAuc, f64::NAN),
        (BinaryMetric::AveragePrecision, f64::NAN),
    ]);

    let mut roc_curve = None;
    let mut pr_curve = None;

    let any_probs_nan = probs.iter().any(|v| v.is_nan());
    if any_probs_nan {
        tracing::debug!("NaN probabilities; AUC, AP, and curves left undefined");
    } else {
        let y_true_bin = class_indicator_matrix(y_true, Some(&[0, 1]));

        // AP stays defined even when only one class is present.
        scores.insert(
            BinaryMetric::AveragePrecision,
            average_precision_macro(y_true_bin.view(), probs)?,
        );

        let all_labels_same = inferred_classes(y_true).len() == 1;
        if !all_labels_same {
            scores.insert(
                BinaryMetric::RocAuc,
                roc_auc_macro(y_true_bin.view(), probs)?,
            );
        }

        if include_curves {
            let (roc, pr) = extract_curves(y_true_bin.column(1), probs.column(1))?;
            roc_curve = Some(roc);
            pr_curve = Some(pr);
        }
    }

    Ok(BinaryReport {
        scores,
        roc_curve,
        pr_curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_reference_scenario() {
        let y_true = array![0usize, 1, 0, 1];
        let y_pred = array![0usize, 1, 0, 0];
        let probs = array![[0.9, 0.1], [0.2, 0.8], [0.7, 0.3], [0.6, 0.4]];

        let report =
            compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), false).unwrap();

        assert_abs_diff_eq!(
            report.score(BinaryMetric::Accuracy).unwrap(),
            0.75,
            epsilon = 1e-12
        );
        assert!(report.score(BinaryMetric::F1).unwrap() > 0.0);
        // Probabilities rank the positive class perfectly.
        assert_abs_diff_eq!(
            report.score(BinaryMetric::RocAuc).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        let ap = report.score(BinaryMetric::AveragePrecision).unwrap();
        assert!(ap.is_finite() && (0.0..=1.0).contains(&ap));
    }

    #[test]
    fn test_all_metric_keys_present() {
        let y_true = array![0usize, 1];
        let y_pred = array![0usize, 1];
        let probs = array![[0.9, 0.1], [0.2, 0.8]];
        let report =
            compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), false).unwrap();
        for metric in BinaryMetric::ALL {
            assert!(report.score(metric).is_some(), "{metric} missing");
        }
    }

    #[test]
    fn test_single_class_auc_nan_ap_finite() {
        let y_true = array![1usize, 1, 1];
        let y_pred = array![1usize, 1, 0];
        let probs = array![[0.1, 0.9], [0.3, 0.7], [0.6, 0.4]];
        let report =
            compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), false).unwrap();

        assert!(report.score(BinaryMetric::RocAuc).unwrap().is_nan());
        let ap = report.score(BinaryMetric::AveragePrecision).unwrap();
        assert!(ap.is_finite() && (0.0..=1.0).contains(&ap));
    }

    #[test]
    fn test_nan_probabilities_degrade_gracefully() {
        let y_true = array![0usize, 1, 0, 1];
        let y_pred = array![0usize, 1, 0, 0];
        let probs = array![[0.9, 0.1], [f64::NAN, 0.8], [0.7, 0.3], [0.6, 0.4]];
        let report =
            compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), true).unwrap();

        assert!(report.score(BinaryMetric::RocAuc).unwrap().is_nan());
        assert!(report.score(BinaryMetric::AveragePrecision).unwrap().is_nan());
        assert!(report.roc_curve.is_none());
        assert!(report.pr_curve.is_none());
        // Label-only metrics are unaffected.
        assert_abs_diff_eq!(
            report.score(BinaryMetric::Accuracy).unwrap(),
            0.75,
            epsilon = 1e-12
        );
        assert!(report.score(BinaryMetric::CohenKappa).unwrap().is_finite());
        assert!(report.score(BinaryMetric::Mcc).unwrap().is_finite());
    }

    #[test]
    fn test_curves_attached_when_requested() {
        let y_true = array![0usize, 1, 0, 1];
        let y_pred = array![0usize, 1, 0, 0];
        let probs = array![[0.9, 0.1], [0.2, 0.8], [0.7, 0.3], [0.6, 0.4]];
        let report =
            compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), true).unwrap();
        assert!(report.roc_curve.is_some());
        assert!(report.pr_curve.is_some());
    }

    #[test]
    fn test_curves_run_for_single_class_input() {
        let y_true = array![1usize, 1, 1];
        let y_pred = array![1usize, 1, 1];
        let probs = array![[0.1, 0.9], [0.3, 0.7], [0.6, 0.4]];
        let report =
            compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), true).unwrap();
        assert!(report.roc_curve.is_some());
    }

    #[test]
    fn test_rejects_non_binary_labels() {
        let y_true = array![0usize, 2];
        let y_pred = array![0usize, 1];
        let probs = array![[0.9, 0.1], [0.2, 0.8]];
        assert!(compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), false).is_err());
    }

    #[test]
    fn test_rejects_wrong_column_count() {
        let y_true = array![0usize, 1];
        let y_pred = array![0usize, 1];
        let probs = array![[0.9, 0.05, 0.05], [0.2, 0.7, 0.1]];
        assert!(compute_binary_metrics(y_true.view(), y_pred.view(), probs.view(), false).is_err());
    }
}

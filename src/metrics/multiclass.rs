//! Multiclass metric bundle with per-class decomposition

use crate::error::{EvalError, Result};
use crate::metrics::binary::{compute_binary_metrics, BinaryReport};
use crate::metrics::indicator::{class_indicator_matrix, inferred_classes};
use crate::metrics::rank::rank_n_accuracy;
use crate::stats;
use crate::stats::curves::{roc_auc_macro, roc_auc_micro};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The closed set of multiclass-mode metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MulticlassMetric {
    Accuracy,
    CohenKappa,
    F1Micro,
    F1Macro,
    RocAucMicro,
    RocAucMacro,
    RankAccuracy,
}

impl MulticlassMetric {
    pub const ALL: [MulticlassMetric; 7] = [
        MulticlassMetric::Accuracy,
        MulticlassMetric::CohenKappa,
        MulticlassMetric::F1Micro,
        MulticlassMetric::F1Macro,
        MulticlassMetric::RocAucMicro,
        MulticlassMetric::RocAucMacro,
        MulticlassMetric::RankAccuracy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MulticlassMetric::Accuracy => "accuracy",
            MulticlassMetric::CohenKappa => "cohen_kappa",
            MulticlassMetric::F1Micro => "f1_micro",
            MulticlassMetric::F1Macro => "f1_macro",
            MulticlassMetric::RocAucMicro => "roc_auc_micro",
            MulticlassMetric::RocAucMacro => "roc_auc_macro",
            MulticlassMetric::RankAccuracy => "rank_accuracy",
        }
    }
}

impl std::fmt::Display for MulticlassMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Metric bundle for one multiclass evaluation.
///
/// Every [`MulticlassMetric`] key is always present in `scores` (NaN =
/// undefined). `class_wise` maps each class index to a one-vs-rest binary
/// report when per-class output was requested; one level deep, never
/// recursive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticlassReport {
    pub scores: HashMap<MulticlassMetric, f64>,
    pub class_wise: Option<BTreeMap<usize, BinaryReport>>,
}

impl MulticlassReport {
    pub fn score(&self, metric: MulticlassMetric) -> Option<f64> {
        self.scores.get(&metric).copied()
    }
}

/// Compute the full multiclass metric bundle.
///
/// Accuracy, kappa, micro/macro F1, and rank-N accuracy (`rank_fraction` of
/// the class count, resolved by [`rank_n_accuracy`]) are always computed.
/// Micro/macro ROC-AUC stay NaN when all samples share one true class or the
/// probability matrix contains NaN; otherwise both the indicator matrix and
/// the probability columns are restricted to classes actually present in
/// `y_true`, so the AUC primitives never see a column without positive
/// examples.
///
/// With `include_per_class` or `include_curves`, indicator matrices over all
/// `0..C` classes (absent classes included, all-zero) drive a one-vs-rest
/// binary bundle per class, each scored against the synthetic two-column
/// matrix `[1 - P(c), P(c)]`.
pub fn compute_multiclass_metrics(
    y_true: ArrayView1<usize>,
    y_pred: ArrayView1<usize>,
    probs: ArrayView2<f64>,
    include_per_class: bool,
    include_curves: bool,
    rank_fraction: f64,
) -> Result<MulticlassReport> {
    if probs.nrows() != y_true.len() {
        return Err(EvalError::ShapeError(format!(
            "{} labels but {} probability rows",
            y_true.len(),
            probs.nrows()
        )));
    }
    let n_classes = probs.ncols();
    if y_true.iter().chain(y_pred.iter()).any(|&l| l >= n_classes) {
        return Err(EvalError::DataError(format!(
            "label outside the probability matrix's {n_classes} columns"
        )));
    }

    let mut scores = HashMap::from([
        (MulticlassMetric::Accuracy, stats::accuracy(y_true, y_pred)?),
        (
            MulticlassMetric::CohenKappa,
            stats::cohen_kappa(y_true, y_pred)?,
        ),
        (MulticlassMetric::F1Micro, stats::f1_micro(y_true, y_pred)?),
        (MulticlassMetric::F1Macro, stats::f1_macro(y_true, y_pred)?),
        (MulticlassMetric::RocAucMicro, f64::NAN),
        (MulticlassMetric::RocAucMacro, f64::NAN),
        (
            MulticlassMetric::RankAccuracy,
            rank_n_accuracy(y_true, probs, rank_fraction)?,
        ),
    ]);

    let present = inferred_classes(y_true);
    let all_labels_same = present.len() == 1;
    let any_probs_nan = probs.iter().any(|v| v.is_nan());

    if all_labels_same || any_probs_nan {
        tracing::debug!(
            single_class = all_labels_same,
            nan_probs = any_probs_nan,
            "multi-label ROC-AUC left undefined"
        );
    } else {
        // Indicator over present classes only; drop the matching probability
        // columns so no all-zero column reaches the AUC primitives.
        let y_true_bin = class_indicator_matrix(y_true, None);
        let filtered_probs = probs.select(Axis(1), &present);

        scores.insert(
            MulticlassMetric::RocAucMicro,
            roc_auc_micro(y_true_bin.view(), filtered_probs.view())?,
        );
        scores.insert(
            MulticlassMetric::RocAucMacro,
            roc_auc_macro(y_true_bin.view(), filtered_probs.view())?,
        );
    }

    let mut class_wise = None;
    if include_per_class || include_curves {
        let all_classes: Vec<usize> = (0..n_classes).collect();
        let y_true_bin = class_indicator_matrix(y_true, Some(&all_classes));
        let y_pred_bin = class_indicator_matrix(y_pred, Some(&all_classes));

        let mut per_class = BTreeMap::new();
        for &cls in &all_classes {
            let cls_true = to_binary_labels(y_true_bin.column(cls));
            let cls_pred = to_binary_labels(y_pred_bin.column(cls));
            let cls_probs = one_vs_rest_probs(probs.column(cls));
            let report = compute_binary_metrics(
                cls_true.view(),
                cls_pred.view(),
                cls_probs.view(),
                include_curves,
            )?;
            per_class.insert(cls, report);
        }
        class_wise = Some(per_class);
    }

    Ok(MulticlassReport { scores, class_wise })
}

fn to_binary_labels(column: ArrayView1<f64>) -> Array1<usize> {
    column.mapv(|v| usize::from(v > 0.5))
}

/// Two-column matrix `[1 - p, p]` treating one class as positive.
fn one_vs_rest_probs(column: ArrayView1<f64>) -> Array2<f64> {
    let mut probs = Array2::zeros((column.len(), 2));
    probs.column_mut(0).assign(&column.mapv(|p| 1.0 - p));
    probs.column_mut(1).assign(&column);
    probs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::binary::BinaryMetric;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn three_class_fixture() -> (Array1<usize>, Array1<usize>, Array2<f64>) {
        let y_true = array![0usize, 1, 2, 1, 0, 2];
        let y_pred = array![0usize, 1, 2, 2, 0, 2];
        let probs = array![
            [0.8, 0.1, 0.1],
            [0.1, 0.7, 0.2],
            [0.2, 0.2, 0.6],
            [0.1, 0.4, 0.5],
            [0.7, 0.2, 0.1],
            [0.1, 0.3, 0.6],
        ];
        (y_true, y_pred, probs)
    }

    #[test]
    fn test_full_bundle_defined() {
        let (y_true, y_pred, probs) = three_class_fixture();
        let report = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            false,
            false,
            0.33,
        )
        .unwrap();

        for metric in MulticlassMetric::ALL {
            let value = report.score(metric).unwrap();
            assert!(value.is_finite(), "{metric} should be finite");
        }
        assert!(report.class_wise.is_none());
    }

    #[test]
    fn test_single_true_class_auc_nan_rest_numeric() {
        let y_true = array![1usize, 1, 1];
        let y_pred = array![1usize, 2, 1];
        let probs = array![[0.2, 0.5, 0.3], [0.1, 0.3, 0.6], [0.2, 0.6, 0.2]];
        let report = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            false,
            false,
            0.33,
        )
        .unwrap();

        assert!(report.score(MulticlassMetric::RocAucMicro).unwrap().is_nan());
        assert!(report.score(MulticlassMetric::RocAucMacro).unwrap().is_nan());
        assert!(report.score(MulticlassMetric::Accuracy).unwrap().is_finite());
        assert!(report.score(MulticlassMetric::F1Micro).unwrap().is_finite());
        assert!(report.score(MulticlassMetric::F1Macro).unwrap().is_finite());
        assert!(report
            .score(MulticlassMetric::CohenKappa)
            .unwrap()
            .is_finite());
        assert!(report
            .score(MulticlassMetric::RankAccuracy)
            .unwrap()
            .is_finite());
    }

    #[test]
    fn test_nan_probs_degrade_auc_only() {
        let (y_true, y_pred, mut probs) = three_class_fixture();
        probs[[0, 0]] = f64::NAN;
        let report = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            false,
            false,
            1.0,
        )
        .unwrap();

        assert!(report.score(MulticlassMetric::RocAucMicro).unwrap().is_nan());
        assert!(report.score(MulticlassMetric::RocAucMacro).unwrap().is_nan());
        assert!(report.score(MulticlassMetric::Accuracy).unwrap().is_finite());
        assert!(report
            .score(MulticlassMetric::CohenKappa)
            .unwrap()
            .is_finite());
    }

    #[test]
    fn test_absent_class_restriction() {
        // Class 1 never appears in y_true; the restricted AUC view must
        // exclude its column and still produce finite scores.
        let y_true = array![0usize, 2, 0, 2];
        let y_pred = array![0usize, 2, 2, 2];
        let probs = array![
            [0.8, 0.1, 0.1],
            [0.2, 0.2, 0.6],
            [0.3, 0.4, 0.3],
            [0.1, 0.3, 0.6],
        ];
        let report = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            false,
            false,
            0.33,
        )
        .unwrap();

        assert!(report
            .score(MulticlassMetric::RocAucMicro)
            .unwrap()
            .is_finite());
        assert!(report
            .score(MulticlassMetric::RocAucMacro)
            .unwrap()
            .is_finite());
    }

    #[test]
    fn test_class_wise_covers_all_classes() {
        let y_true = array![0usize, 2, 0, 2];
        let y_pred = array![0usize, 2, 2, 2];
        let probs = array![
            [0.8, 0.1, 0.1],
            [0.2, 0.2, 0.6],
            [0.3, 0.4, 0.3],
            [0.1, 0.3, 0.6],
        ];
        let report = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            true,
            false,
            0.33,
        )
        .unwrap();

        let class_wise = report.class_wise.unwrap();
        assert_eq!(class_wise.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);

        // Class 1 is absent: its one-vs-rest AUC is undefined, AP still finite.
        let absent = &class_wise[&1];
        assert!(absent.score(BinaryMetric::RocAuc).unwrap().is_nan());
        assert!(absent
            .score(BinaryMetric::AveragePrecision)
            .unwrap()
            .is_finite());
    }

    #[test]
    fn test_class_wise_curves_attached() {
        let (y_true, y_pred, probs) = three_class_fixture();
        let report = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            false,
            true,
            0.33,
        )
        .unwrap();

        let class_wise = report.class_wise.unwrap();
        for report in class_wise.values() {
            assert!(report.roc_curve.is_some());
            assert!(report.pr_curve.is_some());
        }
    }

    #[test]
    fn test_rank_fraction_propagates_invalid_config() {
        let (y_true, y_pred, probs) = three_class_fixture();
        let result = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            false,
            false,
            0.01,
        );
        assert!(matches!(result, Err(EvalError::InvalidConfig(_))));
    }

    #[test]
    fn test_label_outside_columns_rejected() {
        let y_true = array![0usize, 3];
        let y_pred = array![0usize, 1];
        let probs = array![[0.5, 0.3, 0.2], [0.2, 0.5, 0.3]];
        let result = compute_multiclass_metrics(
            y_true.view(),
            y_pred.view(),
            probs.view(),
            false,
            false,
            0.33,
        );
        assert!(result.is_err());
    }
}

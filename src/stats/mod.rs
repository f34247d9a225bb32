//! Statistical primitives for classification metrics
//!
//! Confusion-matrix based scores shared by the binary and multiclass metric
//! sets: accuracy, Cohen's kappa, F1 variants, and Matthews correlation.
//! Curve-based primitives (ROC, precision-recall, AUC, average precision)
//! live in [`curves`].

pub mod curves;

use crate::error::{EvalError, Result};
use ndarray::{Array2, ArrayView1};

/// Confusion matrix over class indices.
///
/// Entry `(i, j)` counts samples with true class `i` predicted as class `j`.
/// The class count is taken from the largest index observed in either label
/// vector.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    counts: Array2<usize>,
    n_classes: usize,
}

impl ConfusionMatrix {
    /// Build from parallel true/predicted label vectors.
    pub fn from_labels(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(EvalError::ShapeError(format!(
                "label vectors differ in length: {} vs {}",
                y_true.len(),
                y_pred.len()
            )));
        }
        if y_true.is_empty() {
            return Err(EvalError::DataError("empty label vector".to_string()));
        }

        let n_classes = y_true
            .iter()
            .chain(y_pred.iter())
            .max()
            .map_or(0, |&m| m + 1);

        let mut counts = Array2::zeros((n_classes, n_classes));
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            counts[[t, p]] += 1;
        }

        Ok(Self { counts, n_classes })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn get(&self, true_class: usize, pred_class: usize) -> usize {
        self.counts[[true_class, pred_class]]
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.counts[[class, class]]
    }

    /// Predicted as `class` but belonging to another class.
    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&i| i != class)
            .map(|i| self.counts[[i, class]])
            .sum()
    }

    /// Belonging to `class` but predicted as another class.
    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&j| j != class)
            .map(|j| self.counts[[class, j]])
            .sum()
    }

    /// Number of true instances of `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts.row(class).sum()
    }

    /// Number of samples predicted as `class`.
    pub fn predicted(&self, class: usize) -> usize {
        self.counts.column(class).sum()
    }
}

/// Fraction of exactly matching predictions.
pub fn accuracy(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(EvalError::ShapeError(format!(
            "label vectors differ in length: {} vs {}",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(EvalError::DataError("empty label vector".to_string()));
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Cohen's kappa: agreement corrected for chance.
///
/// `kappa = (p_o - p_e) / (1 - p_e)` where `p_o` is observed agreement and
/// `p_e` the agreement expected from the row/column marginals. When the
/// marginals concentrate all mass in one cell (`p_e = 1`) the score is 1.0
/// for perfect agreement and 0.0 otherwise.
pub fn cohen_kappa(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
    let cm = ConfusionMatrix::from_labels(y_true, y_pred)?;
    let total = cm.total() as f64;

    let p_o: f64 = (0..cm.n_classes())
        .map(|k| cm.true_positives(k) as f64)
        .sum::<f64>()
        / total;

    let p_e: f64 = (0..cm.n_classes())
        .map(|k| cm.support(k) as f64 * cm.predicted(k) as f64)
        .sum::<f64>()
        / (total * total);

    let denom = 1.0 - p_e;
    if denom.abs() < f64::EPSILON {
        return Ok(if (p_o - 1.0).abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        });
    }
    Ok((p_o - p_e) / denom)
}

fn precision_recall_f1(tp: f64, fp: f64, fn_: f64) -> f64 {
    let p = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let r = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
    if p + r > 0.0 {
        2.0 * p * r / (p + r)
    } else {
        0.0
    }
}

/// F1 score for the positive class (class index 1) of a binary problem.
pub fn f1_binary(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
    let cm = ConfusionMatrix::from_labels(y_true, y_pred)?;
    if cm.n_classes() > 2 {
        return Err(EvalError::DataError(format!(
            "binary F1 expects labels in {{0, 1}}, found {} classes",
            cm.n_classes()
        )));
    }
    // All labels may be 0; treat the missing positive class as empty.
    let (tp, fp, fn_) = if cm.n_classes() == 2 {
        (
            cm.true_positives(1) as f64,
            cm.false_positives(1) as f64,
            cm.false_negatives(1) as f64,
        )
    } else {
        (0.0, 0.0, 0.0)
    };
    Ok(precision_recall_f1(tp, fp, fn_))
}

/// Micro-averaged F1: global counts pooled over all classes.
pub fn f1_micro(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
    let cm = ConfusionMatrix::from_labels(y_true, y_pred)?;
    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut fn_ = 0.0;
    for k in 0..cm.n_classes() {
        tp += cm.true_positives(k) as f64;
        fp += cm.false_positives(k) as f64;
        fn_ += cm.false_negatives(k) as f64;
    }
    Ok(precision_recall_f1(tp, fp, fn_))
}

/// Macro-averaged F1: unweighted mean of per-class F1 scores.
pub fn f1_macro(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
    let cm = ConfusionMatrix::from_labels(y_true, y_pred)?;
    let sum: f64 = (0..cm.n_classes())
        .map(|k| {
            precision_recall_f1(
                cm.true_positives(k) as f64,
                cm.false_positives(k) as f64,
                cm.false_negatives(k) as f64,
            )
        })
        .sum();
    Ok(sum / cm.n_classes() as f64)
}

/// Matthews correlation coefficient, generalized multiclass form.
///
/// `MCC = (c*s - sum(p_k t_k)) / sqrt((s^2 - sum(p_k^2))(s^2 - sum(t_k^2)))`
/// with `c` = correct predictions, `s` = total samples, `p_k`/`t_k` the
/// predicted/true counts per class. Reduces to the familiar binary formula
/// for two classes. A zero denominator yields 0.0.
pub fn matthews_corrcoef(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
    let cm = ConfusionMatrix::from_labels(y_true, y_pred)?;
    let s = cm.total() as f64;
    let c: f64 = (0..cm.n_classes())
        .map(|k| cm.true_positives(k) as f64)
        .sum();

    let mut sum_pk_sq = 0.0;
    let mut sum_tk_sq = 0.0;
    let mut sum_pk_tk = 0.0;
    for k in 0..cm.n_classes() {
        let pk = cm.predicted(k) as f64;
        let tk = cm.support(k) as f64;
        sum_pk_sq += pk * pk;
        sum_tk_sq += tk * tk;
        sum_pk_tk += pk * tk;
    }

    let numer = c * s - sum_pk_tk;
    let denom_sq = (s * s - sum_pk_sq) * (s * s - sum_tk_sq);
    if denom_sq <= 0.0 {
        return Ok(0.0);
    }
    Ok(numer / denom_sq.sqrt())
}

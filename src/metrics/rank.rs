//! Rank-N accuracy
//!
//! How often the true label appears among the top-N ranked classes. Mostly
//! useful when the label cardinality is large and plain accuracy is too
//! blunt an instrument.

use crate::error::{EvalError, Result};
use ndarray::{ArrayView1, ArrayView2};
use std::cmp::Ordering;

/// Fraction of samples whose true class ranks in the top K columns of the
/// probability matrix by descending score.
///
/// `n >= 1` is taken as the top-K count directly (truncated to an integer);
/// `n < 1` is a proportion of the class count, rounded to the nearest
/// integer. A resolved K outside `[1, n_classes]` is an
/// [`EvalError::InvalidConfig`]: the caller asked for a ranking depth the
/// matrix cannot provide, and clamping would silently change the metric.
///
/// Ties in score are broken by the stable descending sort, so equal scores
/// keep their column order.
pub fn rank_n_accuracy(
    y_true: ArrayView1<usize>,
    probs: ArrayView2<f64>,
    n: f64,
) -> Result<f64> {
    if y_true.len() != probs.nrows() {
        return Err(EvalError::ShapeError(format!(
            "{} labels but {} probability rows",
            y_true.len(),
            probs.nrows()
        )));
    }
    if y_true.is_empty() {
        return Err(EvalError::DataError("empty label vector".to_string()));
    }

    let n_classes = probs.ncols();
    let k = if n >= 1.0 {
        n as usize
    } else {
        (n_classes as f64 * n).round() as usize
    };
    if k == 0 || k > n_classes {
        return Err(EvalError::InvalidConfig(format!(
            "rank accuracy resolved K={k} outside [1, {n_classes}]"
        )));
    }

    let mut correct = 0usize;
    for (i, &label) in y_true.iter().enumerate() {
        let row = probs.row(i);
        let mut ranking: Vec<usize> = (0..n_classes).collect();
        ranking.sort_by(|&a, &b| row[b].partial_cmp(&row[a]).unwrap_or(Ordering::Equal));
        if ranking[..k].contains(&label) {
            correct += 1;
        }
    }

    Ok(correct as f64 / y_true.len() as f64)
}

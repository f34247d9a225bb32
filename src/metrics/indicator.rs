//! Per-class indicator matrices

use ndarray::{Array2, ArrayView1};

/// Sorted distinct class indices observed in `y`.
pub fn inferred_classes(y: ArrayView1<usize>) -> Vec<usize> {
    let mut classes: Vec<usize> = y.iter().copied().collect();
    classes.sort_unstable();
    classes.dedup();
    classes
}

/// Binary indicator matrix (samples x classes): entry `(i, j)` is 1.0 iff
/// `y[i]` equals the j-th class.
///
/// With `classes = None` the class set is inferred from `y`, so classes never
/// observed get no column. That keeps all-zero columns away from downstream
/// AUC computation, which is undefined without positive examples. An explicit
/// class set gets one column per listed class regardless of presence, which
/// per-class metric loops need for absent classes (their column is all-zero).
pub fn class_indicator_matrix(y: ArrayView1<usize>, classes: Option<&[usize]>) -> Array2<f64> {
    let inferred;
    let classes = match classes {
        Some(c) => c,
        None => {
            inferred = inferred_classes(y);
            &inferred
        }
    };

    let mut y_bin = Array2::zeros((y.len(), classes.len()));
    for (j, &cls) in classes.iter().enumerate() {
        for (i, &label) in y.iter().enumerate() {
            if label == cls {
                y_bin[[i, j]] = 1.0;
            }
        }
    }
    y_bin
}

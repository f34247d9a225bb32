//! Metric sets for classification evaluation
//!
//! Provides the standardized metric bundles computed per held-out split:
//! - [`rank`] - top-K rank accuracy over a probability matrix
//! - [`indicator`] - per-class indicator (one-hot) matrices
//! - [`curves`] - ROC and precision-recall curve extraction
//! - [`binary`] - the binary-classification metric bundle
//! - [`multiclass`] - the multiclass bundle with per-class decomposition

pub mod binary;
pub mod curves;
pub mod indicator;
pub mod multiclass;
pub mod rank;

pub use binary::{compute_binary_metrics, BinaryMetric, BinaryReport};
pub use curves::{extract_curves, PrCurveData, RocCurveData};
pub use indicator::{class_indicator_matrix, inferred_classes};
pub use multiclass::{compute_multiclass_metrics, MulticlassMetric, MulticlassReport};
pub use rank::rank_n_accuracy;

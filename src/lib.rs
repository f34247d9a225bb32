//! autoeval - standardized evaluation for classification pipelines
//!
//! This crate computes a fixed set of performance metrics (overall,
//! per-class, and curve-based) for trained classification pipelines, and
//! orchestrates stratified k-fold cross-validation to produce those metrics
//! across held-out splits. It serves model-selection workflows that must
//! compare many candidate pipelines uniformly: binary and multiclass label
//! spaces share one abstraction, and mathematically undefined scores degrade
//! to NaN instead of failing the run.
//!
//! # Modules
//!
//! - [`stats`] - statistical primitives (confusion-matrix scores, ROC/PR
//!   curves, AUC and average precision)
//! - [`metrics`] - the binary and multiclass metric bundles, rank accuracy,
//!   indicator matrices, curve extraction
//! - [`evaluation`] - the pipeline boundary, held-out evaluation, and
//!   stratified cross-validation
//! - [`error`] - error types

pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod stats;

pub use error::{EvalError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{EvalError, Result};

    pub use crate::metrics::{
        compute_binary_metrics, compute_multiclass_metrics, BinaryMetric, BinaryReport,
        MulticlassMetric, MulticlassReport, PrCurveData, RocCurveData,
    };

    pub use crate::evaluation::{
        ClassifierPipeline, CrossValidationOutcome, CrossValidator, EvalOptions, EvalReport,
        PipelineEvaluator, ScoreOutput, StratifiedKFold, TaskMode, DEFAULT_N_FOLDS,
    };
}

//! Pipeline evaluation and cross-validation
//!
//! - [`pipeline`] - the opaque pipeline boundary and its scoring capability
//! - [`evaluator`] - held-out evaluation of a fitted pipeline
//! - [`cross_validation`] - stratified k-fold orchestration and aggregation

pub mod cross_validation;
pub mod evaluator;
pub mod pipeline;

pub use cross_validation::{
    CrossValidationOutcome, CrossValidator, FoldSplit, StratifiedKFold, DEFAULT_N_FOLDS,
};
pub use evaluator::{EvalOptions, EvalReport, PipelineEvaluator, TaskMode};
pub use pipeline::{ClassifierPipeline, ScoreOutput};

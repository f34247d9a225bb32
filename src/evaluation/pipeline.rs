//! Pipeline boundary
//!
//! The evaluation engine treats the classification pipeline as an opaque
//! collaborator: it can be fitted, it predicts labels, and it produces
//! either calibrated probabilities or raw decision scores. Which of the two
//! it produces is declared once, up front, through [`ScoreOutput`] rather
//! than discovered by runtime inspection.

use crate::error::{EvalError, Result};
use ndarray::{Array1, Array2};

/// What kind of per-class score a pipeline's final estimator emits.
///
/// Margin-based linear learners (stochastic-gradient, passive-aggressive)
/// have no calibrated probability output; their decision scores are still
/// usable as relative class rankings for AUC/AP/curve computation, and the
/// evaluator substitutes them accordingly. Callers must not interpret such
/// scores as probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScoreOutput {
    Probabilities,
    DecisionScores,
}

/// A trained (or trainable) classification pipeline under evaluation.
///
/// Labels are class indices `0..C` matching the columns of the score
/// matrices. Implementations declare their scoring capability via
/// [`ClassifierPipeline::score_output`] and implement the matching method;
/// the defaults error so a pipeline only writes the path it supports.
pub trait ClassifierPipeline: Send + Sync {
    /// Fit on the training partition. Idempotent per call; refitting
    /// replaces the previous state.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()>;

    /// Predicted class index per sample.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Calibrated class probabilities, samples x classes.
    fn predict_proba(&self, _x: &Array2<f64>) -> Result<Array2<f64>> {
        Err(EvalError::PipelineError(
            "pipeline does not produce probabilities".to_string(),
        ))
    }

    /// Raw decision scores: samples x classes, or a single column for
    /// binary margin classifiers (positive score favors class 1).
    fn decision_function(&self, _x: &Array2<f64>) -> Result<Array2<f64>> {
        Err(EvalError::PipelineError(
            "pipeline does not produce decision scores".to_string(),
        ))
    }

    /// Declared scoring capability, resolved at construction time.
    fn score_output(&self) -> ScoreOutput {
        ScoreOutput::Probabilities
    }
}

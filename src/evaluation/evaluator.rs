//! Pipeline evaluation over held-out data
//!
//! Runs a fitted pipeline over a test partition, resolves the
//! probability-vs-decision-score question, and dispatches to the binary or
//! multiclass metric bundle.

use crate::error::{EvalError, Result};
use crate::evaluation::pipeline::{ClassifierPipeline, ScoreOutput};
use crate::metrics::binary::{compute_binary_metrics, BinaryMetric, BinaryReport};
use crate::metrics::multiclass::{compute_multiclass_metrics, MulticlassMetric, MulticlassReport};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Label-space mode of an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskMode {
    Binary,
    Multiclass,
}

/// Options for a single evaluation or a whole cross-validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Attach ROC/PR curve point data to reports.
    pub include_curves: bool,
    /// Attach per-class one-vs-rest decomposition (multiclass only).
    pub include_per_class: bool,
    /// Rank-accuracy depth as a fraction of the class count (multiclass
    /// only). Values >= 1 are taken as an absolute top-K count.
    pub rank_fraction: f64,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            include_curves: false,
            include_per_class: false,
            rank_fraction: 0.33,
        }
    }
}

impl EvalOptions {
    pub fn with_curves(mut self) -> Self {
        self.include_curves = true;
        self
    }

    pub fn with_per_class(mut self) -> Self {
        self.include_per_class = true;
        self
    }

    pub fn with_rank_fraction(mut self, fraction: f64) -> Self {
        self.rank_fraction = fraction;
        self
    }
}

/// Metric report for one evaluated split, in either mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EvalReport {
    Binary(BinaryReport),
    Multiclass(MulticlassReport),
}

impl EvalReport {
    /// Uniform scalar lookup by metric name across both modes. `None` when
    /// the name is not part of the mode's enumeration or absent from the
    /// report.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self {
            EvalReport::Binary(report) => BinaryMetric::ALL
                .iter()
                .find(|m| m.name() == name)
                .and_then(|&m| report.score(m)),
            EvalReport::Multiclass(report) => MulticlassMetric::ALL
                .iter()
                .find(|m| m.name() == name)
                .and_then(|&m| report.score(m)),
        }
    }
}

/// Evaluates a fitted pipeline on held-out data.
#[derive(Debug, Clone)]
pub struct PipelineEvaluator {
    mode: TaskMode,
    options: EvalOptions,
}

impl PipelineEvaluator {
    pub fn new(mode: TaskMode) -> Self {
        Self {
            mode,
            options: EvalOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    pub fn mode(&self) -> TaskMode {
        self.mode
    }

    /// Predict labels and scores for the held-out partition and compute the
    /// mode's metric bundle.
    ///
    /// Pipelines declaring [`ScoreOutput::DecisionScores`] have their
    /// decision function substituted for probabilities: a binary margin
    /// column `s` becomes the two-column matrix `[-s, +s]`, a multiclass
    /// score matrix is used directly.
    pub fn evaluate<P: ClassifierPipeline + ?Sized>(
        &self,
        pipeline: &P,
        x: &Array2<f64>,
        y: &Array1<usize>,
    ) -> Result<EvalReport> {
        if y.is_empty() {
            return Err(EvalError::DataError("empty test partition".to_string()));
        }

        let y_pred = pipeline.predict(x)?;
        let probs = self.resolve_scores(pipeline, x)?;
        if probs.nrows() != y.len() {
            return Err(EvalError::ShapeError(format!(
                "{} test labels but {} score rows",
                y.len(),
                probs.nrows()
            )));
        }

        match self.mode {
            TaskMode::Binary => {
                let report = compute_binary_metrics(
                    y.view(),
                    y_pred.view(),
                    probs.view(),
                    self.options.include_curves,
                )?;
                Ok(EvalReport::Binary(report))
            }
            TaskMode::Multiclass => {
                let report = compute_multiclass_metrics(
                    y.view(),
                    y_pred.view(),
                    probs.view(),
                    self.options.include_per_class,
                    self.options.include_curves,
                    self.options.rank_fraction,
                )?;
                Ok(EvalReport::Multiclass(report))
            }
        }
    }

    fn resolve_scores<P: ClassifierPipeline + ?Sized>(
        &self,
        pipeline: &P,
        x: &Array2<f64>,
    ) -> Result<Array2<f64>> {
        match pipeline.score_output() {
            ScoreOutput::Probabilities => pipeline.predict_proba(x),
            ScoreOutput::DecisionScores => {
                let scores = pipeline.decision_function(x)?;
                match self.mode {
                    TaskMode::Binary => {
                        if scores.ncols() != 1 {
                            return Err(EvalError::ShapeError(format!(
                                "binary decision function must yield one column, got {}",
                                scores.ncols()
                            )));
                        }
                        let margin = scores.column(0);
                        let mut probs = Array2::zeros((scores.nrows(), 2));
                        probs.column_mut(0).assign(&margin.mapv(|s| -s));
                        probs.column_mut(1).assign(&margin);
                        Ok(probs)
                    }
                    TaskMode::Multiclass => Ok(scores),
                }
            }
        }
    }
}

//! Stratified cross-validation orchestration
//!
//! Drives a pipeline through stratified k-fold splits, evaluating each
//! held-out partition and aggregating the per-fold reports into a summary
//! table.

use crate::error::{EvalError, Result};
use crate::evaluation::evaluator::{EvalOptions, EvalReport, PipelineEvaluator, TaskMode};
use crate::evaluation::pipeline::ClassifierPipeline;
use crate::metrics::binary::BinaryMetric;
use crate::metrics::multiclass::MulticlassMetric;
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Default fold count for cross-validation runs.
pub const DEFAULT_N_FOLDS: usize = 5;

/// A single train/test partition of sample indices.
#[derive(Debug, Clone)]
pub struct FoldSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Stratified k-fold splitter: each fold preserves class proportions as
/// closely as possible.
///
/// Samples are grouped per class and dealt round-robin onto folds, so fold
/// assignment is deterministic unless a shuffle seed is set. A class with
/// fewer members than the fold count cannot be stratified and is a hard
/// error; there is no fallback to unstratified splitting.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            seed: 0,
        }
    }

    /// Enable seeded shuffling within each class before fold assignment.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    /// Generate the train/test index pairs, in fold order.
    pub fn split(&self, y: &Array1<usize>) -> Result<Vec<FoldSplit>> {
        if self.n_splits < 2 {
            return Err(EvalError::InvalidConfig(
                "n_splits must be at least 2".to_string(),
            ));
        }
        let n_samples = y.len();
        if n_samples < self.n_splits {
            return Err(EvalError::InvalidConfig(format!(
                "n_samples ({}) must be >= n_splits ({})",
                n_samples, self.n_splits
            )));
        }

        // Group samples by class; BTreeMap keeps class order deterministic.
        let mut class_indices: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, &class) in y.iter().enumerate() {
            class_indices.entry(class).or_default().push(idx);
        }

        for (&class, indices) in &class_indices {
            if indices.len() < self.n_splits {
                return Err(EvalError::StratificationError(format!(
                    "class {} has {} members, fewer than {} folds",
                    class,
                    indices.len(),
                    self.n_splits
                )));
            }
        }

        if self.shuffle {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            for indices in class_indices.values_mut() {
                indices.shuffle(&mut rng);
            }
        }

        // Deal each class round-robin across folds.
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        for indices in class_indices.values() {
            for (i, &idx) in indices.iter().enumerate() {
                folds[i % self.n_splits].push(idx);
            }
        }

        let mut splits = Vec::with_capacity(self.n_splits);
        for fold_idx in 0..self.n_splits {
            let test_indices = folds[fold_idx].clone();
            let train_indices: Vec<usize> = folds
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != fold_idx)
                .flat_map(|(_, f)| f.iter().copied())
                .collect();

            splits.push(FoldSplit {
                train_indices,
                test_indices,
                fold_idx,
            });
        }

        Ok(splits)
    }
}

/// Result of one cross-validation run: the per-fold reports in fold order
/// plus a summary table (rows = folds, columns = the mode's metric
/// enumeration).
#[derive(Debug, Clone)]
pub struct CrossValidationOutcome {
    pub summary: DataFrame,
    pub fold_reports: Vec<EvalReport>,
}

impl CrossValidationOutcome {
    /// Mean of a metric over folds where it came out as a defined number.
    pub fn mean(&self, metric_name: &str) -> Option<f64> {
        let values = self.defined_values(metric_name);
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Population standard deviation of a metric over defined folds.
    pub fn std(&self, metric_name: &str) -> Option<f64> {
        let values = self.defined_values(metric_name);
        if values.is_empty() {
            return None;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        Some(var.sqrt())
    }

    fn defined_values(&self, metric_name: &str) -> Vec<f64> {
        self.fold_reports
            .iter()
            .filter_map(|r| r.scalar(metric_name))
            .filter(|v| v.is_finite())
            .collect()
    }
}

/// Orchestrates stratified cross-validation of a pipeline.
///
/// Owns the fold-result sequence for the duration of one run; nothing
/// mutable is shared across runs. A failing fold aborts the whole run;
/// an outer selection loop gets a clean failure instead of partial numbers.
#[derive(Debug, Clone)]
pub struct CrossValidator {
    mode: TaskMode,
    n_folds: usize,
    options: EvalOptions,
    shuffle_seed: Option<u64>,
}

impl CrossValidator {
    pub fn new(mode: TaskMode) -> Self {
        Self {
            mode,
            n_folds: DEFAULT_N_FOLDS,
            options: EvalOptions::default(),
            shuffle_seed: None,
        }
    }

    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    /// Shuffle samples within each class before fold assignment.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Fit and evaluate `pipeline` across stratified folds of `(x, y)`.
    pub fn run<P: ClassifierPipeline + ?Sized>(
        &self,
        pipeline: &mut P,
        x: &Array2<f64>,
        y: &Array1<usize>,
    ) -> Result<CrossValidationOutcome> {
        if x.nrows() != y.len() {
            return Err(EvalError::ShapeError(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }

        let mut splitter = StratifiedKFold::new(self.n_folds);
        if let Some(seed) = self.shuffle_seed {
            splitter = splitter.with_seed(seed);
        }
        let splits = splitter.split(y)?;

        let evaluator = PipelineEvaluator::new(self.mode).with_options(self.options.clone());

        let mut fold_reports = Vec::with_capacity(splits.len());
        for split in &splits {
            let x_train = x.select(Axis(0), &split.train_indices);
            let y_train = y.select(Axis(0), &split.train_indices);
            let x_test = x.select(Axis(0), &split.test_indices);
            let y_test = y.select(Axis(0), &split.test_indices);

            tracing::debug!(
                fold = split.fold_idx,
                train = split.train_indices.len(),
                test = split.test_indices.len(),
                "fitting and evaluating fold"
            );

            pipeline.fit(&x_train, &y_train)?;
            let report = evaluator.evaluate(pipeline, &x_test, &y_test)?;
            fold_reports.push(report);
        }

        // The record list is complete; build the summary table once.
        let summary = self.build_summary(&fold_reports)?;

        Ok(CrossValidationOutcome {
            summary,
            fold_reports,
        })
    }

    /// Summary table: one row per fold, one nullable f64 column per metric
    /// in the mode's enumeration. A metric absent from a fold's report
    /// becomes null rather than failing the aggregation.
    fn build_summary(&self, fold_reports: &[EvalReport]) -> Result<DataFrame> {
        let metric_names: Vec<&'static str> = match self.mode {
            TaskMode::Binary => BinaryMetric::ALL.iter().map(|m| m.name()).collect(),
            TaskMode::Multiclass => MulticlassMetric::ALL.iter().map(|m| m.name()).collect(),
        };

        let columns: Vec<Column> = metric_names
            .iter()
            .map(|&name| {
                let values: Vec<Option<f64>> =
                    fold_reports.iter().map(|r| r.scalar(name)).collect();
                Series::new(name.into(), values).into()
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_split_counts_and_partitioning() {
        let y = Array1::from_iter((0..20).map(|i| i % 2));
        let splits = StratifiedKFold::new(4).split(&y).unwrap();

        assert_eq!(splits.len(), 4);
        let mut seen = vec![false; 20];
        for split in &splits {
            assert_eq!(split.test_indices.len(), 5);
            assert_eq!(split.train_indices.len(), 15);
            for &idx in &split.test_indices {
                assert!(!seen[idx], "index {idx} in two test folds");
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_split_preserves_class_proportions() {
        // 12 of class 0, 6 of class 1; each of 3 folds gets 4 + 2.
        let y = Array1::from_iter((0..18).map(|i| usize::from(i >= 12)));
        let splits = StratifiedKFold::new(3).split(&y).unwrap();

        for split in &splits {
            let ones = split.test_indices.iter().filter(|&&i| y[i] == 1).count();
            assert_eq!(split.test_indices.len(), 6);
            assert_eq!(ones, 2);
        }
    }

    #[test]
    fn test_rare_class_fails_stratification() {
        let y = array![0usize, 0, 0, 0, 1];
        let result = StratifiedKFold::new(3).split(&y);
        assert!(matches!(result, Err(EvalError::StratificationError(_))));
    }

    #[test]
    fn test_too_few_splits_rejected() {
        let y = array![0usize, 1, 0, 1];
        assert!(StratifiedKFold::new(1).split(&y).is_err());
    }

    #[test]
    fn test_shuffled_split_is_seeded_deterministic() {
        let y = Array1::from_iter((0..30).map(|i| i % 3));
        let a = StratifiedKFold::new(3).with_seed(7).split(&y).unwrap();
        let b = StratifiedKFold::new(3).with_seed(7).split(&y).unwrap();
        for (sa, sb) in a.iter().zip(b.iter()) {
            assert_eq!(sa.test_indices, sb.test_indices);
        }
    }
}

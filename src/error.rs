//! Error types for the evaluation engine

use thiserror::Error;

/// Errors surfaced by metric computation and cross-validation.
///
/// Mathematically undefined metrics are never errors; they are encoded as
/// NaN in the result maps. Errors are reserved for configuration and data
/// problems that must abort the run.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Shape mismatch: {0}")]
    ShapeError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Stratification failed: {0}")]
    StratificationError(String),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, EvalError>;

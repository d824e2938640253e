//! Error types for the hima library.

use thiserror::Error;

/// Error raised by an external estimation collaborator.
///
/// Collaborators report failures (non-convergence, singular covariates,
/// degenerate input) through this boxed type; the dispatcher forwards them
/// without wrapping or reinterpreting them.
pub type EstimatorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum HimaError {
    #[error("Invalid value '{value}' for {parameter}: expected one of {expected}")]
    InvalidEnum {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Malformed model specification: {0}")]
    MalformedSpec(String),

    #[error("Missing column '{0}' in phenotype table")]
    MissingColumn(String),

    #[error("Unsupported family combination: outcome '{outcome}', mediator '{mediator}'")]
    UnsupportedCombination { outcome: String, mediator: String },

    #[error(transparent)]
    Estimator(EstimatorError),

    #[error("No estimator registered for the {0} pipeline")]
    EstimatorUnavailable(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid variable type for column '{column}': {reason}")]
    InvalidVariableType { column: String, reason: String },

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HimaError {
    /// Wrap a collaborator failure, keeping it as the transparent source.
    pub fn estimator(err: EstimatorError) -> Self {
        HimaError::Estimator(err)
    }

    /// True if this error originated inside an estimation collaborator.
    pub fn is_estimator(&self) -> bool {
        matches!(self, HimaError::Estimator(_))
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, HimaError>;

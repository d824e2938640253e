//! Estimation adapters over the external mediation estimators.
//!
//! Each pipeline has a collaborator trait (the black-box estimator supplied by
//! the caller) and an adapter that feeds it an [`AnalysisRequest`] and tags
//! its raw output. Adapters share one contract, [`EstimationAdapter`], so the
//! dispatcher can drive any of them the same way.
//!
//! - **standard**: sure independence screening + penalized regression
//! - **compositional**: compositional-data mediation
//! - **survival**: survival-outcome mediation

pub mod compositional;
pub mod standard;
pub mod survival;

pub use compositional::{
    CompositionalAdapter, CompositionalEstimate, CompositionalEstimator, CompositionalInput,
};
pub use standard::{StandardAdapter, StandardEstimator, StandardInput};
pub use survival::{SurvivalAdapter, SurvivalEstimate, SurvivalEstimator, SurvivalInput};

use crate::data::{AnalysisRequest, StandardRow};
use crate::error::Result;
use crate::family::{OutcomeFamily, Penalty, PipelineKind};
use serde::{Deserialize, Serialize};

/// FDR cutoff handed to the compositional and survival estimators.
pub const FDR_CUTOFF: f64 = 0.05;

/// Run options shared by all adapters.
///
/// `penalty`, `top_n` and `workers` are only consumed by the standard pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationOptions {
    pub outcome_family: OutcomeFamily,
    pub penalty: Penalty,
    /// Screening size; the estimator picks its default when unset.
    pub top_n: Option<usize>,
    /// Standardize inputs immediately before estimation.
    pub scale: bool,
    /// Report progress.
    pub verbose: bool,
    /// Worker-count hint, passed through opaquely.
    pub workers: Option<usize>,
}

impl EstimationOptions {
    pub fn new(outcome_family: OutcomeFamily) -> Self {
        Self {
            outcome_family,
            penalty: Penalty::default(),
            top_n: None,
            scale: true,
            verbose: false,
            workers: None,
        }
    }
}

/// Raw estimator output, tagged by pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    Standard(Vec<StandardRow>),
    Compositional(CompositionalEstimate),
    Survival(SurvivalEstimate),
}

impl RawOutput {
    /// Pipeline that produced this output.
    pub fn kind(&self) -> PipelineKind {
        match self {
            RawOutput::Standard(_) => PipelineKind::Standard,
            RawOutput::Compositional(_) => PipelineKind::Compositional,
            RawOutput::Survival(_) => PipelineKind::Survival,
        }
    }

    /// Number of reported mediators (length of the identifier column).
    pub fn n_rows(&self) -> usize {
        match self {
            RawOutput::Standard(rows) => rows.len(),
            RawOutput::Compositional(est) => est.id.len(),
            RawOutput::Survival(est) => est.id.len(),
        }
    }
}

/// Shared contract of the three estimation adapters.
///
/// One blocking call per analysis. Estimator failures come back as
/// `HimaError::Estimator` with the original error untouched; adapters never
/// retry.
pub trait EstimationAdapter {
    /// Pipeline this adapter drives.
    fn kind(&self) -> PipelineKind;

    /// Run the wrapped estimator on `request`.
    fn estimate(&self, request: &AnalysisRequest, options: &EstimationOptions) -> Result<RawOutput>;
}

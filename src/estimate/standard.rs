//! Adapter for the standard high-dimensional mediation estimator.

use super::{EstimationAdapter, EstimationOptions, RawOutput};
use crate::data::scale::default_top_n;
use crate::data::{AnalysisRequest, Covariates, MediatorMatrix, StandardRow};
use crate::error::{EstimatorError, HimaError, Result};
use crate::family::{OutcomeFamily, Penalty, PipelineKind};
use nalgebra::DVector;

/// Inputs handed to a [`StandardEstimator`].
#[derive(Debug, Clone, Copy)]
pub struct StandardInput<'a> {
    pub exposure: &'a DVector<f64>,
    pub outcome: &'a DVector<f64>,
    pub mediators: &'a MediatorMatrix,
    pub covariates: Option<&'a Covariates>,
    pub outcome_family: OutcomeFamily,
    pub penalty: Penalty,
    pub top_n: Option<usize>,
    pub scale: bool,
    pub verbose: bool,
    pub workers: Option<usize>,
}

impl StandardInput<'_> {
    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.exposure.len()
    }

    /// Screening size: `top_n` if set, otherwise the default for the
    /// outcome family, never more than the number of mediators.
    pub fn screening_size(&self) -> usize {
        self.top_n
            .unwrap_or_else(|| default_top_n(self.n_samples(), self.outcome_family))
            .min(self.mediators.n_mediators())
    }
}

/// Screening + penalized-regression mediation estimator for gaussian or
/// count mediators.
///
/// Returns one row per mediator that survives screening and selection, so
/// the row count depends on the data.
pub trait StandardEstimator: Send + Sync {
    fn estimate(
        &self,
        input: &StandardInput<'_>,
    ) -> std::result::Result<Vec<StandardRow>, EstimatorError>;
}

/// Drives a [`StandardEstimator`].
pub struct StandardAdapter<'a> {
    estimator: &'a dyn StandardEstimator,
}

impl<'a> StandardAdapter<'a> {
    pub fn new(estimator: &'a dyn StandardEstimator) -> Self {
        Self { estimator }
    }
}

impl EstimationAdapter for StandardAdapter<'_> {
    fn kind(&self) -> PipelineKind {
        PipelineKind::Standard
    }

    fn estimate(
        &self,
        request: &AnalysisRequest,
        options: &EstimationOptions,
    ) -> Result<RawOutput> {
        let outcome = request.outcome.response().ok_or_else(|| {
            HimaError::InvalidParameter(
                "standard pipeline needs a single outcome, got a survival outcome".to_string(),
            )
        })?;

        let input = StandardInput {
            exposure: &request.exposure,
            outcome,
            mediators: &request.mediators,
            covariates: request.covariates.as_ref(),
            outcome_family: options.outcome_family,
            penalty: options.penalty,
            top_n: options.top_n,
            scale: options.scale,
            verbose: options.verbose,
            workers: options.workers,
        };

        if options.verbose {
            log::info!(
                "Standard mediation: {} samples, {} mediators, penalty {}, screening {}",
                input.n_samples(),
                request.n_mediators(),
                options.penalty,
                input.screening_size()
            );
        }

        let rows = self
            .estimator
            .estimate(&input)
            .map_err(HimaError::estimator)?;
        Ok(RawOutput::Standard(rows))
    }
}

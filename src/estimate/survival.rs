//! Adapter for the survival-outcome mediation estimator.

use super::{EstimationAdapter, EstimationOptions, RawOutput, FDR_CUTOFF};
use crate::data::{AnalysisRequest, Covariates, MediatorMatrix};
use crate::error::{EstimatorError, HimaError, Result};
use crate::family::PipelineKind;
use nalgebra::DVector;

/// Inputs handed to a [`SurvivalEstimator`].
#[derive(Debug, Clone, Copy)]
pub struct SurvivalInput<'a> {
    pub exposure: &'a DVector<f64>,
    pub covariates: Option<&'a Covariates>,
    pub mediators: &'a MediatorMatrix,
    /// Time to event or censoring.
    pub event_time: &'a DVector<f64>,
    /// 1 = event observed, 0 = censored.
    pub event_status: &'a DVector<f64>,
    pub fdr_cutoff: f64,
    pub scale: bool,
    pub verbose: bool,
}

/// Column-wise output of a survival estimator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurvivalEstimate {
    pub id: Vec<String>,
    pub alpha: Vec<f64>,
    pub alpha_se: Vec<f64>,
    pub beta: Vec<f64>,
    pub beta_se: Vec<f64>,
    /// The estimator's own significance statistic.
    pub pvalue: Vec<f64>,
}

/// Mediation estimator for time-to-event outcomes.
pub trait SurvivalEstimator: Send + Sync {
    fn estimate(
        &self,
        input: &SurvivalInput<'_>,
    ) -> std::result::Result<SurvivalEstimate, EstimatorError>;
}

/// Drives a [`SurvivalEstimator`] with the fixed 0.05 cutoff.
pub struct SurvivalAdapter<'a> {
    estimator: &'a dyn SurvivalEstimator,
}

impl<'a> SurvivalAdapter<'a> {
    pub fn new(estimator: &'a dyn SurvivalEstimator) -> Self {
        Self { estimator }
    }
}

impl EstimationAdapter for SurvivalAdapter<'_> {
    fn kind(&self) -> PipelineKind {
        PipelineKind::Survival
    }

    fn estimate(
        &self,
        request: &AnalysisRequest,
        options: &EstimationOptions,
    ) -> Result<RawOutput> {
        let (status, time) = request.outcome.survival().ok_or_else(|| {
            HimaError::InvalidParameter(
                "survival pipeline needs Surv(status, time) as the outcome".to_string(),
            )
        })?;

        let input = SurvivalInput {
            exposure: &request.exposure,
            covariates: request.covariates.as_ref(),
            mediators: &request.mediators,
            event_time: time,
            event_status: status,
            fdr_cutoff: FDR_CUTOFF,
            scale: options.scale,
            verbose: options.verbose,
        };

        if options.verbose {
            let events = status.iter().filter(|&&s| s == 1.0).count();
            log::info!(
                "Survival mediation: {} samples ({} events), {} mediators",
                request.n_samples(),
                events,
                request.n_mediators()
            );
        }

        let estimate = self
            .estimator
            .estimate(&input)
            .map_err(HimaError::estimator)?;
        Ok(RawOutput::Survival(estimate))
    }
}

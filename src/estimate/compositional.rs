//! Adapter for the compositional-data mediation estimator.

use super::{EstimationAdapter, EstimationOptions, RawOutput, FDR_CUTOFF};
use crate::data::{AnalysisRequest, Covariates, MediatorMatrix};
use crate::error::{EstimatorError, HimaError, Result};
use crate::family::PipelineKind;
use nalgebra::DVector;

/// Inputs handed to a [`CompositionalEstimator`].
#[derive(Debug, Clone, Copy)]
pub struct CompositionalInput<'a> {
    pub exposure: &'a DVector<f64>,
    pub outcome: &'a DVector<f64>,
    /// Relative abundances (samples × taxa).
    pub mediators: &'a MediatorMatrix,
    pub covariates: Option<&'a Covariates>,
    pub fdr_cutoff: f64,
    pub scale: bool,
}

/// Column-wise output of a compositional estimator.
///
/// Only mediators passing `fdr_cutoff` are reported; which ones is the
/// estimator's decision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionalEstimate {
    pub id: Vec<String>,
    pub alpha: Vec<f64>,
    pub alpha_se: Vec<f64>,
    pub beta: Vec<f64>,
    pub beta_se: Vec<f64>,
    /// FDP-controlled p-values.
    pub p_fdp: Vec<f64>,
}

/// Mediation estimator for compositional (relative-abundance) mediators.
pub trait CompositionalEstimator: Send + Sync {
    fn estimate(
        &self,
        input: &CompositionalInput<'_>,
    ) -> std::result::Result<CompositionalEstimate, EstimatorError>;
}

/// Drives a [`CompositionalEstimator`] with the fixed 0.05 cutoff.
pub struct CompositionalAdapter<'a> {
    estimator: &'a dyn CompositionalEstimator,
}

impl<'a> CompositionalAdapter<'a> {
    pub fn new(estimator: &'a dyn CompositionalEstimator) -> Self {
        Self { estimator }
    }
}

impl EstimationAdapter for CompositionalAdapter<'_> {
    fn kind(&self) -> PipelineKind {
        PipelineKind::Compositional
    }

    fn estimate(
        &self,
        request: &AnalysisRequest,
        options: &EstimationOptions,
    ) -> Result<RawOutput> {
        let outcome = request.outcome.response().ok_or_else(|| {
            HimaError::InvalidParameter(
                "compositional pipeline needs a single outcome, got a survival outcome".to_string(),
            )
        })?;

        let input = CompositionalInput {
            exposure: &request.exposure,
            outcome,
            mediators: &request.mediators,
            covariates: request.covariates.as_ref(),
            fdr_cutoff: FDR_CUTOFF,
            scale: options.scale,
        };

        if options.verbose {
            log::info!(
                "Compositional mediation: {} samples, {} taxa, FDR cutoff {}",
                request.n_samples(),
                request.n_mediators(),
                FDR_CUTOFF
            );
        }

        let estimate = self
            .estimator
            .estimate(&input)
            .map_err(HimaError::estimator)?;
        Ok(RawOutput::Compositional(estimate))
    }
}

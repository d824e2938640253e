//! Dispatcher: parse → route → slice → estimate → assemble.

use crate::assemble::assemble;
use crate::data::{AnalysisRequest, MediationTable, MediatorMatrix, ModelSpec, PhenotypeTable};
use crate::error::{HimaError, Result};
use crate::estimate::{
    CompositionalAdapter, CompositionalEstimator, EstimationAdapter, EstimationOptions,
    StandardAdapter, StandardEstimator, SurvivalAdapter, SurvivalEstimator,
};
use crate::family::{route, MediatorFamily, PipelineKind};
use crate::pipeline::MediationConfig;

/// Entry point for mediation runs.
///
/// Holds the estimators for each pipeline and nothing else; every run works
/// on its own sliced copy of the inputs, so one dispatcher can serve
/// concurrent callers.
///
/// ```no_run
/// # use hima::prelude::*;
/// # fn demo(
/// #     est: impl StandardEstimator + 'static,
/// #     pheno: &PhenotypeTable,
/// #     m: &MediatorMatrix,
/// # ) -> hima::Result<()> {
/// let table = Dispatcher::new()
///     .with_standard(est)
///     .run("Y ~ X + Sex + Age", pheno, m, "gaussian", "gaussian", "MCP", None, true, false)?;
/// println!("{}", table.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Dispatcher {
    standard: Option<Box<dyn StandardEstimator>>,
    compositional: Option<Box<dyn CompositionalEstimator>>,
    survival: Option<Box<dyn SurvivalEstimator>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("standard", &self.standard.is_some())
            .field("compositional", &self.compositional.is_some())
            .field("survival", &self.survival.is_some())
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher with no estimators registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the standard (screening + penalized regression) estimator.
    pub fn with_standard(mut self, estimator: impl StandardEstimator + 'static) -> Self {
        self.standard = Some(Box::new(estimator));
        self
    }

    /// Register the compositional estimator.
    pub fn with_compositional(mut self, estimator: impl CompositionalEstimator + 'static) -> Self {
        self.compositional = Some(Box::new(estimator));
        self
    }

    /// Register the survival estimator.
    pub fn with_survival(mut self, estimator: impl SurvivalEstimator + 'static) -> Self {
        self.survival = Some(Box::new(estimator));
        self
    }

    /// Run a mediation analysis from raw parameter values.
    ///
    /// Family and penalty names are validated against their closed sets
    /// before anything else happens.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        spec: &str,
        phenotype: &PhenotypeTable,
        mediators: &MediatorMatrix,
        outcome_family: &str,
        mediator_family: &str,
        penalty: &str,
        top_n: Option<usize>,
        scale: bool,
        verbose: bool,
    ) -> Result<MediationTable> {
        let config = MediationConfig {
            outcome_family: outcome_family.to_string(),
            mediator_family: mediator_family.to_string(),
            penalty: penalty.to_string(),
            top_n,
            scale,
            verbose,
            ..Default::default()
        };
        self.run_config(spec, phenotype, mediators, &config)
    }

    /// Run a mediation analysis with a loaded configuration.
    pub fn run_config(
        &self,
        spec: &str,
        phenotype: &PhenotypeTable,
        mediators: &MediatorMatrix,
        config: &MediationConfig,
    ) -> Result<MediationTable> {
        let (mediator_family, options) = config.resolve()?;
        let spec = ModelSpec::parse(spec, options.outcome_family.is_survival())?;
        self.run_spec(&spec, phenotype, mediators, mediator_family, &options)
    }

    /// Run a mediation analysis from an already-structured specification.
    pub fn run_spec(
        &self,
        spec: &ModelSpec,
        phenotype: &PhenotypeTable,
        mediators: &MediatorMatrix,
        mediator_family: MediatorFamily,
        options: &EstimationOptions,
    ) -> Result<MediationTable> {
        if spec.is_survival() != options.outcome_family.is_survival() {
            return Err(HimaError::MalformedSpec(format!(
                "'{}' does not match the {} outcome family",
                spec, options.outcome_family
            )));
        }

        let kind = route(options.outcome_family, mediator_family);
        if kind == PipelineKind::Survival && mediator_family != MediatorFamily::Gaussian {
            log::warn!(
                "mediator family '{}' is ignored for survival outcomes",
                mediator_family
            );
        }
        log::debug!(
            "Routed {} outcome / {} mediators to the {} pipeline",
            options.outcome_family,
            mediator_family,
            kind
        );

        let adapter = self.adapter(kind)?;
        let request =
            AnalysisRequest::from_spec(spec, phenotype, mediators, options.outcome_family)?;
        request.validate()?;

        if options.verbose {
            log::info!(
                "Running {} pipeline for '{}': {} samples, {} mediators, {} covariate columns",
                kind,
                spec,
                request.n_samples(),
                request.n_mediators(),
                request.n_covariates()
            );
        }

        let raw = adapter.estimate(&request, options)?;
        let table = assemble(kind, raw)?;

        if options.verbose {
            log::info!("{} pipeline reported {} mediators", kind, table.len());
        }
        log::debug!("Assembled {} rows x {} columns", table.len(), table.n_columns());

        Ok(table)
    }

    /// Adapter for a routed pipeline.
    fn adapter(&self, kind: PipelineKind) -> Result<Box<dyn EstimationAdapter + '_>> {
        let unavailable = || HimaError::EstimatorUnavailable(kind.name().to_string());
        Ok(match kind {
            PipelineKind::Standard => Box::new(StandardAdapter::new(
                self.standard.as_deref().ok_or_else(unavailable)?,
            )),
            PipelineKind::Compositional => Box::new(CompositionalAdapter::new(
                self.compositional.as_deref().ok_or_else(unavailable)?,
            )),
            PipelineKind::Survival => Box::new(SurvivalAdapter::new(
                self.survival.as_deref().ok_or_else(unavailable)?,
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StandardRow;
    use crate::error::EstimatorError;
    use crate::estimate::{
        CompositionalEstimate, CompositionalInput, StandardInput, SurvivalEstimate, SurvivalInput,
    };

    struct OneRow;

    impl StandardEstimator for OneRow {
        fn estimate(
            &self,
            input: &StandardInput<'_>,
        ) -> std::result::Result<Vec<StandardRow>, EstimatorError> {
            Ok(vec![StandardRow {
                mediator: input.mediators.mediator_ids()[0].clone(),
                alpha: 0.5,
                beta: 0.4,
                gamma: 1.0,
                alpha_beta: 0.2,
                percent_total: 20.0,
                bonferroni_p: 0.02,
                bh_fdr: 0.01,
            }])
        }
    }

    struct NoTaxa;

    impl CompositionalEstimator for NoTaxa {
        fn estimate(
            &self,
            _input: &CompositionalInput<'_>,
        ) -> std::result::Result<CompositionalEstimate, EstimatorError> {
            Ok(CompositionalEstimate::default())
        }
    }

    struct NoCpgs;

    impl SurvivalEstimator for NoCpgs {
        fn estimate(
            &self,
            _input: &SurvivalInput<'_>,
        ) -> std::result::Result<SurvivalEstimate, EstimatorError> {
            Ok(SurvivalEstimate::default())
        }
    }

    fn create_test_data() -> (PhenotypeTable, MediatorMatrix) {
        let phenotype = PhenotypeTable::new()
            .with_continuous("Y", &[1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap()
            .with_continuous("X", &[0.0, 1.0, 0.0, 1.0, 1.0])
            .unwrap()
            .with_continuous("Status", &[1.0, 0.0, 1.0, 1.0, 0.0])
            .unwrap()
            .with_continuous("Time", &[2.0, 5.0, 1.0, 3.0, 8.0])
            .unwrap();
        let mediators = MediatorMatrix::from_row_slice(
            5,
            2,
            &[0.1, 0.9, 0.2, 0.8, 0.3, 0.7, 0.4, 0.6, 0.5, 0.5],
            vec!["m1".into(), "m2".into()],
        )
        .unwrap();
        (phenotype, mediators)
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new()
            .with_standard(OneRow)
            .with_compositional(NoTaxa)
            .with_survival(NoCpgs)
    }

    #[test]
    fn test_run_standard() {
        let (pheno, med) = create_test_data();
        let table = dispatcher()
            .run(
                "Y ~ X",
                &pheno,
                &med,
                "gaussian",
                "negbin",
                "lasso",
                None,
                true,
                false,
            )
            .unwrap();
        assert_eq!(table.pipeline, PipelineKind::Standard);
        assert_eq!(table.row_names(), vec!["m1"]);
    }

    #[test]
    fn test_run_compositional_empty() {
        let (pheno, med) = create_test_data();
        let table = dispatcher().run(
            "Y ~ X",
            &pheno,
            &med,
            "binomial",
            "compositional",
            "DBlasso",
            None,
            true,
            false,
        );
        // Y is not 0/1
        assert!(matches!(table, Err(HimaError::InvalidVariableType { .. })));

        let table = dispatcher()
            .run(
                "Y ~ X",
                &pheno,
                &med,
                "gaussian",
                "compositional",
                "DBlasso",
                None,
                true,
                false,
            )
            .unwrap();
        assert_eq!(table.pipeline, PipelineKind::Compositional);
        assert!(table.is_empty());
        assert_eq!(table.n_columns(), 5);
    }

    #[test]
    fn test_run_survival_ignores_mediator_family() {
        let (pheno, med) = create_test_data();
        for mediator_family in ["gaussian", "negbin", "compositional"] {
            let table = dispatcher()
                .run(
                    "Surv(Status, Time) ~ X",
                    &pheno,
                    &med,
                    "survival",
                    mediator_family,
                    "DBlasso",
                    None,
                    true,
                    false,
                )
                .unwrap();
            assert_eq!(table.pipeline, PipelineKind::Survival);
        }
    }

    #[test]
    fn test_missing_estimator() {
        let (pheno, med) = create_test_data();
        let err = Dispatcher::new()
            .with_standard(OneRow)
            .run(
                "Y ~ X",
                &pheno,
                &med,
                "gaussian",
                "compositional",
                "DBlasso",
                None,
                true,
                false,
            )
            .unwrap_err();
        assert!(matches!(err, HimaError::EstimatorUnavailable(k) if k == "compositional"));
    }

    #[test]
    fn test_spec_family_mismatch() {
        let (pheno, med) = create_test_data();
        let spec = ModelSpec::parse("Y ~ X", false).unwrap();
        let options = EstimationOptions::new(crate::family::OutcomeFamily::Survival);
        let err = dispatcher()
            .run_spec(&spec, &pheno, &med, MediatorFamily::Gaussian, &options)
            .unwrap_err();
        assert!(matches!(err, HimaError::MalformedSpec(_)));
    }

    #[test]
    fn test_debug_lists_registered_estimators() {
        let dbg = format!("{:?}", Dispatcher::new().with_survival(NoCpgs));
        assert!(dbg.contains("survival: true"));
        assert!(dbg.contains("standard: false"));
    }
}

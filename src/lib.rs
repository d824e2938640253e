//! High-Dimensional Mediation Analysis (HIMA) dispatch library
//!
//! This library estimates and tests the indirect effect of an exposure on an
//! outcome through each of many candidate mediators (CpG sites, genes,
//! microbial taxa), where the number of mediators far exceeds the number of
//! samples.
//!
//! # Overview
//!
//! The library is the dispatch layer between a model specification and the
//! estimators that do the numerical work:
//!
//! - **data**: Core data structures (ModelSpec, PhenotypeTable, MediatorMatrix, MediationTable)
//! - **family**: Outcome/mediator families, penalties, and pipeline routing
//! - **estimate**: Estimator traits and the adapters that drive them
//! - **assemble**: Normalizing raw estimator output into one table schema
//! - **pipeline**: Dispatcher and YAML run configuration
//!
//! Three pipelines are supported:
//!
//! | outcome family | mediator family | pipeline |
//! |---|---|---|
//! | gaussian, binomial | gaussian, negbin | standard |
//! | gaussian, binomial | compositional | compositional |
//! | survival | any | survival |
//!
//! The estimators themselves are supplied by the caller through
//! [`StandardEstimator`](estimate::StandardEstimator),
//! [`CompositionalEstimator`](estimate::CompositionalEstimator) and
//! [`SurvivalEstimator`](estimate::SurvivalEstimator).
//!
//! # Example
//!
//! ```no_run
//! use hima::prelude::*;
//!
//! # fn demo(phenotype: PhenotypeTable, mediators: MediatorMatrix,
//! #         estimator: impl StandardEstimator + 'static) -> hima::Result<()> {
//! let table = Dispatcher::new()
//!     .with_standard(estimator)
//!     .run(
//!         "Y ~ X + Sex + Age",
//!         &phenotype,
//!         &mediators,
//!         "gaussian",
//!         "gaussian",
//!         "MCP",
//!         None,
//!         true,
//!         false,
//!     )?;
//!
//! for (name, p) in table.row_names().iter().zip(table.p_values()) {
//!     println!("{name}\t{p:.3e}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod data;
pub mod error;
pub mod estimate;
pub mod family;
pub mod pipeline;

pub use error::{HimaError, Result};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::assemble::assemble;
    pub use crate::data::scale::{default_top_n, standardize_columns, standardize_vector};
    pub use crate::data::{
        AnalysisOutcome, AnalysisRequest, Covariates, EffectRow, MediationRows, MediationTable,
        MediatorMatrix, ModelSpec, OutcomeRole, PhenotypeTable, ResultSummary, StandardRow,
        Variable, VariableType,
    };
    pub use crate::error::{EstimatorError, HimaError, Result};
    pub use crate::estimate::{
        CompositionalEstimate, CompositionalEstimator, CompositionalInput, EstimationAdapter,
        EstimationOptions, RawOutput, StandardEstimator, StandardInput, SurvivalEstimate,
        SurvivalEstimator, SurvivalInput, FDR_CUTOFF,
    };
    pub use crate::family::{route, MediatorFamily, OutcomeFamily, Penalty, PipelineKind};
    pub use crate::pipeline::{Dispatcher, MediationConfig};
}

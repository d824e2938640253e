//! Data structures for mediation analysis.

mod mediators;
mod phenotype;
mod request;
mod result;
pub mod scale;
mod spec;

pub use mediators::MediatorMatrix;
pub use phenotype::{PhenotypeTable, Variable, VariableType};
pub use request::{AnalysisOutcome, AnalysisRequest, Covariates};
pub use result::{
    EffectRow, MediationRows, MediationTable, ResultSummary, StandardRow, EFFECT_COLUMNS,
    EFFECT_LABELS, STANDARD_COLUMNS, STANDARD_LABELS,
};
pub use spec::{ModelSpec, OutcomeRole};

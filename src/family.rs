//! Outcome/mediator families, penalties, and pipeline routing.
//!
//! Every enumerated parameter of a run is a closed sum type. String values
//! are checked once, at the boundary, through `FromStr`; control flow past
//! that point only ever sees the typed variants.

use crate::error::{HimaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distribution family of the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeFamily {
    Gaussian,
    Binomial,
    Survival,
}

impl OutcomeFamily {
    pub const ALL: [OutcomeFamily; 3] = [Self::Gaussian, Self::Binomial, Self::Survival];
    const EXPECTED: &'static str = "gaussian, binomial, survival";

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Binomial => "binomial",
            Self::Survival => "survival",
        }
    }

    /// Whether the left-hand side of the model carries a (status, time) pair.
    pub fn is_survival(&self) -> bool {
        matches!(self, Self::Survival)
    }
}

impl FromStr for OutcomeFamily {
    type Err = HimaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gaussian" => Ok(Self::Gaussian),
            "binomial" => Ok(Self::Binomial),
            "survival" => Ok(Self::Survival),
            _ => Err(HimaError::InvalidEnum {
                parameter: "outcome family",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for OutcomeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Data type of the mediator matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediatorFamily {
    /// Continuous mediators (e.g. methylation M-values).
    Gaussian,
    /// Over-dispersed counts (e.g. RNA-seq).
    Negbin,
    /// Relative abundances (e.g. microbiome).
    Compositional,
}

impl MediatorFamily {
    pub const ALL: [MediatorFamily; 3] = [Self::Gaussian, Self::Negbin, Self::Compositional];
    const EXPECTED: &'static str = "gaussian, negbin, compositional";

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Negbin => "negbin",
            Self::Compositional => "compositional",
        }
    }
}

impl Default for MediatorFamily {
    fn default() -> Self {
        Self::Gaussian
    }
}

impl FromStr for MediatorFamily {
    type Err = HimaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gaussian" => Ok(Self::Gaussian),
            "negbin" => Ok(Self::Negbin),
            "compositional" => Ok(Self::Compositional),
            _ => Err(HimaError::InvalidEnum {
                parameter: "mediator family",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for MediatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Penalty used by the standard pipeline after screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Penalty {
    /// De-biased lasso.
    #[serde(rename = "DBlasso", alias = "de-biased-lasso")]
    DebiasedLasso,
    #[serde(rename = "MCP")]
    Mcp,
    #[serde(rename = "SCAD")]
    Scad,
    #[serde(rename = "lasso")]
    Lasso,
}

impl Penalty {
    pub const ALL: [Penalty; 4] = [Self::DebiasedLasso, Self::Mcp, Self::Scad, Self::Lasso];
    const EXPECTED: &'static str = "DBlasso, MCP, SCAD, lasso";

    pub fn name(&self) -> &'static str {
        match self {
            Self::DebiasedLasso => "DBlasso",
            Self::Mcp => "MCP",
            Self::Scad => "SCAD",
            Self::Lasso => "lasso",
        }
    }
}

impl Default for Penalty {
    fn default() -> Self {
        Self::DebiasedLasso
    }
}

impl FromStr for Penalty {
    type Err = HimaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dblasso" | "de-biased-lasso" => Ok(Self::DebiasedLasso),
            "mcp" => Ok(Self::Mcp),
            "scad" => Ok(Self::Scad),
            "lasso" => Ok(Self::Lasso),
            _ => Err(HimaError::InvalidEnum {
                parameter: "penalty",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The estimation pipeline selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineKind {
    /// Screening + penalized regression for continuous/count mediators.
    Standard,
    /// Compositional-data mediation.
    Compositional,
    /// Survival-outcome mediation.
    Survival,
}

impl PipelineKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Compositional => "compositional",
            Self::Survival => "survival",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Select the estimation pipeline for an (outcome, mediator) family pair.
///
/// A survival outcome short-circuits before the mediator family is looked at,
/// so every pair of enumerated values resolves to exactly one pipeline.
pub fn route(outcome: OutcomeFamily, mediator: MediatorFamily) -> PipelineKind {
    match (outcome, mediator) {
        (OutcomeFamily::Survival, _) => PipelineKind::Survival,
        (
            OutcomeFamily::Gaussian | OutcomeFamily::Binomial,
            MediatorFamily::Gaussian | MediatorFamily::Negbin,
        ) => PipelineKind::Standard,
        (OutcomeFamily::Gaussian | OutcomeFamily::Binomial, MediatorFamily::Compositional) => {
            PipelineKind::Compositional
        }
    }
}

/// Route from raw family names.
///
/// Names outside the closed sets fail with `UnsupportedCombination`, naming
/// both inputs. The dispatcher validates names first, so it never reaches
/// that branch.
pub fn route_names(outcome: &str, mediator: &str) -> Result<PipelineKind> {
    match (outcome.parse::<OutcomeFamily>(), mediator.parse::<MediatorFamily>()) {
        (Ok(o), Ok(m)) => Ok(route(o, m)),
        _ => Err(HimaError::UnsupportedCombination {
            outcome: outcome.to_string(),
            mediator: mediator.to_string(),
        }),
    }
}

//! Model specification parsing.
//!
//! A model specification names the semantic roles of phenotype columns:
//!
//! - `Y ~ X + Sex + Age` - outcome `Y`, exposure `X`, covariates `Sex`, `Age`
//! - `Surv(Status, Time) ~ X + Sex` - survival outcome (status first, time
//!   second), exposure `X`, covariate `Sex`
//!
//! The exposure is always the first variable on the right-hand side.

use crate::error::{HimaError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn surv_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Surv\s*\((.*)\)$").expect("valid Surv pattern"))
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z.][A-Za-z0-9._]*$").expect("valid name pattern"))
}

/// The outcome role(s) on the left-hand side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeRole {
    /// A single outcome column.
    Single(String),
    /// Event status and time-to-event columns, in that order.
    Survival { status: String, time: String },
}

impl OutcomeRole {
    /// Column names of the outcome role, in declared order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            OutcomeRole::Single(y) => vec![y.as_str()],
            OutcomeRole::Survival { status, time } => vec![status.as_str(), time.as_str()],
        }
    }
}

impl std::fmt::Display for OutcomeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeRole::Single(y) => write!(f, "{}", y),
            OutcomeRole::Survival { status, time } => write!(f, "Surv({}, {})", status, time),
        }
    }
}

/// A parsed model specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Outcome column(s).
    pub outcome: OutcomeRole,
    /// Exposure column.
    pub exposure: String,
    /// Covariate columns, in declared order.
    pub covariates: Vec<String>,
    /// Original specification string.
    pub spec_str: String,
}

impl ModelSpec {
    /// Build a specification for a single (non-survival) outcome.
    pub fn new(outcome: &str, exposure: &str, covariates: &[&str]) -> Result<Self> {
        let outcome = check_name(outcome, "outcome")?;
        Self::from_roles(OutcomeRole::Single(outcome), exposure, covariates)
    }

    /// Build a specification for a survival outcome.
    pub fn survival(status: &str, time: &str, exposure: &str, covariates: &[&str]) -> Result<Self> {
        let outcome = OutcomeRole::Survival {
            status: check_name(status, "survival status")?,
            time: check_name(time, "survival time")?,
        };
        Self::from_roles(outcome, exposure, covariates)
    }

    fn from_roles(outcome: OutcomeRole, exposure: &str, covariates: &[&str]) -> Result<Self> {
        let exposure = check_name(exposure, "exposure")?;
        let covariates = covariates
            .iter()
            .map(|c| check_name(c, "covariate"))
            .collect::<Result<Vec<_>>>()?;
        let mut spec = Self {
            outcome,
            exposure,
            covariates,
            spec_str: String::new(),
        };
        spec.spec_str = spec.to_string();
        Ok(spec)
    }

    /// Parse a specification string.
    ///
    /// With `is_survival` the left-hand side must be `Surv(status, time)`;
    /// otherwise it must be a single column name.
    ///
    /// # Examples
    /// ```
    /// use hima::data::ModelSpec;
    /// let spec = ModelSpec::parse("Y ~ X + Sex + Age", false).unwrap();
    /// assert_eq!(spec.exposure, "X");
    /// assert_eq!(spec.covariates, vec!["Sex", "Age"]);
    /// ```
    pub fn parse(spec: &str, is_survival: bool) -> Result<Self> {
        let spec_str = spec.to_string();

        let (lhs, rhs) = spec.split_once('~').ok_or_else(|| {
            HimaError::MalformedSpec("specification must contain '~'".to_string())
        })?;
        if rhs.contains('~') {
            return Err(HimaError::MalformedSpec(
                "specification must contain a single '~'".to_string(),
            ));
        }

        let lhs = lhs.trim();
        if lhs.is_empty() {
            return Err(HimaError::MalformedSpec(
                "left-hand side is empty".to_string(),
            ));
        }

        let outcome = if is_survival {
            parse_survival_lhs(lhs)?
        } else {
            if surv_regex().is_match(lhs) {
                return Err(HimaError::MalformedSpec(format!(
                    "'{}' is a survival outcome; use the survival outcome family",
                    lhs
                )));
            }
            OutcomeRole::Single(check_name(lhs, "outcome")?)
        };

        let mut vars: Vec<String> = Vec::new();
        for term in rhs.split('+').map(|s| s.trim()) {
            // "1" is an explicit intercept, not a variable
            if term.is_empty() || term == "1" {
                continue;
            }
            vars.push(check_name(term, "right-hand side term")?);
        }

        if vars.is_empty() {
            return Err(HimaError::MalformedSpec(
                "right-hand side has no variables (an exposure is required)".to_string(),
            ));
        }

        let exposure = vars.remove(0);

        Ok(Self {
            outcome,
            exposure,
            covariates: vars,
            spec_str,
        })
    }

    /// Whether the outcome is a (status, time) survival pair.
    pub fn is_survival(&self) -> bool {
        matches!(self.outcome, OutcomeRole::Survival { .. })
    }

    /// Every column the specification references, in role order:
    /// outcome(s), exposure, covariates.
    pub fn variables(&self) -> Vec<&str> {
        let mut vars = self.outcome.names();
        vars.push(self.exposure.as_str());
        vars.extend(self.covariates.iter().map(|c| c.as_str()));
        vars
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ {}", self.outcome, self.exposure)?;
        for c in &self.covariates {
            write!(f, " + {}", c)?;
        }
        Ok(())
    }
}

fn parse_survival_lhs(lhs: &str) -> Result<OutcomeRole> {
    let caps = surv_regex().captures(lhs).ok_or_else(|| {
        HimaError::MalformedSpec(format!(
            "survival outcome must be written Surv(status, time), got '{}'",
            lhs
        ))
    })?;
    let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let tokens: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
    if tokens.iter().any(|s| s.is_empty()) {
        return Err(HimaError::MalformedSpec(format!(
            "survival outcome has an empty token in '{}'",
            lhs
        )));
    }
    if tokens.len() != 2 {
        return Err(HimaError::MalformedSpec(format!(
            "survival outcome needs exactly two tokens (status, time), got {}",
            tokens.len()
        )));
    }
    Ok(OutcomeRole::Survival {
        status: check_name(tokens[0], "survival status")?,
        time: check_name(tokens[1], "survival time")?,
    })
}

fn check_name(name: &str, role: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HimaError::MalformedSpec(format!("{} name is empty", role)));
    }
    if !name_regex().is_match(name) {
        return Err(HimaError::MalformedSpec(format!(
            "invalid {} '{}': only plain column names are supported",
            role, name
        )));
    }
    Ok(name.to_string())
}

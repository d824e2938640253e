//! Serializable run configuration.

use crate::error::{HimaError, Result};
use crate::estimate::EstimationOptions;
use crate::family::{MediatorFamily, OutcomeFamily, Penalty};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one mediation run, as written in a YAML file.
///
/// Enumerated fields are kept as raw strings and checked against their
/// closed sets by [`MediationConfig::resolve`], so a bad value fails with
/// `InvalidEnum` exactly as it would through the call interface.
///
/// ```yaml
/// name: methylation-smoking
/// outcome_family: gaussian
/// mediator_family: gaussian
/// penalty: MCP
/// top_n: 50
/// scale: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediationConfig {
    /// Name of the analysis.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// gaussian | binomial | survival
    pub outcome_family: String,
    /// gaussian | negbin | compositional
    pub mediator_family: String,
    /// DBlasso | MCP | SCAD | lasso
    pub penalty: String,
    pub top_n: Option<usize>,
    pub scale: bool,
    pub verbose: bool,
    pub workers: Option<usize>,
}

impl Default for MediationConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            description: None,
            outcome_family: OutcomeFamily::Gaussian.name().to_string(),
            mediator_family: MediatorFamily::Gaussian.name().to_string(),
            penalty: Penalty::DebiasedLasso.name().to_string(),
            top_n: None,
            scale: true,
            verbose: false,
            workers: None,
        }
    }
}

impl MediationConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(HimaError::from)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(HimaError::from)
    }

    /// Validate the enumerated fields and build estimation options.
    pub fn resolve(&self) -> Result<(MediatorFamily, EstimationOptions)> {
        let outcome_family: OutcomeFamily = self.outcome_family.parse()?;
        let mediator_family: MediatorFamily = self.mediator_family.parse()?;
        let penalty: Penalty = self.penalty.parse()?;

        if self.top_n == Some(0) {
            return Err(HimaError::InvalidParameter(
                "top_n must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(HimaError::InvalidParameter(
                "workers must be at least 1".to_string(),
            ));
        }

        Ok((
            mediator_family,
            EstimationOptions {
                outcome_family,
                penalty,
                top_n: self.top_n,
                scale: self.scale,
                verbose: self.verbose,
                workers: self.workers,
            },
        ))
    }
}

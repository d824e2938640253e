//! Result table types for mediation analysis.

use crate::error::Result;
use crate::family::PipelineKind;
use serde::{Deserialize, Serialize};

/// Column names of a standard-pipeline table.
pub const STANDARD_COLUMNS: [&str; 7] = [
    "alpha",
    "beta",
    "gamma",
    "alpha*beta",
    "% total effect",
    "Bonferroni.p",
    "BH.FDR",
];

/// Column descriptions of a standard-pipeline table.
pub const STANDARD_LABELS: [&str; 7] = [
    "Effect of exposure on mediator",
    "Effect of mediator on outcome",
    "Total effect of exposure on outcome",
    "Mediation (indirect) effect",
    "Percent of mediation effect out of the total effect",
    "Bonferroni adjusted p value",
    "Benjamini-Hochberg False Discovery Rate",
];

/// Column names of a compositional or survival table.
pub const EFFECT_COLUMNS: [&str; 5] = ["alpha", "alpha_se", "beta", "beta_se", "p"];

/// Column descriptions of a compositional or survival table.
pub const EFFECT_LABELS: [&str; 5] = [
    "Effect of exposure on mediator",
    "Standard error of the effect of exposure on mediator",
    "Effect of mediator on outcome",
    "Standard error of the effect of mediator on outcome",
    "Mediation p value",
];

/// One selected mediator from the standard pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRow {
    /// Mediator identifier.
    pub mediator: String,
    /// Exposure → mediator coefficient.
    pub alpha: f64,
    /// Mediator → outcome coefficient.
    pub beta: f64,
    /// Total exposure → outcome effect.
    pub gamma: f64,
    /// Indirect effect.
    pub alpha_beta: f64,
    /// Percent of the total effect that is mediated.
    pub percent_total: f64,
    /// Bonferroni-adjusted p-value.
    pub bonferroni_p: f64,
    /// Benjamini-Hochberg FDR.
    pub bh_fdr: f64,
}

impl StandardRow {
    /// Values in column order.
    pub fn values(&self) -> [f64; 7] {
        [
            self.alpha,
            self.beta,
            self.gamma,
            self.alpha_beta,
            self.percent_total,
            self.bonferroni_p,
            self.bh_fdr,
        ]
    }
}

/// One reported mediator from the compositional or survival pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRow {
    /// Mediator identifier.
    pub mediator: String,
    pub alpha: f64,
    pub alpha_se: f64,
    pub beta: f64,
    pub beta_se: f64,
    /// Significance as reported by the estimator. Not comparable across
    /// pipelines: compositional reports an FDR-controlled value, survival
    /// its own statistic.
    pub p: f64,
}

impl EffectRow {
    /// Values in column order.
    pub fn values(&self) -> [f64; 5] {
        [self.alpha, self.alpha_se, self.beta, self.beta_se, self.p]
    }
}

/// Rows of a result table, by schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediationRows {
    Standard(Vec<StandardRow>),
    Effects(Vec<EffectRow>),
}

/// The assembled result of one mediation analysis.
///
/// Rows are keyed by mediator identifier. `variable_labels` holds one
/// human-readable description per data column, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediationTable {
    /// Pipeline that produced the rows.
    pub pipeline: PipelineKind,
    /// Result rows, in estimator order.
    pub rows: MediationRows,
    /// Column descriptions.
    pub variable_labels: Vec<String>,
}

impl MediationTable {
    /// Table with the standard seven-column schema.
    pub fn standard(rows: Vec<StandardRow>) -> Self {
        Self {
            pipeline: PipelineKind::Standard,
            rows: MediationRows::Standard(rows),
            variable_labels: STANDARD_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Table with the five-column effect schema.
    pub fn effects(pipeline: PipelineKind, rows: Vec<EffectRow>) -> Self {
        Self {
            pipeline,
            rows: MediationRows::Effects(rows),
            variable_labels: EFFECT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match &self.rows {
            MediationRows::Standard(r) => r.len(),
            MediationRows::Effects(r) => r.len(),
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Data column names (row names excluded).
    pub fn column_names(&self) -> &'static [&'static str] {
        match &self.rows {
            MediationRows::Standard(_) => &STANDARD_COLUMNS,
            MediationRows::Effects(_) => &EFFECT_COLUMNS,
        }
    }

    /// Number of data columns.
    pub fn n_columns(&self) -> usize {
        self.column_names().len()
    }

    /// Mediator identifiers, in row order.
    pub fn row_names(&self) -> Vec<&str> {
        match &self.rows {
            MediationRows::Standard(r) => r.iter().map(|row| row.mediator.as_str()).collect(),
            MediationRows::Effects(r) => r.iter().map(|row| row.mediator.as_str()).collect(),
        }
    }

    /// Numeric values of row `i` in column order.
    pub fn row_values(&self, i: usize) -> Option<Vec<f64>> {
        match &self.rows {
            MediationRows::Standard(r) => r.get(i).map(|row| row.values().to_vec()),
            MediationRows::Effects(r) => r.get(i).map(|row| row.values().to_vec()),
        }
    }

    /// The significance column: `BH.FDR` for the standard schema, `p` otherwise.
    pub fn p_values(&self) -> Vec<f64> {
        match &self.rows {
            MediationRows::Standard(r) => r.iter().map(|row| row.bh_fdr).collect(),
            MediationRows::Effects(r) => r.iter().map(|row| row.p).collect(),
        }
    }

    /// Mediators whose significance value is below `alpha`.
    pub fn significant(&self, alpha: f64) -> Vec<&str> {
        self.row_names()
            .into_iter()
            .zip(self.p_values())
            .filter(|(_, p)| *p < alpha)
            .map(|(name, _)| name)
            .collect()
    }

    /// Standard rows, if this table uses the standard schema.
    pub fn standard_rows(&self) -> Option<&[StandardRow]> {
        match &self.rows {
            MediationRows::Standard(r) => Some(r),
            MediationRows::Effects(_) => None,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Count significant results at various thresholds.
    pub fn summary(&self) -> ResultSummary {
        let p = self.p_values();
        ResultSummary {
            pipeline: self.pipeline,
            total: p.len(),
            significant_01: p.iter().filter(|&&v| v < 0.01).count(),
            significant_05: p.iter().filter(|&&v| v < 0.05).count(),
            significant_10: p.iter().filter(|&&v| v < 0.10).count(),
        }
    }
}

/// Summary statistics for a result table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSummary {
    pub pipeline: PipelineKind,
    pub total: usize,
    pub significant_01: usize,
    pub significant_05: usize,
    pub significant_10: usize,
}

impl std::fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pipeline: {}", self.pipeline)?;
        writeln!(f, "Mediators reported: {}", self.total)?;
        writeln!(f, "Significant at p < 0.01: {}", self.significant_01)?;
        writeln!(f, "Significant at p < 0.05: {}", self.significant_05)?;
        writeln!(f, "Significant at p < 0.10: {}", self.significant_10)?;
        Ok(())
    }
}

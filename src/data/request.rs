//! Slicing a phenotype table into the numeric inputs of one analysis.

use crate::data::{MediatorMatrix, ModelSpec, OutcomeRole, PhenotypeTable, Variable, VariableType};
use crate::error::{HimaError, Result};
use crate::family::OutcomeFamily;
use nalgebra::{DMatrix, DVector};

/// Outcome values of one analysis.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// A single response vector (gaussian, or 0/1 for binomial).
    Response(DVector<f64>),
    /// Event status (0/1) and time-to-event.
    Survival {
        status: DVector<f64>,
        time: DVector<f64>,
    },
}

impl AnalysisOutcome {
    /// The response vector, if this is not a survival outcome.
    pub fn response(&self) -> Option<&DVector<f64>> {
        match self {
            AnalysisOutcome::Response(y) => Some(y),
            AnalysisOutcome::Survival { .. } => None,
        }
    }

    /// The (status, time) pair, if this is a survival outcome.
    pub fn survival(&self) -> Option<(&DVector<f64>, &DVector<f64>)> {
        match self {
            AnalysisOutcome::Response(_) => None,
            AnalysisOutcome::Survival { status, time } => Some((status, time)),
        }
    }

    fn len(&self) -> usize {
        match self {
            AnalysisOutcome::Response(y) => y.len(),
            AnalysisOutcome::Survival { time, .. } => time.len(),
        }
    }
}

/// Numeric covariate matrix with one name per column.
///
/// Categorical covariates are dummy coded against their alphabetically first
/// level, so one phenotype column may contribute several matrix columns.
#[derive(Debug, Clone)]
pub struct Covariates {
    /// Covariate matrix (samples × columns).
    pub matrix: DMatrix<f64>,
    /// Column names.
    pub names: Vec<String>,
}

impl Covariates {
    pub fn n_columns(&self) -> usize {
        self.matrix.ncols()
    }
}

/// The resolved numeric inputs of one mediation analysis.
///
/// All parts share the same number of rows, in the same order.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Exposure vector (n).
    pub exposure: DVector<f64>,
    /// Outcome vector, or status and time vectors (n).
    pub outcome: AnalysisOutcome,
    /// Optional covariates (n × p).
    pub covariates: Option<Covariates>,
    /// Candidate mediators (n × m).
    pub mediators: MediatorMatrix,
}

impl AnalysisRequest {
    /// Slice the phenotype table by the roles of `spec`.
    ///
    /// Every referenced column is checked before any values are read, so a
    /// missing role fails with `MissingColumn` regardless of its position.
    pub fn from_spec(
        spec: &ModelSpec,
        phenotype: &PhenotypeTable,
        mediators: &MediatorMatrix,
        outcome_family: OutcomeFamily,
    ) -> Result<Self> {
        for var in spec.variables() {
            if !phenotype.has_column(var) {
                return Err(HimaError::MissingColumn(var.to_string()));
            }
        }

        if phenotype.n_samples() != mediators.n_samples() {
            return Err(HimaError::DimensionMismatch {
                expected: phenotype.n_samples(),
                actual: mediators.n_samples(),
            });
        }
        if !mediators.all_finite() {
            return Err(HimaError::InvalidParameter(
                "mediator matrix contains missing or non-finite values".to_string(),
            ));
        }

        let exposure = numeric_column(phenotype, &spec.exposure)?;

        let outcome = match &spec.outcome {
            OutcomeRole::Single(y) => match outcome_family {
                OutcomeFamily::Binomial => AnalysisOutcome::Response(binary_column(phenotype, y)?),
                OutcomeFamily::Gaussian => AnalysisOutcome::Response(numeric_column(phenotype, y)?),
                OutcomeFamily::Survival => {
                    return Err(HimaError::MalformedSpec(format!(
                        "survival outcome family needs Surv(status, time), got '{}'",
                        y
                    )));
                }
            },
            OutcomeRole::Survival { status, time } => {
                if !outcome_family.is_survival() {
                    return Err(HimaError::MalformedSpec(format!(
                        "Surv({}, {}) requires the survival outcome family",
                        status, time
                    )));
                }
                AnalysisOutcome::Survival {
                    status: binary_column(phenotype, status)?,
                    time: numeric_column(phenotype, time)?,
                }
            }
        };

        let covariates = covariate_matrix(phenotype, &spec.covariates)?;

        Ok(Self {
            exposure,
            outcome,
            covariates,
            mediators: mediators.clone(),
        })
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.exposure.len()
    }

    /// Number of candidate mediators.
    pub fn n_mediators(&self) -> usize {
        self.mediators.n_mediators()
    }

    /// Number of covariate columns (0 if none).
    pub fn n_covariates(&self) -> usize {
        self.covariates.as_ref().map_or(0, |c| c.n_columns())
    }

    /// Check that every part has the same number of rows.
    pub fn validate(&self) -> Result<()> {
        let n = self.n_samples();
        let mut lengths = vec![self.outcome.len(), self.mediators.n_samples()];
        if let Some(cov) = &self.covariates {
            lengths.push(cov.matrix.nrows());
        }
        if let AnalysisOutcome::Survival { status, .. } = &self.outcome {
            lengths.push(status.len());
        }
        match lengths.into_iter().find(|&len| len != n) {
            Some(actual) => Err(HimaError::DimensionMismatch { expected: n, actual }),
            None => Ok(()),
        }
    }
}

/// Read a numeric column with no missing or infinite values.
fn numeric_column(phenotype: &PhenotypeTable, name: &str) -> Result<DVector<f64>> {
    let values = phenotype.column(name)?;
    let data = values
        .iter()
        .enumerate()
        .map(|(row, v)| match v {
            Variable::Continuous(x) if !x.is_finite() => Err(HimaError::InvalidParameter(format!(
                "column '{}' has a non-finite value at row {}",
                name, row
            ))),
            Variable::Continuous(x) => Ok(*x),
            Variable::Missing => Err(HimaError::MissingValue {
                column: name.to_string(),
                row,
            }),
            Variable::Categorical(s) => Err(HimaError::InvalidVariableType {
                column: name.to_string(),
                reason: format!("expected a numeric value, found '{}'", s),
            }),
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(DVector::from_vec(data))
}

/// Read a binary column as 0/1.
///
/// Numeric columns must contain only 0 and 1. Categorical columns must have
/// exactly two levels; the alphabetically first is coded 0.
fn binary_column(phenotype: &PhenotypeTable, name: &str) -> Result<DVector<f64>> {
    match phenotype.column_type(name) {
        Some(VariableType::Continuous) => {
            let v = numeric_column(phenotype, name)?;
            if let Some(bad) = v.iter().find(|&&x| x != 0.0 && x != 1.0) {
                return Err(HimaError::InvalidVariableType {
                    column: name.to_string(),
                    reason: format!("binary column must be coded 0/1, found {}", bad),
                });
            }
            Ok(v)
        }
        Some(VariableType::Categorical) => {
            let levels = phenotype.levels(name)?;
            if levels.len() != 2 {
                return Err(HimaError::InvalidVariableType {
                    column: name.to_string(),
                    reason: format!("binary column must have two levels, found {}", levels.len()),
                });
            }
            let (_, dummy) = dummy_columns(phenotype, name, &levels)?
                .into_iter()
                .next()
                .ok_or_else(|| HimaError::InvalidVariableType {
                    column: name.to_string(),
                    reason: "no non-reference level".to_string(),
                })?;
            Ok(DVector::from_vec(dummy))
        }
        None => Err(HimaError::MissingColumn(name.to_string())),
    }
}

/// Indicator columns for every non-reference level.
fn dummy_columns(
    phenotype: &PhenotypeTable,
    name: &str,
    levels: &[String],
) -> Result<Vec<(String, Vec<f64>)>> {
    let values = phenotype.column(name)?;
    levels
        .iter()
        .skip(1)
        .map(|level| {
            let col = values
                .iter()
                .enumerate()
                .map(|(row, v)| match v {
                    Variable::Categorical(s) => Ok(if s == level { 1.0 } else { 0.0 }),
                    Variable::Missing => Err(HimaError::MissingValue {
                        column: name.to_string(),
                        row,
                    }),
                    Variable::Continuous(x) => Err(HimaError::InvalidVariableType {
                        column: name.to_string(),
                        reason: format!("mixed numeric value {} in categorical column", x),
                    }),
                })
                .collect::<Result<Vec<f64>>>()?;
            Ok((format!("{}{}", name, level), col))
        })
        .collect()
}

fn covariate_matrix(phenotype: &PhenotypeTable, names: &[String]) -> Result<Option<Covariates>> {
    if names.is_empty() {
        return Ok(None);
    }

    let mut col_names = Vec::new();
    let mut columns: Vec<DVector<f64>> = Vec::new();

    for name in names {
        match phenotype.column_type(name) {
            Some(VariableType::Continuous) => {
                col_names.push(name.clone());
                columns.push(numeric_column(phenotype, name)?);
            }
            Some(VariableType::Categorical) => {
                let levels = phenotype.levels(name)?;
                if levels.len() < 2 {
                    return Err(HimaError::InvalidVariableType {
                        column: name.clone(),
                        reason: "categorical covariate needs at least two levels".to_string(),
                    });
                }
                for (dummy_name, col) in dummy_columns(phenotype, name, &levels)? {
                    col_names.push(dummy_name);
                    columns.push(DVector::from_vec(col));
                }
            }
            None => return Err(HimaError::MissingColumn(name.clone())),
        }
    }

    Ok(Some(Covariates {
        matrix: DMatrix::from_columns(&columns),
        names: col_names,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_phenotype() -> PhenotypeTable {
        PhenotypeTable::new()
            .with_continuous("Y", &[1.0, 2.5, 0.3, 4.1, 2.2, 3.0])
            .unwrap()
            .with_continuous("X", &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0])
            .unwrap()
            .with_continuous("Age", &[30.0, 41.0, 52.0, 38.0, 45.0, 60.0])
            .unwrap()
            .with_categorical("Sex", &["male", "female", "male", "female", "male", "male"])
            .unwrap()
            .with_categorical("Site", &["a", "b", "c", "a", "b", "c"])
            .unwrap()
            .with_continuous("Status", &[1.0, 0.0, 1.0, 1.0, 0.0, 1.0])
            .unwrap()
            .with_continuous("Time", &[5.0, 8.2, 3.1, 9.9, 12.0, 1.5])
            .unwrap()
    }

    fn create_test_mediators() -> MediatorMatrix {
        let values: Vec<f64> = (0..18).map(|i| (i as f64 * 0.37).sin()).collect();
        MediatorMatrix::from_row_slice(6, 3, &values, vec!["m1".into(), "m2".into(), "m3".into()])
            .unwrap()
    }

    #[test]
    fn test_slice_gaussian() {
        let spec = ModelSpec::parse("Y ~ X + Age + Sex", false).unwrap();
        let req = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Gaussian,
        )
        .unwrap();

        assert_eq!(req.n_samples(), 6);
        assert_eq!(req.n_mediators(), 3);
        assert_eq!(req.exposure.as_slice(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(req.outcome.response().unwrap()[1], 2.5);

        let cov = req.covariates.as_ref().unwrap();
        assert_eq!(cov.names, vec!["Age", "Sexmale"]);
        assert_eq!(cov.matrix[(0, 1)], 1.0);
        assert_eq!(cov.matrix[(1, 1)], 0.0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_no_covariates() {
        let spec = ModelSpec::parse("Y ~ X", false).unwrap();
        let req = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Gaussian,
        )
        .unwrap();
        assert!(req.covariates.is_none());
        assert_eq!(req.n_covariates(), 0);
    }

    #[test]
    fn test_multi_level_dummy_coding() {
        let spec = ModelSpec::parse("Y ~ X + Site", false).unwrap();
        let req = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Gaussian,
        )
        .unwrap();
        assert_eq!(req.covariates.unwrap().names, vec!["Siteb", "Sitec"]);
    }

    #[test]
    fn test_slice_survival() {
        let spec = ModelSpec::parse("Surv(Status, Time) ~ X + Sex", true).unwrap();
        let req = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Survival,
        )
        .unwrap();
        let (status, time) = req.outcome.survival().unwrap();
        assert_eq!(status[1], 0.0);
        assert_eq!(time[0], 5.0);
        assert!(req.outcome.response().is_none());
    }

    #[test]
    fn test_binomial_categorical_outcome() {
        let spec = ModelSpec::parse("Sex ~ X", false).unwrap();
        let req = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Binomial,
        )
        .unwrap();
        // female is the reference level
        assert_eq!(
            req.outcome.response().unwrap().as_slice(),
            &[1.0, 0.0, 1.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_binomial_rejects_non_binary() {
        let spec = ModelSpec::parse("Y ~ X", false).unwrap();
        let err = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Binomial,
        )
        .unwrap_err();
        assert!(matches!(err, HimaError::InvalidVariableType { .. }));
    }

    #[test]
    fn test_missing_column() {
        let spec = ModelSpec::parse("Y ~ X + Smoking", false).unwrap();
        let err = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Gaussian,
        )
        .unwrap_err();
        assert!(matches!(err, HimaError::MissingColumn(c) if c == "Smoking"));
    }

    #[test]
    fn test_categorical_exposure_rejected() {
        let spec = ModelSpec::parse("Y ~ Sex", false).unwrap();
        let err = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Gaussian,
        )
        .unwrap_err();
        assert!(matches!(err, HimaError::InvalidVariableType { .. }));
    }

    #[test]
    fn test_missing_value_rejected() {
        let phenotype = PhenotypeTable::new()
            .with_continuous("Y", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap()
            .with_continuous("X", &[0.0, 1.0, f64::NAN, 1.0, 0.0, 1.0])
            .unwrap();
        let spec = ModelSpec::parse("Y ~ X", false).unwrap();
        let err = AnalysisRequest::from_spec(
            &spec,
            &phenotype,
            &create_test_mediators(),
            OutcomeFamily::Gaussian,
        )
        .unwrap_err();
        assert!(matches!(err, HimaError::MissingValue { row: 2, .. }));
    }

    #[test]
    fn test_infinite_role_values_rejected() {
        let cases = [
            ("X", f64::INFINITY),
            ("Y", f64::NEG_INFINITY),
            ("Age", f64::INFINITY),
        ];
        for (column, bad) in cases {
            let mut x = vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
            let mut y = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
            let mut age = vec![30.0, 41.0, 52.0, 38.0, 45.0, 60.0];
            match column {
                "X" => x[3] = bad,
                "Y" => y[3] = bad,
                _ => age[3] = bad,
            }
            let phenotype = PhenotypeTable::new()
                .with_continuous("X", &x)
                .unwrap()
                .with_continuous("Y", &y)
                .unwrap()
                .with_continuous("Age", &age)
                .unwrap();

            let spec = ModelSpec::parse("Y ~ X + Age", false).unwrap();
            let err = AnalysisRequest::from_spec(
                &spec,
                &phenotype,
                &create_test_mediators(),
                OutcomeFamily::Gaussian,
            )
            .unwrap_err();
            assert!(
                matches!(err, HimaError::InvalidParameter(ref msg) if msg.contains(column)),
                "{}: {:?}",
                column,
                err
            );
        }

        // Survival time goes through the same check
        let phenotype = create_test_phenotype()
            .with_continuous("T2", &[5.0, 8.2, f64::INFINITY, 9.9, 12.0, 1.5])
            .unwrap();
        let spec = ModelSpec::parse("Surv(Status, T2) ~ X", true).unwrap();
        let err = AnalysisRequest::from_spec(
            &spec,
            &phenotype,
            &create_test_mediators(),
            OutcomeFamily::Survival,
        )
        .unwrap_err();
        assert!(matches!(err, HimaError::InvalidParameter(_)));
    }

    #[test]
    fn test_row_count_mismatch() {
        let mediators =
            MediatorMatrix::from_row_slice(2, 1, &[0.1, 0.2], vec!["m1".into()]).unwrap();
        let spec = ModelSpec::parse("Y ~ X", false).unwrap();
        let err = AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &mediators,
            OutcomeFamily::Gaussian,
        )
        .unwrap_err();
        assert!(matches!(err, HimaError::DimensionMismatch { expected: 6, actual: 2 }));
    }

    #[test]
    fn test_family_and_lhs_must_agree() {
        let spec = ModelSpec::parse("Y ~ X", false).unwrap();
        assert!(AnalysisRequest::from_spec(
            &spec,
            &create_test_phenotype(),
            &create_test_mediators(),
            OutcomeFamily::Survival,
        )
        .is_err());
    }
}

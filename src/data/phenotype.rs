//! Phenotype table: per-sample outcome, exposure, and covariate columns.

use crate::error::{HimaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single phenotype value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Variable {
    /// Categorical value with a string level.
    Categorical(String),
    /// Continuous numeric value.
    Continuous(f64),
    /// Missing value.
    Missing,
}

impl Variable {
    /// Check if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Variable::Missing)
    }

    /// Try to get as categorical string.
    pub fn as_categorical(&self) -> Option<&str> {
        match self {
            Variable::Categorical(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as continuous f64.
    pub fn as_continuous(&self) -> Option<f64> {
        match self {
            Variable::Continuous(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Variable {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            Variable::Missing
        } else {
            Variable::Continuous(v)
        }
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == "NA" || s == "na" {
            Variable::Missing
        } else {
            Variable::Categorical(s.to_string())
        }
    }
}

/// Column type, inferred from the values present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableType {
    Categorical,
    Continuous,
}

/// Sample phenotypes, stored column-wise.
///
/// Rows are samples and are aligned positionally with the rows of the
/// mediator matrix; the table never reorders them.
#[derive(Debug, Clone, Default)]
pub struct PhenotypeTable {
    /// Column names in insertion order.
    column_names: Vec<String>,
    /// Column name -> values.
    data: HashMap<String, Vec<Variable>>,
    n_samples: Option<usize>,
}

impl PhenotypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column of values.
    ///
    /// The first column fixes the number of samples; every later column must
    /// match it.
    pub fn with_column(mut self, name: &str, values: Vec<Variable>) -> Result<Self> {
        if self.data.contains_key(name) {
            return Err(HimaError::InvalidParameter(format!(
                "duplicate phenotype column '{}'",
                name
            )));
        }
        match self.n_samples {
            Some(n) if n != values.len() => {
                return Err(HimaError::DimensionMismatch {
                    expected: n,
                    actual: values.len(),
                });
            }
            Some(_) => {}
            None => self.n_samples = Some(values.len()),
        }
        self.column_names.push(name.to_string());
        self.data.insert(name.to_string(), values);
        Ok(self)
    }

    /// Add a numeric column. NaN is treated as missing.
    pub fn with_continuous(self, name: &str, values: &[f64]) -> Result<Self> {
        let values = values.iter().map(|&v| Variable::from(v)).collect();
        self.with_column(name, values)
    }

    /// Add a categorical column. Empty strings and `NA` are treated as missing.
    pub fn with_categorical(self, name: &str, values: &[&str]) -> Result<Self> {
        let values = values.iter().map(|&v| Variable::from(v)).collect();
        self.with_column(name, values)
    }

    /// Column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.n_samples.unwrap_or(0)
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    /// Check if a column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.data.contains_key(column)
    }

    /// Get all values for a column.
    pub fn column(&self, column: &str) -> Result<&[Variable]> {
        self.data
            .get(column)
            .map(|v| v.as_slice())
            .ok_or_else(|| HimaError::MissingColumn(column.to_string()))
    }

    /// Get a single value.
    pub fn get(&self, row: usize, column: &str) -> Option<&Variable> {
        self.data.get(column).and_then(|v| v.get(row))
    }

    /// Infer the type of a column: continuous if every present value is numeric.
    pub fn column_type(&self, column: &str) -> Option<VariableType> {
        let values = self.data.get(column)?;
        let all_numeric = values
            .iter()
            .all(|v| matches!(v, Variable::Continuous(_) | Variable::Missing));
        Some(if all_numeric {
            VariableType::Continuous
        } else {
            VariableType::Categorical
        })
    }

    /// Get sorted unique levels for a categorical column.
    pub fn levels(&self, column: &str) -> Result<Vec<String>> {
        let values = self.column(column)?;
        let mut levels: Vec<String> = values
            .iter()
            .filter_map(|v| v.as_categorical().map(String::from))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        levels.sort();
        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> PhenotypeTable {
        PhenotypeTable::new()
            .with_continuous("Y", &[1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_continuous("X", &[0.0, 1.0, 0.0, 1.0])
            .unwrap()
            .with_categorical("Sex", &["male", "female", "female", "male"])
            .unwrap()
    }

    #[test]
    fn test_build_table() {
        let t = create_test_table();
        assert_eq!(t.n_samples(), 4);
        assert_eq!(t.n_columns(), 3);
        assert_eq!(t.column_names(), &["Y", "X", "Sex"]);
        assert!(t.has_column("Sex"));
        assert!(!t.has_column("Age"));
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = create_test_table()
            .with_continuous("Age", &[30.0, 40.0])
            .unwrap_err();
        assert!(matches!(
            err,
            HimaError::DimensionMismatch { expected: 4, actual: 2 }
        ));
    }

    #[test]
    fn test_duplicate_column() {
        assert!(create_test_table().with_continuous("Y", &[0.0; 4]).is_err());
    }

    #[test]
    fn test_column_type_inference() {
        let t = create_test_table();
        assert_eq!(t.column_type("Y"), Some(VariableType::Continuous));
        assert_eq!(t.column_type("Sex"), Some(VariableType::Categorical));
        assert_eq!(t.column_type("Age"), None);
    }

    #[test]
    fn test_levels() {
        let t = create_test_table();
        assert_eq!(t.levels("Sex").unwrap(), vec!["female", "male"]);
    }

    #[test]
    fn test_missing_values() {
        let t = PhenotypeTable::new()
            .with_continuous("Age", &[30.0, f64::NAN])
            .unwrap()
            .with_categorical("Sex", &["male", "NA"])
            .unwrap();
        assert!(t.get(1, "Age").unwrap().is_missing());
        assert!(t.get(1, "Sex").unwrap().is_missing());
        assert_eq!(t.get(0, "Age").unwrap().as_continuous(), Some(30.0));
    }

    #[test]
    fn test_missing_column() {
        let t = create_test_table();
        assert!(matches!(t.column("Age"), Err(HimaError::MissingColumn(c)) if c == "Age"));
    }
}

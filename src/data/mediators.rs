//! Dense mediator matrix for omics-scale candidate mediators.

use crate::error::{HimaError, Result};
use nalgebra::{DMatrix, DVector};

/// Candidate mediators measured on every sample.
///
/// Rows are samples, columns are mediators (CpG sites, genes, taxa). Row
/// order must match the phenotype table; alignment is positional.
#[derive(Debug, Clone)]
pub struct MediatorMatrix {
    /// Dense matrix (samples × mediators).
    data: DMatrix<f64>,
    /// Mediator identifiers (column names).
    mediator_ids: Vec<String>,
}

impl MediatorMatrix {
    /// Create a mediator matrix from a dense matrix and its column names.
    pub fn new(data: DMatrix<f64>, mediator_ids: Vec<String>) -> Result<Self> {
        if data.ncols() != mediator_ids.len() {
            return Err(HimaError::DimensionMismatch {
                expected: data.ncols(),
                actual: mediator_ids.len(),
            });
        }
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(HimaError::EmptyData(format!(
                "mediator matrix is {}x{}",
                data.nrows(),
                data.ncols()
            )));
        }
        Ok(Self { data, mediator_ids })
    }

    /// Create from row-major values (one row per sample).
    pub fn from_row_slice(
        n_samples: usize,
        n_mediators: usize,
        values: &[f64],
        mediator_ids: Vec<String>,
    ) -> Result<Self> {
        if values.len() != n_samples * n_mediators {
            return Err(HimaError::DimensionMismatch {
                expected: n_samples * n_mediators,
                actual: values.len(),
            });
        }
        Self::new(
            DMatrix::from_row_slice(n_samples, n_mediators, values),
            mediator_ids,
        )
    }

    /// Number of samples (rows).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of mediators (columns).
    #[inline]
    pub fn n_mediators(&self) -> usize {
        self.data.ncols()
    }

    /// Mediator identifiers.
    #[inline]
    pub fn mediator_ids(&self) -> &[String] {
        &self.mediator_ids
    }

    /// Get the underlying matrix.
    #[inline]
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Column index of a mediator.
    pub fn index_of(&self, mediator_id: &str) -> Option<usize> {
        self.mediator_ids.iter().position(|m| m == mediator_id)
    }

    /// Values of one mediator across samples.
    pub fn column(&self, mediator: usize) -> DVector<f64> {
        self.data.column(mediator).into_owned()
    }

    /// Check that every value is finite.
    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

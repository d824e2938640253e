//! Z-standardization and screening-size helpers shared by estimators.

use crate::family::OutcomeFamily;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Center to mean 0 and scale to unit sample standard deviation.
///
/// A constant vector (or one with fewer than two values) is only centered.
pub fn standardize_vector(x: &DVector<f64>) -> DVector<f64> {
    let n = x.len();
    if n == 0 {
        return x.clone();
    }
    let mean = x.mean();
    let centered = x.map(|v| v - mean);
    if n < 2 {
        return centered;
    }
    let var = centered.iter().map(|v| v * v).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();
    if sd > f64::EPSILON {
        centered / sd
    } else {
        centered
    }
}

/// Standardize every column of a (samples × features) matrix independently.
pub fn standardize_columns(x: &DMatrix<f64>) -> DMatrix<f64> {
    if x.ncols() == 0 || x.nrows() == 0 {
        return x.clone();
    }
    let columns: Vec<DVector<f64>> = (0..x.ncols())
        .into_par_iter()
        .map(|j| standardize_vector(&x.column(j).into_owned()))
        .collect();
    DMatrix::from_columns(&columns)
}

/// Default sure-independence-screening size for `n` samples.
///
/// `ceil(n / ln n)` for gaussian (and survival) outcomes,
/// `ceil(n / (2 ln n))` for binomial outcomes.
pub fn default_top_n(n: usize, family: OutcomeFamily) -> usize {
    if n < 3 {
        return n;
    }
    let n_f = n as f64;
    let denom = match family {
        OutcomeFamily::Binomial => 2.0 * n_f.ln(),
        OutcomeFamily::Gaussian | OutcomeFamily::Survival => n_f.ln(),
    };
    (n_f / denom).ceil() as usize
}

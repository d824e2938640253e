//! Assembly of raw estimator output into a [`MediationTable`].
//!
//! Standard output passes through unchanged. Compositional and survival
//! output is re-projected into the `alpha, alpha_se, beta, beta_se, p`
//! schema with row names taken from the estimator's identifier column.
//! Rows are never filtered or reordered here.

use crate::data::{EffectRow, MediationTable};
use crate::error::{HimaError, Result};
use crate::estimate::RawOutput;
use crate::family::PipelineKind;

/// Build the final table for the routed pipeline.
pub fn assemble(kind: PipelineKind, raw: RawOutput) -> Result<MediationTable> {
    if raw.kind() != kind {
        return Err(HimaError::InvalidParameter(format!(
            "{} pipeline returned {} output",
            kind,
            raw.kind()
        )));
    }
    let n_raw = raw.n_rows();

    let table = match raw {
        RawOutput::Standard(rows) => MediationTable::standard(rows),
        RawOutput::Compositional(est) => MediationTable::effects(
            kind,
            project(
                est.id,
                [&est.alpha, &est.alpha_se, &est.beta, &est.beta_se, &est.p_fdp],
            )?,
        ),
        RawOutput::Survival(est) => MediationTable::effects(
            kind,
            project(
                est.id,
                [&est.alpha, &est.alpha_se, &est.beta, &est.beta_se, &est.pvalue],
            )?,
        ),
    };

    if table.len() != n_raw {
        return Err(HimaError::DimensionMismatch {
            expected: n_raw,
            actual: table.len(),
        });
    }
    if table.variable_labels.len() != table.n_columns() {
        return Err(HimaError::DimensionMismatch {
            expected: table.n_columns(),
            actual: table.variable_labels.len(),
        });
    }

    Ok(table)
}

/// Zip the identifier column with the five value columns.
fn project(ids: Vec<String>, columns: [&Vec<f64>; 5]) -> Result<Vec<EffectRow>> {
    let n = ids.len();
    if let Some(col) = columns.iter().find(|c| c.len() != n) {
        return Err(HimaError::DimensionMismatch {
            expected: n,
            actual: col.len(),
        });
    }

    let [alpha, alpha_se, beta, beta_se, p] = columns;
    Ok(ids
        .into_iter()
        .enumerate()
        .map(|(i, mediator)| EffectRow {
            mediator,
            alpha: alpha[i],
            alpha_se: alpha_se[i],
            beta: beta[i],
            beta_se: beta_se[i],
            p: p[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StandardRow;
    use crate::estimate::{CompositionalEstimate, SurvivalEstimate};

    fn compositional(n: usize) -> CompositionalEstimate {
        CompositionalEstimate {
            id: (0..n).map(|i| format!("otu_{}", i)).collect(),
            alpha: (0..n).map(|i| i as f64).collect(),
            alpha_se: vec![0.1; n],
            beta: vec![0.2; n],
            beta_se: vec![0.05; n],
            p_fdp: vec![0.01; n],
        }
    }

    #[test]
    fn test_standard_passthrough() {
        let rows = vec![StandardRow {
            mediator: "cg0001".into(),
            alpha: 0.4,
            beta: 0.5,
            gamma: 1.0,
            alpha_beta: 0.2,
            percent_total: 20.0,
            bonferroni_p: 0.01,
            bh_fdr: 0.005,
        }];
        let table = assemble(PipelineKind::Standard, RawOutput::Standard(rows.clone())).unwrap();
        assert_eq!(table.standard_rows().unwrap(), rows.as_slice());
        assert_eq!(table.n_columns(), 7);
        assert_eq!(table.variable_labels.len(), 7);
    }

    #[test]
    fn test_compositional_projection() {
        let raw = RawOutput::Compositional(compositional(3));
        let table = assemble(PipelineKind::Compositional, raw).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.row_names(), vec!["otu_0", "otu_1", "otu_2"]);
        assert_eq!(table.column_names(), &["alpha", "alpha_se", "beta", "beta_se", "p"]);
        assert_eq!(table.row_values(2).unwrap(), vec![2.0, 0.1, 0.2, 0.05, 0.01]);
        assert_eq!(table.variable_labels.len(), 5);
    }

    #[test]
    fn test_survival_projection_uses_pvalue() {
        let raw = RawOutput::Survival(SurvivalEstimate {
            id: vec!["cg_a".into(), "cg_b".into()],
            alpha: vec![0.1, 0.2],
            alpha_se: vec![0.01, 0.02],
            beta: vec![0.3, 0.4],
            beta_se: vec![0.03, 0.04],
            pvalue: vec![0.001, 0.2],
        });
        let table = assemble(PipelineKind::Survival, raw).unwrap();
        assert_eq!(table.pipeline, PipelineKind::Survival);
        assert_eq!(table.p_values(), vec![0.001, 0.2]);
        assert_eq!(table.row_names(), vec!["cg_a", "cg_b"]);
    }

    #[test]
    fn test_row_count_preserved() {
        for n in [0, 1, 7, 40] {
            let table =
                assemble(PipelineKind::Compositional, RawOutput::Compositional(compositional(n)))
                    .unwrap();
            assert_eq!(table.len(), n);
        }
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let mut est = compositional(3);
        est.beta_se.pop();
        let err = assemble(PipelineKind::Compositional, RawOutput::Compositional(est)).unwrap_err();
        assert!(matches!(err, HimaError::DimensionMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let err = assemble(PipelineKind::Survival, RawOutput::Compositional(compositional(1)))
            .unwrap_err();
        assert!(matches!(err, HimaError::InvalidParameter(_)));
    }
}

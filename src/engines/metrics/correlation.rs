// src/engines/metrics/correlation.rs
use super::stats;
use crate::types::{AlignedReturnMatrix, CorrelationMatrix};
use std::collections::BTreeMap;

pub struct CorrelationMatrixBuilder;

impl CorrelationMatrixBuilder {
    /// Pairwise Pearson correlations between the matrix columns.
    ///
    /// The diagonal is exactly 1.0 and every other entry lies in [-1, 1];
    /// instruments with zero (or undefined) variance get `NaN` across their
    /// whole row and column.
    pub fn build(matrix: &AlignedReturnMatrix) -> CorrelationMatrix {
        let instruments = matrix.instruments();
        let columns: Vec<Vec<f64>> = (0..instruments.len()).map(|i| matrix.column(i)).collect();
        let has_variance: Vec<bool> = columns
            .iter()
            .map(|c| stats::sample_variance(c) > 0.0)
            .collect();

        let mut result: CorrelationMatrix = instruments
            .iter()
            .map(|id| (id.clone(), BTreeMap::new()))
            .collect();

        for i in 0..instruments.len() {
            for j in i..instruments.len() {
                let value = if !(has_variance[i] && has_variance[j]) {
                    f64::NAN
                } else if i == j {
                    1.0
                } else {
                    stats::pearson(&columns[i], &columns[j])
                };

                if let Some(row) = result.get_mut(&instruments[i]) {
                    row.insert(instruments[j].clone(), value);
                }
                if let Some(row) = result.get_mut(&instruments[j]) {
                    row.insert(instruments[i].clone(), value);
                }
            }
        }

        result
    }
}

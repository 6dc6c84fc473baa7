// src/engines/returns/aligner.rs
use crate::{
    error::{PortfolioLabError, Result},
    types::{AlignedReturnMatrix, AllocationSet, ReturnPoint, ReturnSeries},
};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

pub struct ReturnAligner;

impl ReturnAligner {
    /// Inner join of every series on period end.
    ///
    /// A period missing (or NaN) in any one series is dropped for all of them.
    pub fn align(series_by_instrument: &[(String, ReturnSeries)]) -> Result<AlignedReturnMatrix> {
        let Some((_, first)) = series_by_instrument.first() else {
            return Err(PortfolioLabError::NoOverlap(
                "no instruments supplied".to_string(),
            ));
        };

        let mut seen = HashSet::with_capacity(series_by_instrument.len());
        for (id, _) in series_by_instrument {
            if !seen.insert(id.as_str()) {
                return Err(PortfolioLabError::AllocationMismatch(format!(
                    "instrument {} supplied more than once",
                    id
                )));
            }
        }

        let lookups: Vec<HashMap<NaiveDate, f64>> = series_by_instrument
            .iter()
            .map(|(_, series)| {
                series
                    .points()
                    .iter()
                    .filter(|p| !p.value.is_nan())
                    .map(|p| (p.period_end, p.value))
                    .collect()
            })
            .collect();

        let mut dates = Vec::new();
        let mut rows = Vec::new();
        for point in first.points() {
            let row: Option<Vec<f64>> = lookups
                .iter()
                .map(|lookup| lookup.get(&point.period_end).copied())
                .collect();
            if let Some(row) = row {
                dates.push(point.period_end);
                rows.push(row);
            }
        }

        let instruments: Vec<String> = series_by_instrument
            .iter()
            .map(|(id, _)| id.clone())
            .collect();

        if rows.is_empty() {
            return Err(PortfolioLabError::NoOverlap(format!(
                "{} share no common period",
                instruments.join(", ")
            )));
        }

        log::debug!(
            "Aligned {} instrument(s) over {} common period(s)",
            instruments.len(),
            rows.len()
        );

        Ok(AlignedReturnMatrix::new(instruments, dates, rows))
    }

    /// Restricts two series to the periods they share.
    pub fn align_pair(a: &ReturnSeries, b: &ReturnSeries) -> Result<(ReturnSeries, ReturnSeries)> {
        let lookup: HashMap<NaiveDate, f64> = b
            .points()
            .iter()
            .filter(|p| !p.value.is_nan())
            .map(|p| (p.period_end, p.value))
            .collect();

        let (left, right): (Vec<ReturnPoint>, Vec<ReturnPoint>) = a
            .points()
            .iter()
            .filter(|p| !p.value.is_nan())
            .filter_map(|p| {
                lookup.get(&p.period_end).map(|&other| {
                    (
                        *p,
                        ReturnPoint {
                            period_end: p.period_end,
                            value: other,
                        },
                    )
                })
            })
            .unzip();

        if left.is_empty() {
            return Err(PortfolioLabError::NoOverlap(
                "series share no common period".to_string(),
            ));
        }

        Ok((ReturnSeries::from_sorted(left), ReturnSeries::from_sorted(right)))
    }

    /// Row-wise dot product of the matrix with the decimal weights.
    pub fn weighted_combine(
        matrix: &AlignedReturnMatrix,
        weights: &AllocationSet,
    ) -> Result<ReturnSeries> {
        let columns: HashSet<&str> = matrix.instruments().iter().map(|s| s.as_str()).collect();
        let allocated: HashSet<&str> = weights.ids().collect();

        if columns != allocated {
            let mut missing: Vec<&str> = columns.difference(&allocated).copied().collect();
            let mut extra: Vec<&str> = allocated.difference(&columns).copied().collect();
            missing.sort_unstable();
            extra.sort_unstable();
            return Err(PortfolioLabError::AllocationMismatch(format!(
                "unallocated instruments {:?}, allocations without data {:?}",
                missing, extra
            )));
        }

        let decimal: Vec<f64> = matrix
            .instruments()
            .iter()
            .map(|id| weights.decimal_weight(id).unwrap_or(0.0))
            .collect();

        let points = matrix
            .dates()
            .iter()
            .zip(matrix.rows())
            .map(|(&period_end, row)| ReturnPoint {
                period_end,
                value: row.iter().zip(&decimal).map(|(r, w)| r * w).sum(),
            })
            .collect();

        Ok(ReturnSeries::from_sorted(points))
    }
}

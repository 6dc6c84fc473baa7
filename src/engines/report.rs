// src/engines/report.rs
use crate::engines::metrics::{
    BenchmarkComparator, CorrelationMatrixBuilder, MetricsEngine, CORRELATION_MATRIX_KEY,
};
use crate::engines::returns::{ReturnAligner, ReturnSeriesBuilder};
use crate::error::{PortfolioLabError, Result};
use crate::types::{AllocationSet, MetricValue, MetricsReport, PriceSeries, ReturnSeries};
use std::collections::{BTreeMap, HashMap};

/// Builds the complete metrics report for one weighted portfolio.
///
/// Every instrument's monthly returns are aligned on their common periods and
/// combined with the allocation weights. When a benchmark is supplied and
/// shares periods with the portfolio, all metrics are computed over those
/// shared periods only; a benchmark that cannot be used is skipped with a
/// warning. The correlation matrix always covers the full aligned history.
pub fn compute_portfolio_report(
    instruments: &[PriceSeries],
    allocations: &AllocationSet,
    benchmark: Option<&PriceSeries>,
    risk_free_annual: f64,
) -> Result<MetricsReport> {
    let series = instruments
        .iter()
        .map(|prices| {
            ReturnSeriesBuilder::build(prices).map(|r| (prices.instrument().to_string(), r))
        })
        .collect::<Result<Vec<_>>>()?;

    let matrix = ReturnAligner::align(&series)?;
    let mut portfolio = ReturnAligner::weighted_combine(&matrix, allocations)?;

    let mut benchmark_id = None;
    let mut benchmark_metrics: HashMap<String, f64> = HashMap::new();
    if let Some(prices) = benchmark {
        match compare_with_benchmark(&portfolio, prices, risk_free_annual) {
            Ok((restricted, metrics)) => {
                if restricted.len() < portfolio.len() {
                    log::info!(
                        "Restricting portfolio to {} periods shared with {}",
                        restricted.len(),
                        prices.instrument()
                    );
                }
                portfolio = restricted;
                benchmark_metrics = metrics;
                benchmark_id = Some(prices.instrument().to_string());
            }
            Err(e) => {
                log::warn!(
                    "Skipping benchmark {}: {}",
                    prices.instrument(),
                    e
                );
            }
        }
    }

    let (start_period, end_period) = match (portfolio.first_period(), portfolio.last_period()) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(PortfolioLabError::EmptySeries),
    };

    let mut metrics: BTreeMap<String, MetricValue> = MetricsEngine::new(risk_free_annual)
        .compute(&portfolio)?
        .into_iter()
        .map(|(key, value)| (key, MetricValue::Scalar(value)))
        .collect();

    metrics.extend(
        benchmark_metrics
            .into_iter()
            .map(|(key, value)| (key, MetricValue::Scalar(value))),
    );

    metrics.insert(
        CORRELATION_MATRIX_KEY.to_string(),
        MetricValue::Matrix(CorrelationMatrixBuilder::build(&matrix)),
    );

    log::debug!(
        "Report over {} periods ({} to {}), {} entries",
        portfolio.len(),
        start_period,
        end_period,
        metrics.len()
    );

    Ok(MetricsReport {
        periods: portfolio.len(),
        start_period,
        end_period,
        benchmark: benchmark_id,
        metrics,
    })
}

/// Portfolio restricted to the benchmark's periods, plus the relative metrics.
fn compare_with_benchmark(
    portfolio: &ReturnSeries,
    benchmark: &PriceSeries,
    risk_free_annual: f64,
) -> Result<(ReturnSeries, HashMap<String, f64>)> {
    let benchmark_returns = ReturnSeriesBuilder::build(benchmark)?;
    let (restricted, benchmark_returns) = ReturnAligner::align_pair(portfolio, &benchmark_returns)?;
    let metrics =
        BenchmarkComparator::new(risk_free_annual).compare(&restricted, &benchmark_returns)?;
    Ok((restricted, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::metrics::Metric;
    use chrono::NaiveDate;

    fn monthly_prices(id: &str, year: i32, closes: &[f64]) -> PriceSeries {
        let pairs: Vec<(NaiveDate, f64)> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = NaiveDate::from_ymd_opt(year + (i / 12) as i32, (i % 12) as u32 + 1, 15)
                    .unwrap();
                (date, close)
            })
            .collect();
        PriceSeries::from_pairs(id, &pairs).unwrap()
    }

    fn allocations(entries: &[(&str, i64)]) -> AllocationSet {
        AllocationSet::new(entries.iter().map(|(id, w)| (id.to_string(), *w)).collect()).unwrap()
    }

    #[test]
    fn test_two_instrument_report() {
        let a = monthly_prices("A", 2020, &[100.0, 110.0, 121.0]);
        let b = monthly_prices("B", 2020, &[100.0, 121.0, 110.0]);

        let report =
            compute_portfolio_report(&[a, b], &allocations(&[("A", 50), ("B", 50)]), None, 0.02)
                .unwrap();

        assert_eq!(report.periods, 2);
        assert_eq!(report.start_period, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        assert!(report.benchmark.is_none());

        let expected_mean = (0.155 + (0.10 - 1.0 / 11.0) / 2.0) / 2.0;
        let mean = report.get(Metric::ArithmeticMeanMonthly.key()).unwrap();
        assert!((mean - expected_mean).abs() < 1e-12);
        assert!(!report.contains(Metric::Beta.key()));

        // A's returns are both 0.1, so it has no variance to correlate
        let corr = report.correlation_matrix().unwrap();
        assert_eq!(corr.len(), 2);
        assert!(corr["A"]["A"].is_nan());
        assert!(corr["A"]["B"].is_nan());
        assert_eq!(corr["B"]["B"], 1.0);
    }

    #[test]
    fn test_benchmark_restricts_periods() {
        let a = monthly_prices("A", 2020, &[100.0, 102.0, 101.0, 104.0, 106.0, 105.0]);
        // Benchmark starts two months later
        let bench = PriceSeries::from_pairs(
            "SPY",
            &[
                (NaiveDate::from_ymd_opt(2020, 3, 10).unwrap(), 300.0),
                (NaiveDate::from_ymd_opt(2020, 4, 10).unwrap(), 310.0),
                (NaiveDate::from_ymd_opt(2020, 5, 10).unwrap(), 305.0),
                (NaiveDate::from_ymd_opt(2020, 6, 10).unwrap(), 315.0),
            ],
        )
        .unwrap();

        let report =
            compute_portfolio_report(&[a], &allocations(&[("A", 100)]), Some(&bench), 0.02)
                .unwrap();

        assert_eq!(report.periods, 3);
        assert_eq!(report.benchmark.as_deref(), Some("SPY"));
        assert!(report.contains(Metric::Beta.key()));
        assert!(report.contains(Metric::TrackingErrorAnnual.key()));
        // Correlation matrix still spans the full history of the holdings
        assert!(report.correlation_matrix().is_some());
    }

    #[test]
    fn test_disjoint_benchmark_is_skipped() {
        let a = monthly_prices("A", 2020, &[100.0, 102.0, 101.0]);
        let bench = monthly_prices("SPY", 2010, &[300.0, 310.0, 305.0]);

        let report =
            compute_portfolio_report(&[a], &allocations(&[("A", 100)]), Some(&bench), 0.02)
                .unwrap();

        assert_eq!(report.periods, 2);
        assert!(report.benchmark.is_none());
        assert!(!report.contains(Metric::Beta.key()));
        assert!(!report.contains(Metric::BenchmarkCorrelation.key()));
    }

    #[test]
    fn test_short_instrument_aborts() {
        let a = monthly_prices("A", 2020, &[100.0, 102.0, 101.0]);
        let b = monthly_prices("B", 2020, &[100.0]);

        let result =
            compute_portfolio_report(&[a, b], &allocations(&[("A", 50), ("B", 50)]), None, 0.02);
        assert!(matches!(result, Err(PortfolioLabError::InsufficientData(_))));
    }

    #[test]
    fn test_allocation_must_match_instruments() {
        let a = monthly_prices("A", 2020, &[100.0, 102.0, 101.0]);

        let result =
            compute_portfolio_report(&[a], &allocations(&[("A", 50), ("B", 50)]), None, 0.02);
        assert!(matches!(result, Err(PortfolioLabError::AllocationMismatch(_))));
    }
}

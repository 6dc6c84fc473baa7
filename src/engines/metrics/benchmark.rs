// src/engines/metrics/benchmark.rs
use super::{names::Metric, stats, DEFAULT_RISK_FREE_ANNUAL};
use crate::engines::returns::ReturnAligner;
use crate::error::Result;
use crate::types::ReturnSeries;
use std::collections::HashMap;

/// Benchmark-relative statistics for a portfolio return series.
pub struct BenchmarkComparator {
    risk_free_annual: f64,
}

impl Default for BenchmarkComparator {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_ANNUAL)
    }
}

impl BenchmarkComparator {
    pub fn new(risk_free_annual: f64) -> Self {
        Self { risk_free_annual }
    }

    /// Compares the two series over the periods they share.
    ///
    /// Fails with `NoOverlap` when they share none; the caller then reports no
    /// benchmark-relative metrics at all.
    pub fn compare(
        &self,
        portfolio: &ReturnSeries,
        benchmark: &ReturnSeries,
    ) -> Result<HashMap<String, f64>> {
        let (portfolio, benchmark) = ReturnAligner::align_pair(portfolio, benchmark)?;
        let p = portfolio.values();
        let b = benchmark.values();

        let mut metrics: HashMap<String, f64> = HashMap::new();
        let rf = self.risk_free_annual;

        let correlation = stats::pearson(&p, &b);
        metrics.insert(Metric::BenchmarkCorrelation.into(), correlation);
        metrics.insert(Metric::RSquared.into(), correlation * correlation);

        // Beta and alpha
        let benchmark_variance = stats::sample_variance(&b);
        let beta = if benchmark_variance > 0.0 {
            stats::sample_covariance(&p, &b) / benchmark_variance
        } else {
            f64::NAN
        };
        metrics.insert(Metric::Beta.into(), beta);

        let portfolio_annual = stats::annualize_rate(stats::mean(&p));
        let benchmark_annual = stats::annualize_rate(stats::mean(&b));
        let excess_annual = portfolio_annual - rf;

        if !beta.is_nan() {
            metrics.insert(
                Metric::AlphaAnnual.into(),
                portfolio_annual - (rf + beta * (benchmark_annual - rf)),
            );
        }

        let treynor = if beta != 0.0 {
            excess_annual / beta * 100.0
        } else {
            f64::NAN
        };
        metrics.insert(Metric::TreynorRatioPct.into(), treynor);

        // Active risk
        let differences: Vec<f64> = p.iter().zip(&b).map(|(x, y)| x - y).collect();
        let tracking_error = stats::annualize_volatility(stats::sample_std(&differences));
        let active_return = portfolio_annual - benchmark_annual;
        metrics.insert(Metric::TrackingErrorAnnual.into(), tracking_error);
        metrics.insert(Metric::ActiveReturnAnnual.into(), active_return);

        let information_ratio = if tracking_error > 0.0 {
            active_return / tracking_error
        } else {
            f64::NAN
        };
        metrics.insert(Metric::InformationRatio.into(), information_ratio);

        // M2 rescales the portfolio Sharpe ratio to benchmark volatility
        let benchmark_std_annual = stats::annualize_volatility(stats::sample_std(&b));
        if benchmark_std_annual > 0.0 {
            let portfolio_std_annual = stats::annualize_volatility(stats::sample_std(&p));
            let sharpe_annual = if portfolio_std_annual > 0.0 {
                excess_annual / portfolio_std_annual
            } else {
                f64::INFINITY
            };
            metrics.insert(
                Metric::M2.into(),
                sharpe_annual * benchmark_std_annual + rf,
            );
        }

        // Capture ratios
        if let Some(upside) = Self::capture_ratio(&p, &b, |r| r > 0.0) {
            metrics.insert(Metric::UpsideCapturePct.into(), upside);
        }
        if let Some(downside) = Self::capture_ratio(&p, &b, |r| r < 0.0) {
            metrics.insert(Metric::DownsideCapturePct.into(), downside);
        }

        log::debug!(
            "Benchmark comparison over {} shared periods, beta {:.4}",
            p.len(),
            beta
        );

        Ok(metrics)
    }

    /// Mean portfolio over mean benchmark return (x100) for periods selected by
    /// the benchmark's direction. `None` for an empty subset or zero benchmark mean.
    fn capture_ratio<F>(portfolio: &[f64], benchmark: &[f64], select: F) -> Option<f64>
    where
        F: Fn(f64) -> bool,
    {
        let (p, b): (Vec<f64>, Vec<f64>) = portfolio
            .iter()
            .zip(benchmark)
            .filter(|(_, bm)| select(**bm))
            .map(|(&pf, &bm)| (pf, bm))
            .unzip();

        if b.is_empty() {
            return None;
        }

        let benchmark_mean = stats::mean(&b);
        if benchmark_mean == 0.0 {
            return None;
        }

        Some(stats::mean(&p) / benchmark_mean * 100.0)
    }
}

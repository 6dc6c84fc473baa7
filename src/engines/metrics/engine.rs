// src/engines/metrics/engine.rs
use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics, DEFAULT_RISK_FREE_ANNUAL};
use crate::error::{PortfolioLabError, Result};
use crate::types::ReturnSeries;
use std::collections::HashMap;

pub struct MetricsEngine {
    risk_free_annual: f64,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_ANNUAL)
    }
}

impl MetricsEngine {
    pub fn new(risk_free_annual: f64) -> Self {
        Self { risk_free_annual }
    }

    /// Every single-series metric for `returns`.
    ///
    /// Degenerate inputs (zero variance, no drawdown, no losses) produce
    /// `+inf` or `NaN` entries; only an empty series is an error.
    pub fn compute(&self, returns: &ReturnSeries) -> Result<HashMap<String, f64>> {
        if returns.is_empty() {
            return Err(PortfolioLabError::EmptySeries);
        }

        let mut all_metrics = HashMap::new();

        // Return, best/worst and win/loss metrics
        all_metrics.extend(ProfitabilityMetrics::calculate(returns));

        // Volatility, drawdown, ratio, VaR and shape metrics
        all_metrics.extend(RiskMetrics::new(self.risk_free_annual).calculate(returns)?);

        log::debug!(
            "Computed {} metrics over {} periods",
            all_metrics.len(),
            returns.len()
        );

        Ok(all_metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::metrics::Metric;

    #[test]
    fn test_empty_series_is_an_error() {
        let engine = MetricsEngine::default();
        let result = engine.compute(&ReturnSeries::default());
        assert!(matches!(result, Err(PortfolioLabError::EmptySeries)));
    }

    #[test]
    fn test_compute_contains_both_families() {
        let returns = ReturnSeries::monthly(2019, 1, &[0.02, -0.01, 0.03, 0.01]).unwrap();
        let metrics = MetricsEngine::default().compute(&returns).unwrap();

        assert!(metrics.contains_key(Metric::ArithmeticMeanMonthly.key()));
        assert!(metrics.contains_key(Metric::SharpeRatioAnnual.key()));
        assert!(metrics.contains_key(Metric::Kurtosis.key()));
        assert!(metrics.contains_key(Metric::SafeWithdrawalRate.key()));
        assert!(!metrics.contains_key(Metric::BestYear.key()));
    }

    #[test]
    fn test_single_period_series() {
        let returns = ReturnSeries::monthly(2019, 1, &[0.05]).unwrap();
        let metrics = MetricsEngine::default().compute(&returns).unwrap();

        assert!(metrics[Metric::StdDevMonthly.key()].is_nan());
        assert_eq!(metrics[Metric::SharpeRatioMonthly.key()], f64::INFINITY);
        assert_eq!(metrics[Metric::MaxDrawdown.key()], 0.0);
    }
}

// src/engines/metrics/risk.rs
use super::{names::Metric, stats};
use crate::error::Result;
use crate::types::ReturnSeries;
use std::collections::HashMap;

/// Tail probability used for every VaR flavour.
pub const VAR_TAIL: f64 = 0.05;

pub struct RiskMetrics {
    risk_free_annual: f64,
}

impl RiskMetrics {
    pub fn new(risk_free_annual: f64) -> Self {
        Self { risk_free_annual }
    }

    pub fn calculate(&self, returns: &ReturnSeries) -> Result<HashMap<String, f64>> {
        let mut metrics: HashMap<String, f64> = HashMap::new();

        let values = returns.values();
        if values.is_empty() {
            return Ok(metrics);
        }

        let mean = stats::mean(&values);
        let mean_annual = stats::annualize_rate(mean);
        let risk_free_monthly = stats::periodic_rate(self.risk_free_annual);

        // Volatility
        let std_monthly = stats::sample_std(&values);
        let std_annual = stats::annualize_volatility(std_monthly);
        metrics.insert(Metric::StdDevMonthly.into(), std_monthly);
        metrics.insert(Metric::StdDevAnnual.into(), std_annual);

        let downside_monthly = Self::downside_deviation(&values);
        let downside_annual = stats::annualize_volatility(downside_monthly);
        metrics.insert(Metric::DownsideDeviationMonthly.into(), downside_monthly);
        metrics.insert(Metric::DownsideDeviationAnnual.into(), downside_annual);

        // Drawdown
        let max_dd = Self::max_drawdown(&values);
        metrics.insert(Metric::MaxDrawdown.into(), max_dd);

        // Ratios; a non-positive or undefined denominator means infinite
        let excess_monthly = mean - risk_free_monthly;
        let excess_annual = mean_annual - self.risk_free_annual;

        metrics.insert(
            Metric::SharpeRatioMonthly.into(),
            Self::ratio(excess_monthly, std_monthly),
        );
        metrics.insert(
            Metric::SharpeRatioAnnual.into(),
            Self::ratio(excess_annual, std_annual),
        );
        metrics.insert(
            Metric::SortinoRatioMonthly.into(),
            Self::ratio(excess_monthly, downside_monthly),
        );
        metrics.insert(
            Metric::SortinoRatioAnnual.into(),
            Self::ratio(excess_annual, downside_annual),
        );

        let calmar = if max_dd != 0.0 {
            mean_annual / max_dd.abs()
        } else {
            f64::INFINITY
        };
        metrics.insert(Metric::CalmarRatio.into(), calmar);

        // Value at risk
        let historical_var = stats::percentile(&values, VAR_TAIL * 100.0);
        metrics.insert(Metric::HistoricalVar5.into(), historical_var);
        metrics.insert(
            Metric::AnalyticalVar5.into(),
            mean + stats::standard_normal_quantile(VAR_TAIL)? * std_monthly,
        );

        let tail: Vec<f64> = values
            .iter()
            .copied()
            .filter(|&r| r <= historical_var)
            .collect();
        let conditional_var = if tail.is_empty() {
            f64::NAN
        } else {
            stats::mean(&tail)
        };
        metrics.insert(Metric::ConditionalVar5.into(), conditional_var);

        // Distribution shape
        let (skewness, kurtosis) = stats::skewness_kurtosis(&values);
        metrics.insert(Metric::Skewness.into(), skewness);
        metrics.insert(Metric::Kurtosis.into(), kurtosis);

        Ok(metrics)
    }

    /// Sample standard deviation of the negative returns, zero when there are none.
    pub fn downside_deviation(values: &[f64]) -> f64 {
        let negative: Vec<f64> = values.iter().copied().filter(|&r| r < 0.0).collect();
        if negative.is_empty() {
            return 0.0;
        }
        stats::sample_std(&negative)
    }

    /// Most negative `W[t] / max(W[..=t]) - 1` over the cumulative wealth index.
    pub fn max_drawdown(values: &[f64]) -> f64 {
        let mut wealth = 1.0;
        let mut peak = f64::NEG_INFINITY;
        let mut max_dd: f64 = 0.0;

        for r in values {
            wealth *= 1.0 + r;
            if wealth > peak {
                peak = wealth;
            }
            let dd = wealth / peak - 1.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }

        max_dd
    }

    fn ratio(excess: f64, risk: f64) -> f64 {
        if risk > 0.0 {
            excess / risk
        } else {
            f64::INFINITY
        }
    }
}

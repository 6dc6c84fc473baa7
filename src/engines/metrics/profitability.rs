// src/engines/metrics/profitability.rs
use super::{names::Metric, stats, PERIODS_PER_YEAR};
use crate::types::ReturnSeries;
use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};

/// Withdrawal heuristics subtract these margins from the geometric annual return.
const SAFE_WITHDRAWAL_MARGIN: f64 = 0.02;
const PERPETUAL_WITHDRAWAL_MARGIN: f64 = 0.01;

pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    pub fn calculate(returns: &ReturnSeries) -> HashMap<String, f64> {
        let mut metrics: HashMap<String, f64> = HashMap::new();

        let values = returns.values();
        if values.is_empty() {
            return metrics;
        }
        let n = values.len() as f64;

        // Means
        let mean = stats::mean(&values);
        metrics.insert(Metric::ArithmeticMeanMonthly.into(), mean);
        metrics.insert(Metric::ArithmeticMeanAnnual.into(), stats::annualize_rate(mean));

        let geometric = Self::geometric_mean(&values);
        let geometric_annual = stats::annualize_rate(geometric);
        metrics.insert(Metric::GeometricMeanMonthly.into(), geometric);
        metrics.insert(Metric::GeometricMeanAnnual.into(), geometric_annual);

        // Best / worst periods
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = values.iter().copied().fold(f64::INFINITY, f64::min);
        metrics.insert(Metric::BestMonth.into(), best);
        metrics.insert(Metric::WorstMonth.into(), worst);

        if values.len() >= PERIODS_PER_YEAR as usize {
            let yearly = Self::calendar_year_returns(returns);
            let best_year = yearly.values().copied().fold(f64::NEG_INFINITY, f64::max);
            let worst_year = yearly.values().copied().fold(f64::INFINITY, f64::min);
            metrics.insert(Metric::BestYear.into(), best_year);
            metrics.insert(Metric::WorstYear.into(), worst_year);
        }

        // Win / loss
        let gains: Vec<f64> = values.iter().copied().filter(|&r| r > 0.0).collect();
        let losses: Vec<f64> = values.iter().copied().filter(|&r| r < 0.0).collect();

        metrics.insert(Metric::PositivePeriods.into(), gains.len() as f64);
        metrics.insert(
            Metric::PositivePeriodsPct.into(),
            gains.len() as f64 / n * 100.0,
        );

        let avg_gain = if gains.is_empty() { 0.0 } else { stats::mean(&gains) };
        let avg_loss = if losses.is_empty() {
            0.0
        } else {
            stats::mean(&losses).abs()
        };
        let gain_loss = if avg_loss > 0.0 {
            avg_gain / avg_loss
        } else {
            f64::INFINITY
        };
        metrics.insert(Metric::GainLossRatio.into(), gain_loss);

        // Rough heuristics, not simulation based
        metrics.insert(
            Metric::SafeWithdrawalRate.into(),
            0f64.max(geometric_annual - SAFE_WITHDRAWAL_MARGIN),
        );
        metrics.insert(
            Metric::PerpetualWithdrawalRate.into(),
            0f64.max(geometric_annual - PERPETUAL_WITHDRAWAL_MARGIN),
        );

        metrics
    }

    /// `prod(1 + r)^(1/n) - 1`
    pub fn geometric_mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        let growth: f64 = values.iter().map(|r| 1.0 + r).product();
        growth.powf(1.0 / values.len() as f64) - 1.0
    }

    /// Compounded return of each calendar year present in the series.
    pub fn calendar_year_returns(returns: &ReturnSeries) -> BTreeMap<i32, f64> {
        let mut growth: BTreeMap<i32, f64> = BTreeMap::new();
        for point in returns.points() {
            *growth.entry(point.period_end.year()).or_insert(1.0) *= 1.0 + point.value;
        }
        growth.into_iter().map(|(year, g)| (year, g - 1.0)).collect()
    }
}

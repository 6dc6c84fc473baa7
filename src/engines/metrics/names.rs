/// Report key for the instrument correlation matrix
pub const CORRELATION_MATRIX_KEY: &str = "correlation_matrix";

/// Every metric the engine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    ArithmeticMeanMonthly,
    ArithmeticMeanAnnual,
    GeometricMeanMonthly,
    GeometricMeanAnnual,
    StdDevMonthly,
    StdDevAnnual,
    DownsideDeviationMonthly,
    DownsideDeviationAnnual,
    MaxDrawdown,
    BestMonth,
    WorstMonth,
    BestYear,
    WorstYear,
    SharpeRatioMonthly,
    SharpeRatioAnnual,
    SortinoRatioMonthly,
    SortinoRatioAnnual,
    CalmarRatio,
    HistoricalVar5,
    AnalyticalVar5,
    ConditionalVar5,
    Skewness,
    Kurtosis,
    PositivePeriods,
    PositivePeriodsPct,
    GainLossRatio,
    SafeWithdrawalRate,
    PerpetualWithdrawalRate,
    // Benchmark-relative
    BenchmarkCorrelation,
    Beta,
    AlphaAnnual,
    RSquared,
    TreynorRatioPct,
    TrackingErrorAnnual,
    ActiveReturnAnnual,
    InformationRatio,
    M2,
    UpsideCapturePct,
    DownsideCapturePct,
    CorrelationMatrix,
}

impl Metric {
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ArithmeticMeanMonthly => "arithmetic_mean_monthly",
            Self::ArithmeticMeanAnnual => "arithmetic_mean_annual",
            Self::GeometricMeanMonthly => "geometric_mean_monthly",
            Self::GeometricMeanAnnual => "geometric_mean_annual",
            Self::StdDevMonthly => "std_dev_monthly",
            Self::StdDevAnnual => "std_dev_annual",
            Self::DownsideDeviationMonthly => "downside_deviation_monthly",
            Self::DownsideDeviationAnnual => "downside_deviation_annual",
            Self::MaxDrawdown => "max_drawdown",
            Self::BestMonth => "best_month",
            Self::WorstMonth => "worst_month",
            Self::BestYear => "best_year",
            Self::WorstYear => "worst_year",
            Self::SharpeRatioMonthly => "sharpe_ratio_monthly",
            Self::SharpeRatioAnnual => "sharpe_ratio_annual",
            Self::SortinoRatioMonthly => "sortino_ratio_monthly",
            Self::SortinoRatioAnnual => "sortino_ratio_annual",
            Self::CalmarRatio => "calmar_ratio",
            Self::HistoricalVar5 => "historical_var_5",
            Self::AnalyticalVar5 => "analytical_var_5",
            Self::ConditionalVar5 => "conditional_var_5",
            Self::Skewness => "skewness",
            Self::Kurtosis => "kurtosis",
            Self::PositivePeriods => "positive_periods",
            Self::PositivePeriodsPct => "positive_periods_pct",
            Self::GainLossRatio => "gain_loss_ratio",
            Self::SafeWithdrawalRate => "safe_withdrawal_rate",
            Self::PerpetualWithdrawalRate => "perpetual_withdrawal_rate",
            Self::BenchmarkCorrelation => "benchmark_correlation",
            Self::Beta => "beta",
            Self::AlphaAnnual => "alpha_annual",
            Self::RSquared => "r_squared",
            Self::TreynorRatioPct => "treynor_ratio_pct",
            Self::TrackingErrorAnnual => "tracking_error_annual",
            Self::ActiveReturnAnnual => "active_return_annual",
            Self::InformationRatio => "information_ratio",
            Self::M2 => "m2",
            Self::UpsideCapturePct => "upside_capture_pct",
            Self::DownsideCapturePct => "downside_capture_pct",
            Self::CorrelationMatrix => CORRELATION_MATRIX_KEY,
        }
    }

    /// Human-readable name for tabular output
    pub fn label(&self) -> &'static str {
        match self {
            Self::ArithmeticMeanMonthly => "Arithmetic Mean (monthly)",
            Self::ArithmeticMeanAnnual => "Arithmetic Mean (annualized)",
            Self::GeometricMeanMonthly => "Geometric Mean (monthly)",
            Self::GeometricMeanAnnual => "Geometric Mean (annualized)",
            Self::StdDevMonthly => "Standard Deviation (monthly)",
            Self::StdDevAnnual => "Standard Deviation (annualized)",
            Self::DownsideDeviationMonthly => "Downside Deviation (monthly)",
            Self::DownsideDeviationAnnual => "Downside Deviation (annualized)",
            Self::MaxDrawdown => "Maximum Drawdown",
            Self::BestMonth => "Best Month",
            Self::WorstMonth => "Worst Month",
            Self::BestYear => "Best Year",
            Self::WorstYear => "Worst Year",
            Self::SharpeRatioMonthly => "Sharpe Ratio (monthly)",
            Self::SharpeRatioAnnual => "Sharpe Ratio (annualized)",
            Self::SortinoRatioMonthly => "Sortino Ratio (monthly)",
            Self::SortinoRatioAnnual => "Sortino Ratio (annualized)",
            Self::CalmarRatio => "Calmar Ratio",
            Self::HistoricalVar5 => "Historical VaR (5%)",
            Self::AnalyticalVar5 => "Analytical VaR (5%)",
            Self::ConditionalVar5 => "Conditional VaR (5%)",
            Self::Skewness => "Skewness",
            Self::Kurtosis => "Kurtosis",
            Self::PositivePeriods => "Positive Periods",
            Self::PositivePeriodsPct => "Positive Periods (%)",
            Self::GainLossRatio => "Gain/Loss Ratio",
            Self::SafeWithdrawalRate => "Safe Withdrawal Rate",
            Self::PerpetualWithdrawalRate => "Perpetual Withdrawal Rate",
            Self::BenchmarkCorrelation => "Benchmark Correlation",
            Self::Beta => "Beta",
            Self::AlphaAnnual => "Alpha (annualized)",
            Self::RSquared => "R-squared",
            Self::TreynorRatioPct => "Treynor Ratio (%)",
            Self::TrackingErrorAnnual => "Tracking Error (annualized)",
            Self::ActiveReturnAnnual => "Active Return (annualized)",
            Self::InformationRatio => "Information Ratio",
            Self::M2 => "Modigliani-Modigliani (M2)",
            Self::UpsideCapturePct => "Upside Capture Ratio (%)",
            Self::DownsideCapturePct => "Downside Capture Ratio (%)",
            Self::CorrelationMatrix => "Correlation Matrix",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::ArithmeticMeanMonthly,
            Self::ArithmeticMeanAnnual,
            Self::GeometricMeanMonthly,
            Self::GeometricMeanAnnual,
            Self::StdDevMonthly,
            Self::StdDevAnnual,
            Self::DownsideDeviationMonthly,
            Self::DownsideDeviationAnnual,
            Self::MaxDrawdown,
            Self::BestMonth,
            Self::WorstMonth,
            Self::BestYear,
            Self::WorstYear,
            Self::SharpeRatioMonthly,
            Self::SharpeRatioAnnual,
            Self::SortinoRatioMonthly,
            Self::SortinoRatioAnnual,
            Self::CalmarRatio,
            Self::HistoricalVar5,
            Self::AnalyticalVar5,
            Self::ConditionalVar5,
            Self::Skewness,
            Self::Kurtosis,
            Self::PositivePeriods,
            Self::PositivePeriodsPct,
            Self::GainLossRatio,
            Self::SafeWithdrawalRate,
            Self::PerpetualWithdrawalRate,
            Self::BenchmarkCorrelation,
            Self::Beta,
            Self::AlphaAnnual,
            Self::RSquared,
            Self::TreynorRatioPct,
            Self::TrackingErrorAnnual,
            Self::ActiveReturnAnnual,
            Self::InformationRatio,
            Self::M2,
            Self::UpsideCapturePct,
            Self::DownsideCapturePct,
            Self::CorrelationMatrix,
        ]
    }
}

impl From<Metric> for String {
    fn from(metric: Metric) -> Self {
        metric.key().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let all = Metric::all();
        let keys: HashSet<&str> = all.iter().map(|m| m.key()).collect();
        assert_eq!(keys.len(), all.len());
    }
}

//! Descriptive statistics shared by the metric calculators.
//!
//! Conventions follow the usual dataframe defaults: sample (n - 1) variance,
//! linear-interpolated percentiles, population moments for shape statistics.
//! Undefined results are `NaN` rather than errors.

use super::PERIODS_PER_YEAR;
use crate::error::{PortfolioLabError, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Sample variance; `NaN` for fewer than two values, exactly zero for a constant series.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() >= 2 && is_constant(values) {
        return 0.0;
    }
    values.iter().variance()
}

pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

pub fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    x[..n].iter().covariance(y[..n].iter())
}

/// Pearson correlation clamped to [-1, 1]; `NaN` when either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    let sx = sample_std(&x[..n]);
    let sy = sample_std(&y[..n]);

    if !(sx > 0.0 && sy > 0.0) {
        return f64::NAN;
    }

    (sample_covariance(&x[..n], &y[..n]) / (sx * sy)).clamp(-1.0, 1.0)
}

/// Percentile `q` (0..=100) with linear interpolation between order statistics.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = (q / 100.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Population skewness and Pearson (non-excess) kurtosis.
pub fn skewness_kurtosis(values: &[f64]) -> (f64, f64) {
    if values.is_empty() || is_constant(values) {
        return (f64::NAN, f64::NAN);
    }

    let n = values.len() as f64;
    let m = mean(values);
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    (m3 / m2.powf(1.5), m4 / (m2 * m2))
}

/// Compounds a per-period rate to an annual one.
pub fn annualize_rate(monthly: f64) -> f64 {
    (1.0 + monthly).powf(PERIODS_PER_YEAR) - 1.0
}

/// De-compounds an annual rate to a per-period one.
pub fn periodic_rate(annual: f64) -> f64 {
    (1.0 + annual).powf(1.0 / PERIODS_PER_YEAR) - 1.0
}

pub fn annualize_volatility(monthly: f64) -> f64 {
    monthly * PERIODS_PER_YEAR.sqrt()
}

/// Quantile of the standard normal distribution at probability `p`.
pub fn standard_normal_quantile(p: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| {
        PortfolioLabError::Numerical(format!("Failed to construct normal distribution: {}", e))
    })?;
    Ok(normal.inverse_cdf(p))
}

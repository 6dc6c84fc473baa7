use crate::error::{PortfolioLabError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing price history for a single instrument.
///
/// Dates are strictly increasing and every price is finite and positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    instrument: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(instrument: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let instrument = instrument.into();

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(PortfolioLabError::InvalidSeries(format!(
                    "{}: dates must be strictly increasing ({} follows {})",
                    instrument, pair[1].date, pair[0].date
                )));
            }
        }

        if let Some(bad) = points.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
            return Err(PortfolioLabError::InvalidSeries(format!(
                "{}: invalid close {} on {}",
                instrument, bad.close, bad.date
            )));
        }

        Ok(Self { instrument, points })
    }

    pub fn from_pairs(instrument: impl Into<String>, pairs: &[(NaiveDate, f64)]) -> Result<Self> {
        let points = pairs
            .iter()
            .map(|&(date, close)| PricePoint { date, close })
            .collect();
        Self::new(instrument, points)
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Observations with `start <= date <= end`.
    pub fn slice_range(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        Self {
            instrument: self.instrument.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }
}

/// One monthly return, keyed by the calendar month-end date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub period_end: NaiveDate,
    pub value: f64,
}

/// Monthly fractional returns ordered by period end.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(points: Vec<ReturnPoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].period_end <= pair[0].period_end {
                return Err(PortfolioLabError::InvalidSeries(format!(
                    "return periods must be strictly increasing ({} follows {})",
                    pair[1].period_end, pair[0].period_end
                )));
            }
        }
        Ok(Self { points })
    }

    /// Consecutive month-end periods starting at `year`/`month`.
    pub fn monthly(year: i32, month: u32, values: &[f64]) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            PortfolioLabError::InvalidSeries(format!("invalid start month {}-{}", year, month))
        })?;

        let mut points = Vec::with_capacity(values.len());
        let mut period = first;
        for &value in values {
            let period_end = month_end(period);
            points.push(ReturnPoint { period_end, value });
            period = period_end.succ_opt().ok_or_else(|| {
                PortfolioLabError::InvalidSeries("period beyond supported date range".to_string())
            })?;
        }

        Ok(Self { points })
    }

    pub(crate) fn from_sorted(points: Vec<ReturnPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.period_end).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_period(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.period_end)
    }

    pub fn last_period(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.period_end)
    }
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Integer percentage weights per instrument, summing to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSet {
    entries: Vec<(String, u32)>,
}

impl AllocationSet {
    pub fn new(entries: Vec<(String, i64)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(PortfolioLabError::InvalidAllocation(
                "at least one instrument is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        let mut validated = Vec::with_capacity(entries.len());
        let mut total = 0i64;

        for (id, weight) in entries {
            if !(0..=100).contains(&weight) {
                return Err(PortfolioLabError::InvalidAllocation(format!(
                    "weight for {} must be between 0 and 100, got {}",
                    id, weight
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(PortfolioLabError::InvalidAllocation(format!(
                    "instrument {} listed more than once",
                    id
                )));
            }
            total += weight;
            validated.push((id, weight as u32));
        }

        if total != 100 {
            return Err(PortfolioLabError::InvalidAllocation(format!(
                "weights must sum to 100%, got {}%",
                total
            )));
        }

        Ok(Self { entries: validated })
    }

    /// Builds from parallel ticker and weight lists.
    pub fn from_parallel(tickers: &[String], weights: &[i64]) -> Result<Self> {
        if tickers.len() != weights.len() {
            return Err(PortfolioLabError::InvalidAllocation(format!(
                "{} tickers but {} allocations",
                tickers.len(),
                weights.len()
            )));
        }
        Self::new(tickers.iter().cloned().zip(weights.iter().copied()).collect())
    }

    pub fn weight(&self, id: &str) -> Option<u32> {
        self.entries.iter().find(|(i, _)| i == id).map(|(_, w)| *w)
    }

    /// Weight as a fraction of one.
    pub fn decimal_weight(&self, id: &str) -> Option<f64> {
        self.weight(id).map(|w| w as f64 / 100.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(id, w)| (id.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Return series of several instruments restricted to their common periods.
///
/// Row `i` holds one value per instrument for `dates[i]`, in `instruments` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedReturnMatrix {
    instruments: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl AlignedReturnMatrix {
    pub(crate) fn new(instruments: Vec<String>, dates: Vec<NaiveDate>, rows: Vec<Vec<f64>>) -> Self {
        Self { instruments, dates, rows }
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[index]).collect()
    }

    pub fn column_series(&self, id: &str) -> Option<ReturnSeries> {
        let index = self.instruments.iter().position(|i| i == id)?;
        let points = self
            .dates
            .iter()
            .zip(self.rows.iter())
            .map(|(&period_end, row)| ReturnPoint {
                period_end,
                value: row[index],
            })
            .collect();
        Some(ReturnSeries::from_sorted(points))
    }
}

pub type CorrelationMatrix = BTreeMap<String, BTreeMap<String, f64>>;

/// A single report entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Matrix(CorrelationMatrix),
}

/// Complete output of one portfolio analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub periods: usize,
    pub start_period: NaiveDate,
    pub end_period: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
    pub metrics: BTreeMap<String, MetricValue>,
}

impl MetricsReport {
    pub fn get(&self, key: &str) -> Option<f64> {
        match self.metrics.get(key) {
            Some(MetricValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.metrics.contains_key(key)
    }

    pub fn correlation_matrix(&self) -> Option<&CorrelationMatrix> {
        match self.metrics.get(crate::engines::metrics::CORRELATION_MATRIX_KEY) {
            Some(MetricValue::Matrix(m)) => Some(m),
            _ => None,
        }
    }
}

/// Portfolio analysis request, as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub tickers: Vec<String>,
    pub allocations: Vec<i64>,
    /// First month, `YYYY-MM`
    pub start: String,
    /// Last month, `YYYY-MM`
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_free_annual: Option<f64>,
}

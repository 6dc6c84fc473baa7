// src/engines/analyzer.rs
use crate::config::AnalysisConfig;
use crate::data::PriceProvider;
use crate::engines::report::compute_portfolio_report;
use crate::error::{PortfolioLabError, Result};
use crate::types::{month_end, AllocationSet, MetricsReport, PortfolioRequest};
use chrono::NaiveDate;
use rayon::prelude::*;

/// Runs portfolio requests against a price provider.
pub struct PortfolioAnalyzer<P: PriceProvider> {
    provider: P,
    config: AnalysisConfig,
}

impl<P: PriceProvider> PortfolioAnalyzer<P> {
    pub fn new(provider: P, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Validates the request, fetches its prices and builds the report.
    ///
    /// Allocation and date range are checked before anything is fetched.
    pub fn analyze(&self, request: &PortfolioRequest) -> Result<MetricsReport> {
        let allocations = AllocationSet::from_parallel(&request.tickers, &request.allocations)?;
        let (start, end) = parse_month_range(&request.start, &request.end)?;

        let risk_free = request.risk_free_annual.unwrap_or(self.config.risk_free_annual);
        if AnalysisConfig::check_risk_free(risk_free).is_err() {
            return Err(PortfolioLabError::InvalidRequest(format!(
                "risk-free rate {} is outside (-1, 1)",
                risk_free
            )));
        }

        log::info!(
            "Analyzing {} ({} instruments, {} to {})",
            request.name.as_deref().unwrap_or("portfolio"),
            allocations.len(),
            start,
            end
        );

        let prices = allocations
            .ids()
            .map(|id| self.provider.fetch_price_series(id, start, end))
            .collect::<Result<Vec<_>>>()?;

        let benchmark = request.benchmark_ticker.as_deref().and_then(|id| {
            match self.provider.fetch_price_series(id, start, end) {
                Ok(series) => Some(series),
                Err(e) => {
                    log::warn!("Benchmark {} unavailable, continuing without it: {}", id, e);
                    None
                }
            }
        });

        compute_portfolio_report(&prices, &allocations, benchmark.as_ref(), risk_free)
    }

    /// Evaluates independent requests in parallel, preserving input order.
    pub fn analyze_batch(&self, requests: &[PortfolioRequest]) -> Vec<Result<MetricsReport>> {
        log::info!("Running batch of {} requests", requests.len());
        requests.par_iter().map(|r| self.analyze(r)).collect()
    }
}

/// First day of the `start` month through the last day of the `end` month.
pub fn parse_month_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let first = parse_month(start)?;
    let last = month_end(parse_month(end)?);

    if first > last {
        return Err(PortfolioLabError::InvalidRequest(format!(
            "start month {} is after end month {}",
            start, end
        )));
    }

    Ok((first, last))
}

fn parse_month(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let valid_shape = value.len() == 7 && value.as_bytes().get(4) == Some(&b'-');
    valid_shape
        .then(|| NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok())
        .flatten()
        .ok_or_else(|| {
            PortfolioLabError::InvalidRequest(format!("expected YYYY-MM, got '{}'", value))
        })
}

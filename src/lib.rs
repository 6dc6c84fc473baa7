//! Risk and return metrics for weighted portfolios built from monthly price
//! history.
//!
//! [`compute_portfolio_report`] is the pure entry point: price series in,
//! [`MetricsReport`] out. [`PortfolioAnalyzer`] adds request validation and
//! price fetching through a [`PriceProvider`].

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use crate::config::{AnalysisConfig, AppConfig, ConfigManager, DataConfig};
pub use crate::data::{CachedPriceProvider, CsvDirectoryProvider, PriceCache, PriceProvider};
pub use crate::engines::metrics::{Metric, MetricsEngine, CORRELATION_MATRIX_KEY};
pub use crate::engines::{compute_portfolio_report, PortfolioAnalyzer};
pub use crate::error::{PortfolioLabError, Result};
pub use crate::types::{
    AlignedReturnMatrix, AllocationSet, CorrelationMatrix, MetricValue, MetricsReport,
    PortfolioRequest, PricePoint, PriceSeries, ReturnPoint, ReturnSeries,
};

pub mod benchmark;
pub mod correlation;
pub mod engine;
pub mod names;
pub mod profitability;
pub mod risk;
pub mod stats;

/// Monthly data: twelve periods per year
pub const PERIODS_PER_YEAR: f64 = 12.0;

pub const DEFAULT_RISK_FREE_ANNUAL: f64 = 0.02;

pub use benchmark::BenchmarkComparator;
pub use correlation::CorrelationMatrixBuilder;
pub use engine::MetricsEngine;
pub use names::{Metric, CORRELATION_MATRIX_KEY};
pub use profitability::ProfitabilityMetrics;
pub use risk::RiskMetrics;

pub mod analyzer;
pub mod metrics;
pub mod report;
pub mod returns;

pub use analyzer::{parse_month_range, PortfolioAnalyzer};
pub use report::compute_portfolio_report;

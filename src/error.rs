use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioLabError {
    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("No overlapping data periods found: {0}")]
    NoOverlap(String),

    #[error("Allocation mismatch: {0}")]
    AllocationMismatch(String),

    #[error("Return series is empty")]
    EmptySeries,

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl PortfolioLabError {
    /// Stable discriminator for callers that map errors to status codes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAllocation(_) => "invalid_allocation",
            Self::InsufficientData(_) => "insufficient_data",
            Self::NoOverlap(_) => "no_overlap",
            Self::AllocationMismatch(_) => "allocation_mismatch",
            Self::EmptySeries => "empty_series",
            Self::InvalidSeries(_) => "invalid_series",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Numerical(_) => "numerical",
            Self::DataLoading(_) => "data_loading",
            Self::Configuration(_) => "configuration",
            Self::Io(_) => "io",
            Self::Polars(_) => "polars",
            Self::Serde(_) => "serde",
        }
    }
}

pub type Result<T> = std::result::Result<T, PortfolioLabError>;

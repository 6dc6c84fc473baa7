use serde::{Deserialize, Serialize};

/// Columns a price history file must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Date,
    Close,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Close => "close",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Date, Self::Close]
    }

    /// Common alternative column names, in order of preference
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            // yfinance exports put the ticker header row under "Price"
            Self::Date => vec![
                "date", "Date", "DATE", "datetime", "Datetime", "DateTime", "timestamp", "Price",
            ],
            Self::Close => vec![
                "close", "Close", "CLOSE", "Adj Close", "adj_close", "adjclose", "c",
            ],
        }
    }
}

/// Summary of a loaded price file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub date_column: String,
    pub close_column: String,
    pub skipped_rows: usize,
}

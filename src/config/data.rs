use super::traits::ConfigSection;
use crate::error::PortfolioLabError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `<ID>_historical.csv` files
    pub data_dir: PathBuf,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
    /// Rows a price file needs before it is parsed
    pub min_rows: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_capacity: 256,
            cache_ttl_secs: 3600,
            min_rows: 2,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), PortfolioLabError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(PortfolioLabError::Configuration(
                "Data directory must not be empty".to_string(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(PortfolioLabError::Configuration(
                "Cache capacity must be at least 1".to_string(),
            ));
        }
        if self.min_rows == 0 {
            return Err(PortfolioLabError::Configuration(
                "Minimum rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        let config = DataConfig {
            cache_capacity: 0,
            ..DataConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_min_rows_rejected() {
        let config = DataConfig {
            min_rows: 0,
            ..DataConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

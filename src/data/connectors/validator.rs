use super::types::RequiredColumn;
use crate::error::{PortfolioLabError, Result};
use polars::prelude::*;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Resolves the date and close columns, failing if either is missing.
    pub fn validate_price_columns(df: &DataFrame) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(PortfolioLabError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        Ok(column_map)
    }

    /// Find column by checking aliases
    pub fn find_column(df: &DataFrame, required: &RequiredColumn) -> Option<&'static str> {
        let columns = df.get_column_names();
        required
            .aliases()
            .into_iter()
            .find(|alias| columns.iter().any(|col| col.as_str() == *alias))
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(PortfolioLabError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Columns containing nulls, with their null counts
    pub fn check_nulls(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "Date" => &["2020-01-31", "2020-02-28"],
            "Close" => &[100.5, 102.0],
        }
        .unwrap();

        let columns = DataValidator::validate_price_columns(&df).unwrap();
        assert_eq!(columns[&RequiredColumn::Date], "Date");
        assert_eq!(columns[&RequiredColumn::Close], "Close");
    }

    #[test]
    fn test_validate_missing_column() {
        let df = df! {
            "Date" => &["2020-01-31", "2020-02-28"],
            "Volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        let result = DataValidator::validate_price_columns(&df);
        assert!(matches!(result, Err(PortfolioLabError::DataLoading(_))));
    }

    #[test]
    fn test_close_alias_preference() {
        let df = df! {
            "datetime" => &["2020-01-31", "2020-02-28"],
            "Adj Close" => &[99.0, 101.0],
            "Close" => &[100.0, 102.0],
        }
        .unwrap();

        let columns = DataValidator::validate_price_columns(&df).unwrap();
        assert_eq!(columns[&RequiredColumn::Date], "datetime");
        assert_eq!(columns[&RequiredColumn::Close], "Close");
    }

    #[test]
    fn test_minimum_rows() {
        let df = df! {
            "Date" => &["2020-01-31"],
            "Close" => &[100.0],
        }
        .unwrap();

        assert!(DataValidator::validate_minimum_rows(&df, 1).is_ok());
        assert!(DataValidator::validate_minimum_rows(&df, 2).is_err());
    }

    #[test]
    fn test_check_nulls() {
        let df = df! {
            "Date" => &["2020-01-31", "2020-02-28"],
            "Close" => &[Some(100.0), None],
        }
        .unwrap();

        assert_eq!(DataValidator::check_nulls(&df), vec![("Close".to_string(), 1)]);
    }
}

use super::{
    types::{DatasetMetadata, RequiredColumn},
    validator::DataValidator,
};
use crate::error::{PortfolioLabError, Result};
use crate::types::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| PortfolioLabError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load, validate and convert a price history file
    pub fn load_price_series<P: AsRef<Path>>(
        path: P,
        instrument: &str,
        min_rows: usize,
    ) -> Result<(PriceSeries, DatasetMetadata)> {
        let df = Self::load(&path)?;

        let columns = DataValidator::validate_price_columns(&df)?;
        DataValidator::validate_minimum_rows(&df, min_rows)?;

        let null_report = DataValidator::check_nulls(&df);
        if !null_report.is_empty() {
            log::warn!("{}: null values detected: {:?}", instrument, null_report);
        }

        let series = Self::price_series_from_frame(instrument, &df)?;

        let metadata = DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            date_column: columns[&RequiredColumn::Date].clone(),
            close_column: columns[&RequiredColumn::Close].clone(),
            skipped_rows: df.height().saturating_sub(series.len()),
        };

        Ok((series, metadata))
    }

    /// Extracts (date, close) pairs from a frame.
    ///
    /// Rows whose date does not parse or whose close is missing or not
    /// positive are skipped. Duplicate dates keep the last row.
    pub fn price_series_from_frame(instrument: &str, df: &DataFrame) -> Result<PriceSeries> {
        let columns = DataValidator::validate_price_columns(df)?;
        let date_name = &columns[&RequiredColumn::Date];
        let close_name = &columns[&RequiredColumn::Close];

        let dates = df.column(date_name)?.cast(&DataType::String)?;
        let dates = dates.str()?;
        let closes = df.column(close_name)?.cast(&DataType::Float64)?;
        let closes = closes.f64()?;

        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut skipped = 0usize;

        for (raw_date, close) in dates.into_iter().zip(closes.into_iter()) {
            let date = raw_date.and_then(Self::parse_date);
            match (date, close) {
                (Some(date), Some(close)) if close.is_finite() && close > 0.0 => {
                    by_date.insert(date, close);
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!(
                "{}: skipped {} rows with unparsable dates or invalid closes",
                instrument,
                skipped
            );
        }

        let points = by_date
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect();
        PriceSeries::new(instrument, points)
    }

    /// Parses the leading `YYYY-MM-DD` of a date or timestamp cell.
    fn parse_date(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        let day = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_series_from_frame() {
        let df = df! {
            "Date" => &["2020-01-31", "2020-02-28", "2020-03-31"],
            "Close" => &[100.0, 110.0, 121.0],
        }
        .unwrap();

        let series = CsvConnector::price_series_from_frame("AAA", &df).unwrap();
        assert_eq!(series.instrument(), "AAA");
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(date(2020, 1, 31)));
        assert_eq!(series.points()[2].close, 121.0);
    }

    #[test]
    fn test_skips_bad_rows_and_sorts() {
        let df = df! {
            "Date" => &["2020-02-28", "Ticker", "2020-01-31 00:00:00-05:00", "2020-03-31"],
            "Close" => &[Some(110.0), Some(1.0), Some(100.0), None],
        }
        .unwrap();

        let series = CsvConnector::price_series_from_frame("AAA", &df).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(date(2020, 1, 31)));
        assert_eq!(series.last_date(), Some(date(2020, 2, 28)));
    }

    #[test]
    fn test_duplicate_dates_keep_last() {
        let df = df! {
            "date" => &["2020-01-31", "2020-01-31"],
            "close" => &[100.0, 105.0],
        }
        .unwrap();

        let series = CsvConnector::price_series_from_frame("AAA", &df).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].close, 105.0);
    }

    #[test]
    fn test_load_yfinance_layout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Price,Close,High,Low,Open,Volume").unwrap();
        writeln!(file, "Ticker,SPY,SPY,SPY,SPY,SPY").unwrap();
        writeln!(file, "Date,,,,,").unwrap();
        writeln!(file, "2020-01-31,100.0,101.0,99.0,100.0,1000").unwrap();
        writeln!(file, "2020-02-28,110.0,111.0,109.0,110.0,1000").unwrap();
        file.flush().unwrap();

        let (series, metadata) = CsvConnector::load_price_series(file.path(), "SPY", 2).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(metadata.date_column, "Price");
        assert_eq!(metadata.close_column, "Close");
        assert_eq!(metadata.skipped_rows, 2);
    }
}

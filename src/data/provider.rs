use super::cache::{CacheKey, PriceCache};
use super::connectors::CsvConnector;
use crate::config::DataConfig;
use crate::error::{PortfolioLabError, Result};
use crate::types::PriceSeries;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Source of historical closing prices.
pub trait PriceProvider: Send + Sync {
    /// Closes for `instrument` with `start <= date <= end`.
    fn fetch_price_series(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries>;
}

impl<P: PriceProvider + ?Sized> PriceProvider for Arc<P> {
    fn fetch_price_series(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        (**self).fetch_price_series(instrument, start, end)
    }
}

impl<P: PriceProvider + ?Sized> PriceProvider for Box<P> {
    fn fetch_price_series(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        (**self).fetch_price_series(instrument, start, end)
    }
}

/// Reads `<root>/<ID>_historical.csv`, falling back to `<root>/<ID>.csv`.
pub struct CsvDirectoryProvider {
    root: PathBuf,
    min_rows: usize,
}

impl CsvDirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            min_rows: 2,
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.data_dir).with_min_rows(config.min_rows)
    }

    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, instrument: &str) -> Option<PathBuf> {
        [
            format!("{}_historical.csv", instrument),
            format!("{}.csv", instrument),
        ]
        .into_iter()
        .map(|name| self.root.join(name))
        .find(|path| path.is_file())
    }
}

impl PriceProvider for CsvDirectoryProvider {
    fn fetch_price_series(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        let path = self.resolve(instrument).ok_or_else(|| {
            PortfolioLabError::DataLoading(format!(
                "No price history for {} in {}",
                instrument,
                self.root.display()
            ))
        })?;

        let (series, metadata) = CsvConnector::load_price_series(&path, instrument, self.min_rows)?;
        log::debug!(
            "Loaded {} ({} rows, {} skipped) from {}",
            instrument,
            metadata.num_rows,
            metadata.skipped_rows,
            metadata.file_path
        );

        let in_range = series.slice_range(start, end);
        if in_range.is_empty() {
            return Err(PortfolioLabError::DataLoading(format!(
                "No prices for {} between {} and {}",
                instrument, start, end
            )));
        }

        Ok(in_range)
    }
}

/// Wraps a provider with a [`PriceCache`].
pub struct CachedPriceProvider<P> {
    inner: P,
    cache: PriceCache,
}

impl<P: PriceProvider> CachedPriceProvider<P> {
    pub fn new(inner: P, cache: PriceCache) -> Self {
        Self { inner, cache }
    }

    pub fn from_config(inner: P, config: &DataConfig) -> Self {
        Self::new(
            inner,
            PriceCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_secs),
            ),
        )
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: PriceProvider> PriceProvider for CachedPriceProvider<P> {
    fn fetch_price_series(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        let key = CacheKey::new(instrument, start, end);
        if let Some(series) = self.cache.get(&key) {
            log::debug!("Cache hit for {}", instrument);
            return Ok(series);
        }

        let series = self.inner.fetch_price_series(instrument, start, end)?;
        self.cache.insert(key, series.clone());
        Ok(series)
    }
}

use chrono::NaiveDate;
use portfolio_lab::{
    AnalysisConfig, CachedPriceProvider, CsvDirectoryProvider, Metric, PortfolioAnalyzer,
    PortfolioLabError, PortfolioRequest, PriceCache, PriceProvider, PriceSeries,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Writes two trading days per month for 2020 with the given month-end closes.
fn write_history(dir: &Path, file_name: &str, closes: &[f64]) {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
    for (i, close) in closes.iter().enumerate() {
        let month = i as u32 + 1;
        csv.push_str(&format!("2020-{:02}-03,1,1,1,{},100\n", month, close * 0.99));
        csv.push_str(&format!("2020-{:02}-27,1,1,1,{},100\n", month, close));
    }
    fs::write(dir.join(file_name), csv).unwrap();
}

/// Counts calls that reach the wrapped provider.
struct CountingProvider<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P: PriceProvider> PriceProvider for CountingProvider<P> {
    fn fetch_price_series(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> portfolio_lab::Result<PriceSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_price_series(instrument, start, end)
    }
}

fn request(tickers: &[&str], allocations: &[i64], benchmark: Option<&str>) -> PortfolioRequest {
    PortfolioRequest {
        name: Some("test".to_string()),
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        allocations: allocations.to_vec(),
        start: "2020-01".to_string(),
        end: "2020-12".to_string(),
        benchmark_ticker: benchmark.map(str::to_string),
        risk_free_annual: None,
    }
}

#[test]
fn test_analyze_from_csv_directory() {
    let dir = tempfile::tempdir().unwrap();
    let rising: Vec<f64> = (0..12).map(|i| 100.0 + 2.0 * i as f64 + (i % 4) as f64).collect();
    let choppy: Vec<f64> = (0..12).map(|i| 50.0 + if i % 2 == 0 { 3.0 } else { -2.0 } + i as f64).collect();
    let market: Vec<f64> = (0..12).map(|i| 300.0 + 4.0 * i as f64 - (i % 3) as f64).collect();
    write_history(dir.path(), "AAA_historical.csv", &rising);
    write_history(dir.path(), "BBB.csv", &choppy);
    write_history(dir.path(), "SPY_historical.csv", &market);

    let analyzer = PortfolioAnalyzer::new(
        CsvDirectoryProvider::new(dir.path()),
        AnalysisConfig::default(),
    );
    let report = analyzer
        .analyze(&request(&["AAA", "BBB"], &[70, 30], Some("SPY")))
        .unwrap();

    assert_eq!(report.periods, 11);
    assert_eq!(report.start_period, date(2020, 2, 29));
    assert_eq!(report.end_period, date(2020, 12, 31));
    assert_eq!(report.benchmark.as_deref(), Some("SPY"));
    assert!(report.get(Metric::Beta.key()).unwrap().is_finite());

    let corr = report.correlation_matrix().unwrap();
    assert_eq!(corr["AAA"]["BBB"], corr["BBB"]["AAA"]);
}

#[test]
fn test_invalid_allocation_never_fetches() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(CountingProvider {
        inner: CsvDirectoryProvider::new(dir.path()),
        calls: AtomicUsize::new(0),
    });

    let analyzer = PortfolioAnalyzer::new(Arc::clone(&provider), AnalysisConfig::default());
    let result = analyzer.analyze(&request(&["AAA", "BBB"], &[60, 30], None));

    assert!(matches!(result, Err(PortfolioLabError::InvalidAllocation(_))));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cached_provider_serves_repeat_requests() {
    let dir = tempfile::tempdir().unwrap();
    write_history(dir.path(), "AAA.csv", &[10.0, 11.0, 12.0]);

    let counting = CountingProvider {
        inner: CsvDirectoryProvider::new(dir.path()),
        calls: AtomicUsize::new(0),
    };
    let cached = CachedPriceProvider::new(counting, PriceCache::new(16, Duration::from_secs(60)));

    let first = cached
        .fetch_price_series("AAA", date(2020, 1, 1), date(2020, 12, 31))
        .unwrap();
    let second = cached
        .fetch_price_series("AAA", date(2020, 1, 1), date(2020, 12, 31))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);

    // A different range is a different entry
    cached
        .fetch_price_series("AAA", date(2020, 2, 1), date(2020, 12, 31))
        .unwrap();
    assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);

    // Invalidation forces a reload of every range
    assert_eq!(cached.cache().invalidate("AAA"), 2);
    cached
        .fetch_price_series("AAA", date(2020, 1, 1), date(2020, 12, 31))
        .unwrap();
    assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_expired_cache_entries_are_refetched() {
    let dir = tempfile::tempdir().unwrap();
    write_history(dir.path(), "AAA.csv", &[10.0, 11.0, 12.0]);

    let counting = CountingProvider {
        inner: CsvDirectoryProvider::new(dir.path()),
        calls: AtomicUsize::new(0),
    };
    let cached = CachedPriceProvider::new(counting, PriceCache::new(16, Duration::ZERO));

    for _ in 0..3 {
        cached
            .fetch_price_series("AAA", date(2020, 1, 1), date(2020, 12, 31))
            .unwrap();
    }
    assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_batch_from_json_requests() {
    let dir = tempfile::tempdir().unwrap();
    write_history(dir.path(), "AAA.csv", &[10.0, 11.0, 10.5, 12.0, 12.5]);

    let requests: Vec<PortfolioRequest> = serde_json::from_str(
        r#"[
            {"name": "ok", "tickers": ["AAA"], "allocations": [100], "start": "2020-01", "end": "2020-05"},
            {"name": "bad-month", "tickers": ["AAA"], "allocations": [100], "start": "Jan 2020", "end": "2020-05"},
            {"name": "missing", "tickers": ["ZZZ"], "allocations": [100], "start": "2020-01", "end": "2020-05"}
        ]"#,
    )
    .unwrap();

    let analyzer = PortfolioAnalyzer::new(
        CsvDirectoryProvider::new(dir.path()),
        AnalysisConfig::default(),
    );
    let results = analyzer.analyze_batch(&requests);

    assert_eq!(results[0].as_ref().unwrap().periods, 4);
    assert_eq!(results[1].as_ref().unwrap_err().kind(), "invalid_request");
    assert_eq!(results[2].as_ref().unwrap_err().kind(), "data_loading");
}

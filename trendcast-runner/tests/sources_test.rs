//! Source → cache → pipeline → export, end to end without network access.

use chrono::NaiveDate;
use proptest::prelude::*;
use std::num::NonZeroUsize;
use trendcast_core::{PipelineConfig, PriceSeries, Regime, TimeWindow};
use trendcast_runner::{
    analyze_symbols, export_analysis, CsvSource, FallbackSource, PriceSource, SourceCache,
    SourceError, SourceKind, SyntheticSource,
};

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn write_rising_csv(dir: &std::path::Path, symbol: &str, rows: usize) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut body = String::from("Date,Close,Volume\n");
    for (i, date) in start.iter_days().take(rows).enumerate() {
        body.push_str(&format!("{date},{:.2},{}\n", 100.0 + i as f64, 1000 + i));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), body).unwrap();
}

#[test]
fn csv_files_flow_into_report_bundle() {
    let data = tempfile::tempdir().unwrap();
    write_rising_csv(data.path(), "INFY.NS", 120);

    let source = CsvSource::new(data.path());
    let cache = SourceCache::default();
    let config = PipelineConfig {
        window: TimeWindow::OneMonth,
        ..PipelineConfig::default()
    };

    let results = analyze_symbols(&["infy".to_string()], &source, &cache, &config);
    let item = results[0].1.as_ref().unwrap();
    assert_eq!(item.kind, Some(SourceKind::Csv));
    assert_eq!(item.analysis.filtered.len(), 30);
    assert_eq!(item.analysis.trend.latest().regime, Regime::Bullish);
    assert!(item.analysis.forecast.as_ref().unwrap().is_rising());

    let out = tempfile::tempdir().unwrap();
    let written = export_analysis(&item.label, &item.analysis, out.path()).unwrap();
    assert_eq!(written.len(), 4);
    let summary = std::fs::read_to_string(out.path().join("summary.csv")).unwrap();
    assert!(summary.lines().nth(1).unwrap().starts_with("INFY.NS,219.00,190.00,"));
}

#[test]
fn missing_csv_falls_back_to_synthetic() {
    let data = tempfile::tempdir().unwrap();
    let source = FallbackSource::new(
        Box::new(CsvSource::new(data.path())),
        Box::new(SyntheticSource::new(11).with_days(60).with_end(end_date())),
    );
    let cache = SourceCache::default();

    let fetched = cache.get_or_fetch("WIPRO", &source).unwrap();
    assert_eq!(fetched.kind, SourceKind::Synthetic);
    assert_eq!(fetched.series.last().date, end_date());

    let again = cache.get_or_fetch("wipro.ns", &source).unwrap();
    assert_eq!(again, fetched);
    assert_eq!(cache.hits(), 1);
}

#[test]
fn failed_symbols_are_reported_in_place() {
    let data = tempfile::tempdir().unwrap();
    write_rising_csv(data.path(), "TCS.NS", 10);
    let source = CsvSource::new(data.path());
    let cache = SourceCache::default();
    let symbols = vec!["NOPE".to_string(), "TCS".to_string()];

    let results = analyze_symbols(&symbols, &source, &cache, &PipelineConfig::default());
    assert!(matches!(
        results[0].1,
        Err(SourceError::SymbolNotFound { .. })
    ));
    assert!(results[1].1.is_ok());
}

proptest! {
    #[test]
    fn synthetic_rows_stay_in_band(seed in any::<u64>(), days in 1usize..400) {
        let source = SyntheticSource::new(seed).with_days(days).with_end(end_date());
        let series: PriceSeries = source.fetch("HDFCBANK.NS").unwrap();
        prop_assert_eq!(series.len(), days);
        prop_assert_eq!(series.last().date, end_date());
        let base = 1600.50;
        for bar in &series {
            prop_assert!(bar.close >= base * 0.98 - 1e-9);
            prop_assert!(bar.close <= base * 1.02 + 1e-9);
        }
    }

    #[test]
    fn cache_never_exceeds_capacity(
        capacity in 1usize..6,
        picks in prop::collection::vec(0usize..10, 1..40),
    ) {
        let source = SyntheticSource::new(0).with_days(3).with_end(end_date());
        let cache = SourceCache::new(NonZeroUsize::new(capacity).unwrap());
        for p in &picks {
            cache.get_or_fetch(&format!("S{p}"), &source).unwrap();
            prop_assert!(cache.len() <= capacity);
        }
        prop_assert_eq!(cache.hits() + cache.misses(), picks.len() as u64);
    }
}

//! Criterion benchmarks for TrendCast pipeline stages.
//!
//! Benchmarks:
//! 1. Moving averages (single SMA, short/long pair via trend detection)
//! 2. Metrics over a full history
//! 3. Least-squares forecast
//! 4. Full pipeline per time window

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::num::NonZeroUsize;

use trendcast_core::indicators::{Indicator, Sma};
use trendcast_core::{
    analyze, compute_metrics, detect_trend, predict, ForecastConfig, PipelineConfig, PriceSeries,
    TimeWindow, TrendConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> PriceSeries {
    let base_date = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    let closes: Vec<f64> = (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.01)
        .collect();
    PriceSeries::from_closes(base_date, &closes).unwrap()
}

// ── 1. Moving Averages ───────────────────────────────────────────────

fn bench_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_averages");

    for &bar_count in &[252, 1260, 2520] {
        let series = make_series(bar_count);

        let sma = Sma::new(NonZeroUsize::new(50).unwrap());
        group.bench_with_input(BenchmarkId::new("sma_50", bar_count), &bar_count, |b, _| {
            b.iter(|| sma.compute(black_box(&series)));
        });

        let config = TrendConfig::default();
        group.bench_with_input(
            BenchmarkId::new("detect_trend_10_50", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| detect_trend(black_box(&series), black_box(&config)));
            },
        );
    }

    group.finish();
}

// ── 2. Metrics ───────────────────────────────────────────────────────

fn bench_metrics(c: &mut Criterion) {
    let series = make_series(2520);
    c.bench_function("metrics_2520_bars", |b| {
        b.iter(|| compute_metrics(black_box(&series)));
    });
}

// ── 3. Forecast ──────────────────────────────────────────────────────

fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast");
    let series = make_series(2520);

    for &horizon in &[30usize, 365] {
        let config = ForecastConfig::new(NonZeroUsize::new(horizon).unwrap());
        group.bench_with_input(BenchmarkId::new("predict", horizon), &horizon, |b, _| {
            b.iter(|| predict(black_box(&series), black_box(&config)));
        });
    }

    group.finish();
}

// ── 4. Full Pipeline ─────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let series = make_series(2520);

    for window in TimeWindow::ALL {
        let config = PipelineConfig {
            window,
            ..PipelineConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new("analyze", window.label()),
            &window,
            |b, _| {
                b.iter(|| analyze(black_box(&series), black_box(&config)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_moving_averages,
    bench_metrics,
    bench_forecast,
    bench_pipeline,
);
criterion_main!(benches);

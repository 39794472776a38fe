//! TrendCast Core: price series, trend detection, metrics and forecasting.
//!
//! This crate contains the analysis pipeline:
//! - Domain types (bars, validated price series, regimes, forecasts)
//! - Time-window filter (1M / 6M / 1Y / Max)
//! - Trend detector (short/long SMA with a per-row regime)
//! - Metrics calculator (returns, volatility, Sharpe, range)
//! - Forecaster (least-squares line over day number)
//! - Price table schema checks and report tables
//!
//! Every stage is a pure function. Nothing here performs I/O except loading
//! a config file.

pub mod config;
pub mod domain;
pub mod forecast;
pub mod indicators;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod table;
pub mod trend;
pub mod window;

pub use config::{ConfigError, PipelineConfig};
pub use domain::{
    ForecastPoint, ForecastSeries, LinearTrend, PriceBar, PriceSeries, Regime, SeriesError,
};
pub use forecast::{fit_trend, predict, ForecastConfig, ForecastError};
pub use metrics::{compute_metrics, Metrics};
pub use pipeline::{analyze, Analysis};
pub use report::{summary_table, ToTable};
pub use schema::{PriceSchema, SchemaError};
pub use table::Table;
pub use trend::{detect_trend, TiePolicy, TrendAnnotatedSeries, TrendConfig};
pub use window::{filter, TimeWindow};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: every pipeline type is Send + Sync, so callers can
    /// analyze independent series on worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceBar>();
        require_sync::<PriceBar>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<TrendAnnotatedSeries>();
        require_sync::<TrendAnnotatedSeries>();
        require_send::<Metrics>();
        require_sync::<Metrics>();
        require_send::<ForecastSeries>();
        require_sync::<ForecastSeries>();
        require_send::<Analysis>();
        require_sync::<Analysis>();
        require_send::<PipelineConfig>();
        require_sync::<PipelineConfig>();
        require_send::<Table>();
        require_sync::<Table>();
        require_send::<indicators::Sma>();
        require_sync::<indicators::Sma>();
    }

    /// The indicator trait takes only the series: no hidden state can leak
    /// between calls.
    #[test]
    fn indicator_trait_object_builds() {
        fn _check(ind: &dyn indicators::Indicator, series: &PriceSeries) -> Vec<Option<f64>> {
            ind.compute(series)
        }
    }
}

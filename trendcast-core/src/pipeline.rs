//! One-call pipeline: filter → trend → metrics and forecast.

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::domain::{ForecastSeries, PriceSeries};
use crate::forecast::{predict, ForecastError};
use crate::metrics::{compute_metrics, Metrics};
use crate::trend::{detect_trend, TrendAnnotatedSeries};
use crate::window::{filter, TimeWindow};

/// Everything derived from one series under one config.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub window: TimeWindow,
    /// Trailing slice selected by the window.
    pub filtered: PriceSeries,
    /// Trend over the full history, trimmed to the window.
    pub trend: TrendAnnotatedSeries,
    /// Metrics of the filtered slice.
    pub metrics: Metrics,
    /// Forecast from the filtered slice. An error here does not invalidate
    /// the other outputs.
    pub forecast: Result<ForecastSeries, ForecastError>,
}

/// Serializable view of an [`Analysis`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary<'a> {
    pub window: TimeWindow,
    pub rows: usize,
    pub first_date: chrono::NaiveDate,
    pub last_date: chrono::NaiveDate,
    pub metrics: &'a Metrics,
    pub latest: crate::trend::TrendRow,
    pub trend: &'a TrendAnnotatedSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<&'a ForecastSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_error: Option<String>,
}

impl Analysis {
    pub fn summary(&self) -> AnalysisSummary<'_> {
        AnalysisSummary {
            window: self.window,
            rows: self.filtered.len(),
            first_date: self.filtered.first().date,
            last_date: self.filtered.last().date,
            metrics: &self.metrics,
            latest: self.trend.latest(),
            trend: &self.trend,
            forecast: self.forecast.as_ref().ok(),
            forecast_error: self.forecast.as_ref().err().map(ToString::to_string),
        }
    }
}

/// Run every stage over `series`.
///
/// Moving averages are computed on the full history before trimming, so the
/// long average is defined inside short windows when enough history exists.
pub fn analyze(series: &PriceSeries, config: &PipelineConfig) -> Analysis {
    let filtered = filter(series, config.window);
    let trend = detect_trend(series, &config.trend).window(config.window);
    let metrics = compute_metrics(&filtered);
    let forecast = predict(&filtered, &config.forecast);

    if let Err(e) = &forecast {
        tracing::debug!(error = %e, "forecast skipped");
    }

    Analysis {
        window: config.window,
        filtered,
        trend,
        metrics,
        forecast,
    }
}

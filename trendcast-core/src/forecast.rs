//! Forecaster: least-squares line over day number, extrapolated forward.
//!
//! Unlike the metrics calculator this stage fails fast: a line needs two
//! points, and a flat zero forecast would suggest a trend that isn't there.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use thiserror::Error;

use crate::config::non_zero;
use crate::domain::{ForecastPoint, ForecastSeries, LinearTrend, PriceSeries};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("need at least 2 usable closes to fit a trend, got {usable}")]
    InsufficientData { usable: usize },

    #[error("forecast of {horizon} days after {last} runs past the supported calendar")]
    DateOutOfRange { last: NaiveDate, horizon: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon_days: NonZeroUsize,
}

impl ForecastConfig {
    pub const DEFAULT_HORIZON_DAYS: NonZeroUsize = non_zero(30);

    pub fn new(horizon_days: NonZeroUsize) -> Self {
        Self { horizon_days }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: Self::DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Fit `close = slope * day + intercept` by ordinary least squares.
///
/// Day numbers are row indices `0..n`; void rows keep their index but are
/// left out of the fit.
pub fn fit_trend(series: &PriceSeries) -> Result<LinearTrend, ForecastError> {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter(|(_, bar)| !bar.is_void())
        .map(|(day, bar)| (day as f64, bar.close))
        .collect();

    if points.len() < 2 {
        return Err(ForecastError::InsufficientData {
            usable: points.len(),
        });
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in &points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    // Distinct day numbers guarantee sxx > 0 once there are two points.
    let slope = sxy / sxx;
    Ok(LinearTrend {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Extrapolate the fitted line `horizon_days` calendar days past the last
/// observed date, one point per day with no weekend or holiday skipping.
pub fn predict(
    series: &PriceSeries,
    config: &ForecastConfig,
) -> Result<ForecastSeries, ForecastError> {
    let trend = fit_trend(series)?;
    let horizon = config.horizon_days.get();
    let n = series.len();
    let last = series.last().date;

    let points = (1..=horizon)
        .map(|step| {
            let date = last
                .checked_add_days(Days::new(step as u64))
                .ok_or(ForecastError::DateOutOfRange { last, horizon })?;
            let day = (n + step - 1) as f64;
            Ok(ForecastPoint {
                date,
                predicted_close: trend.at(day),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        rows = n,
        horizon,
        slope = trend.slope,
        intercept = trend.intercept,
        "forecast fitted"
    );

    Ok(ForecastSeries { trend, points })
}

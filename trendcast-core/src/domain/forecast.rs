//! Forecast output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fitted line `close = slope * day + intercept`, where `day` is the
/// zero-based row index of the source series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    /// Evaluate the line at a day number.
    pub fn at(&self, day: f64) -> f64 {
        self.slope * day + self.intercept
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_close: f64,
}

/// Extrapolated closes for consecutive calendar days after the last
/// observed date. Values are not clamped and may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub trend: LinearTrend,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    /// True when the final predicted close is above the first one.
    pub fn is_rising(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.predicted_close > first.predicted_close,
            _ => false,
        }
    }
}

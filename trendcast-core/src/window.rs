//! Time-window filter: trailing slice of a price series.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::PriceSeries;

/// Trailing lookback selected by the caller.
///
/// Day counts are row counts: `OneMonth` keeps the last 30 rows whether or
/// not the calendar has gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[default]
    Max,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::OneMonth,
        TimeWindow::SixMonths,
        TimeWindow::OneYear,
        TimeWindow::Max,
    ];

    /// Number of trailing rows kept, `None` for the whole series.
    pub fn days(self) -> Option<usize> {
        match self {
            TimeWindow::OneMonth => Some(30),
            TimeWindow::SixMonths => Some(180),
            TimeWindow::OneYear => Some(365),
            TimeWindow::Max => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::OneMonth => "1M",
            TimeWindow::SixMonths => "6M",
            TimeWindow::OneYear => "1Y",
            TimeWindow::Max => "Max",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time window '{0}' (expected 1M, 6M, 1Y or Max)")]
pub struct WindowParseError(pub String);

impl FromStr for TimeWindow {
    type Err = WindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TimeWindow::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| WindowParseError(s.to_string()))
    }
}

/// Trailing `window.days()` rows of `series`, or the whole series.
pub fn filter(series: &PriceSeries, window: TimeWindow) -> PriceSeries {
    match window.days() {
        Some(days) if days < series.len() => series.trailing(days),
        _ => series.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), &closes).unwrap()
    }

    #[test]
    fn one_month_keeps_last_thirty() {
        let s = series(400);
        let out = filter(&s, TimeWindow::OneMonth);
        assert_eq!(out.len(), 30);
        assert_eq!(out.last(), s.last());
        assert_eq!(out.first().close, 470.0);
    }

    #[test]
    fn short_series_is_returned_whole() {
        let s = series(20);
        assert_eq!(filter(&s, TimeWindow::SixMonths), s);
        assert_eq!(filter(&s, TimeWindow::OneYear), s);
    }

    #[test]
    fn max_is_identity() {
        let s = series(1000);
        assert_eq!(filter(&s, TimeWindow::Max), s);
    }

    #[test]
    fn exact_length_is_identity() {
        let s = series(180);
        assert_eq!(filter(&s, TimeWindow::SixMonths), s);
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("1m".parse::<TimeWindow>(), Ok(TimeWindow::OneMonth));
        assert_eq!("6M".parse::<TimeWindow>(), Ok(TimeWindow::SixMonths));
        assert_eq!(" 1y ".parse::<TimeWindow>(), Ok(TimeWindow::OneYear));
        assert_eq!("max".parse::<TimeWindow>(), Ok(TimeWindow::Max));
        assert!("2W".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&TimeWindow::OneYear).unwrap();
        assert_eq!(json, "\"1Y\"");
        let back: TimeWindow = serde_json::from_str("\"6M\"").unwrap();
        assert_eq!(back, TimeWindow::SixMonths);
    }
}

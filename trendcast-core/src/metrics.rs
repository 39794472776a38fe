//! Summary metrics: pure functions over a price series.
//!
//! Metrics are advisory: with fewer than two usable closes every field is
//! zero instead of an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::PriceSeries;

/// Return, volatility, Sharpe and range statistics for one series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub avg_daily_return: f64,
    /// Sample standard deviation (n - 1) of daily returns.
    pub volatility: f64,
    /// Mean daily return over its standard deviation. Not annualized, no
    /// risk-free rate.
    pub sharpe_ratio: f64,
    pub high: f64,
    pub low: f64,
    pub total_return_percent: f64,
}

impl Metrics {
    /// All-zero metrics for degenerate input.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl fmt::Display for Metrics {
    /// Two decimals for prices and percentages, four for ratios.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "High: {:.2}, Low: {:.2}, Returns: {:.2}%",
            self.high, self.low, self.total_return_percent
        )?;
        write!(
            f,
            "Sharpe Ratio: {:.4}, Volatility: {:.4}, Avg Return: {:.4}",
            self.sharpe_ratio, self.volatility, self.avg_daily_return
        )
    }
}

/// Compute metrics for `series`. Void closes are dropped first.
pub fn compute_metrics(series: &PriceSeries) -> Metrics {
    let closes = series.usable_closes();
    let dropped = series.len() - closes.len();
    if dropped > 0 {
        tracing::warn!(dropped, "dropping non-numeric closes before computing metrics");
    }
    if closes.len() < 2 {
        tracing::debug!(usable = closes.len(), "too few closes, metrics are zero");
        return Metrics::zero();
    }

    let returns = daily_returns(&closes);
    let avg_daily_return = mean(&returns);
    let volatility = sample_std_dev(&returns);
    let sharpe_ratio = if volatility != 0.0 {
        avg_daily_return / volatility
    } else {
        0.0
    };

    Metrics {
        avg_daily_return,
        volatility,
        sharpe_ratio,
        high: closes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        low: closes.iter().copied().fold(f64::INFINITY, f64::min),
        total_return_percent: total_return_percent(&closes),
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Simple returns between consecutive closes: (c[i] - c[i-1]) / c[i-1].
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divisor n - 1); 0.0 with fewer than 2 values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// (last - first) / first * 100; 0.0 with fewer than 2 closes.
pub fn total_return_percent(closes: &[f64]) -> f64 {
    match (closes.first(), closes.last()) {
        (Some(&first), Some(&last)) if closes.len() >= 2 => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    #[test]
    fn ten_day_scenario() {
        let series = PriceSeries::from_closes(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            &[100.0, 102.0, 104.0, 103.0, 105.0, 107.0, 106.0, 108.0, 110.0, 109.0],
        )
        .unwrap();
        let m = compute_metrics(&series);
        assert_eq!(m.high, 110.0);
        assert_eq!(m.low, 100.0);
        assert_approx(m.total_return_percent, 9.0, DEFAULT_EPSILON);
        assert!(m.avg_daily_return > 0.0);
        assert!(m.volatility > 0.0);
        assert_approx(m.sharpe_ratio, m.avg_daily_return / m.volatility, DEFAULT_EPSILON);
    }

    #[test]
    fn single_row_is_all_zero() {
        assert_eq!(compute_metrics(&make_series(&[42.0])), Metrics::zero());
    }

    #[test]
    fn all_void_is_all_zero() {
        let d0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = PriceSeries::new(vec![
            PriceBar::new(d0, f64::NAN),
            PriceBar::new(d0.succ_opt().unwrap(), f64::NAN),
        ])
        .unwrap();
        assert_eq!(compute_metrics(&series), Metrics::zero());
    }

    #[test]
    fn void_closes_are_dropped() {
        let d0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = vec![
            PriceBar::new(d0, 100.0),
            PriceBar::new(d0 + chrono::Duration::days(1), f64::NAN),
            PriceBar::new(d0 + chrono::Duration::days(2), 110.0),
        ];
        let m = compute_metrics(&PriceSeries::new(bars).unwrap());
        // One return between the two usable closes
        assert_approx(m.avg_daily_return, 0.1, DEFAULT_EPSILON);
        assert_eq!(m.volatility, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_approx(m.total_return_percent, 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_prices_have_zero_sharpe() {
        let m = compute_metrics(&make_series(&[50.0; 8]));
        assert_eq!(m.volatility, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.total_return_percent, 0.0);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // mean 5, squared deviations sum 32, n-1 = 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx(sample_std_dev(&values), (32.0_f64 / 7.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn daily_returns_are_simple_returns() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert_approx(r[0], 0.1, DEFAULT_EPSILON);
        assert_approx(r[1], -0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn compute_is_idempotent() {
        let series = make_series(&[10.0, 12.0, 11.0, 13.5, 12.25]);
        assert_eq!(compute_metrics(&series), compute_metrics(&series));
    }

    #[test]
    fn display_formats_two_and_four_decimals() {
        let m = Metrics {
            avg_daily_return: 0.012345,
            volatility: 0.5,
            sharpe_ratio: 0.024691,
            high: 110.0,
            low: 100.0,
            total_return_percent: 9.0,
        };
        assert_eq!(
            m.to_string(),
            "High: 110.00, Low: 100.00, Returns: 9.00%\n\
             Sharpe Ratio: 0.0247, Volatility: 0.5000, Avg Return: 0.0123"
        );
    }
}

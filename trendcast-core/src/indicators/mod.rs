//! Indicator trait and concrete implementations.
//!
//! Indicators are pure functions: price series in, one value per row out.
//! Rows inside the warmup (the first `lookback()` rows) are `None`.

pub mod sma;

pub use sma::Sma;

use crate::domain::PriceSeries;

/// Trait for single-series indicators.
///
/// # Look-ahead guard
/// No value at row t may depend on closes from row t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_10").
    fn name(&self) -> &str;

    /// Number of rows needed before the indicator produces a value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns one entry per row; undefined rows are `None`, never zero.
    fn compute(&self, series: &PriceSeries) -> Vec<Option<f64>>;
}

/// Create a daily series from close prices for testing.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> PriceSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    PriceSeries::from_closes(base_date, closes).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for numeric tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

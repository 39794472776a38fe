//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` closes. First value at index period-1.
//! Each window is summed independently, so equal windows always produce
//! bit-identical means regardless of what came before them.

use std::num::NonZeroUsize;

use super::Indicator;
use crate::domain::PriceSeries;

#[derive(Debug, Clone)]
pub struct Sma {
    period: NonZeroUsize,
    name: String,
}

impl Sma {
    pub fn new(period: NonZeroUsize) -> Self {
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period.get()
    }

    /// Rolling mean over a raw close slice. NaN anywhere in a window makes
    /// that row undefined.
    pub fn over(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let period = self.period.get();
        let mut result = vec![None; closes.len()];
        if closes.len() < period {
            return result;
        }

        for (end, window) in (period - 1..).zip(closes.windows(period)) {
            if window.iter().all(|c| c.is_finite()) {
                result[end] = Some(window.iter().sum::<f64>() / period as f64);
            }
        }
        result
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.get() - 1
    }

    fn compute(&self, series: &PriceSeries) -> Vec<Option<f64>> {
        self.over(&series.closes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    fn sma(period: usize) -> Sma {
        Sma::new(NonZeroUsize::new(period).unwrap())
    }

    #[test]
    fn sma_5_basic() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = sma(5).compute(&series);

        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().take(4).enumerate() {
            assert!(v.is_none(), "expected None at index {i}");
        }
        // SMA[4] = mean(10,11,12,13,14) = 12.0
        assert_approx(result[4].unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result[5].unwrap(), 13.0, DEFAULT_EPSILON);
        assert_approx(result[6].unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let series = make_series(&[100.0, 200.0, 300.0]);
        let result = sma(1).compute(&series);
        assert_eq!(result, vec![Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn sma_void_propagation() {
        let closes = [10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0];
        let result = sma(3).over(&closes);
        // Windows touching index 2 are undefined
        assert!(result[2].is_none());
        assert!(result[3].is_none());
        assert!(result[4].is_none());
        assert_approx(result[5].unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_lookback_and_name() {
        assert_eq!(sma(20).lookback(), 19);
        assert_eq!(sma(1).lookback(), 0);
        assert_eq!(sma(10).name(), "sma_10");
    }

    #[test]
    fn sma_too_few_rows() {
        let series = make_series(&[10.0, 11.0]);
        assert!(sma(5).compute(&series).iter().all(Option::is_none));
    }

    #[test]
    fn sma_has_no_lookahead() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let full = sma(7).over(&closes);
        let truncated = sma(7).over(&closes[..25]);
        assert_eq!(&full[..25], &truncated[..]);
    }
}

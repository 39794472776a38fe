//! PriceSeries: a validated, date-ordered sequence of daily bars.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::PriceBar;

/// Violations of the series invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series must contain at least one row")]
    Empty,

    #[error("dates must be strictly increasing: row {index} ({date}) follows {previous}")]
    NotIncreasing {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("close must be positive: {close} on {date}")]
    NonPositiveClose { date: NaiveDate, close: f64 },

    #[error("date overflow building row {index}")]
    DateOverflow { index: usize },
}

/// Ordered daily observations.
///
/// Invariants (checked in [`PriceSeries::new`]):
/// - at least one bar
/// - dates strictly increasing (gaps allowed)
/// - every non-void close is positive
///
/// Stages never mutate a series; they return derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }
        if let Some(bad) = bars.iter().find(|b| !b.is_void() && b.close <= 0.0) {
            return Err(SeriesError::NonPositiveClose {
                date: bad.date,
                close: bad.close,
            });
        }
        Ok(Self { bars })
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, SeriesError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(index, &close)| {
                start
                    .checked_add_days(Days::new(index as u64))
                    .map(|date| PriceBar::new(date, close))
                    .ok_or(SeriesError::DateOverflow { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(bars)
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a validated series.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// All closes, void bars included as NaN.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Closes of non-void bars only.
    pub fn usable_closes(&self) -> Vec<f64> {
        self.bars
            .iter()
            .filter(|b| !b.is_void())
            .map(|b| b.close)
            .collect()
    }

    /// Number of void bars.
    pub fn void_count(&self) -> usize {
        self.bars.iter().filter(|b| b.is_void()).count()
    }

    /// Copy of the last `n` bars, clamped to `1..=len`.
    pub fn trailing(&self, n: usize) -> PriceSeries {
        let keep = n.clamp(1, self.bars.len());
        PriceSeries {
            bars: self.bars[self.bars.len() - keep..].to_vec(),
        }
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = SeriesError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PriceBar;
    type IntoIter = std::slice::Iter<'a, PriceBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

//! Trend detector: short/long moving averages and a per-row regime label.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::config::{non_zero, ConfigError};
use crate::domain::{PriceSeries, Regime};
use crate::indicators::Sma;
use crate::window::TimeWindow;

/// How rows that are not strictly Bullish are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Equal or undefined averages are Neutral.
    #[default]
    ThreeWay,
    /// Anything not strictly Bullish is Bearish, warmup rows included.
    CollapseToBearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub short_window: NonZeroUsize,
    pub long_window: NonZeroUsize,
    pub tie_policy: TiePolicy,
}

impl TrendConfig {
    pub const DEFAULT_SHORT_WINDOW: NonZeroUsize = non_zero(10);
    pub const DEFAULT_LONG_WINDOW: NonZeroUsize = non_zero(50);

    pub fn new(short_window: usize, long_window: usize) -> Result<Self, ConfigError> {
        let short_window = NonZeroUsize::new(short_window)
            .ok_or_else(|| ConfigError::Invalid("short_window must be >= 1".into()))?;
        let long_window = NonZeroUsize::new(long_window)
            .ok_or_else(|| ConfigError::Invalid("long_window must be >= 1".into()))?;
        Ok(Self {
            short_window,
            long_window,
            tie_policy: TiePolicy::default(),
        })
    }

    pub fn with_tie_policy(mut self, tie_policy: TiePolicy) -> Self {
        self.tie_policy = tie_policy;
        self
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            short_window: Self::DEFAULT_SHORT_WINDOW,
            long_window: Self::DEFAULT_LONG_WINDOW,
            tie_policy: TiePolicy::ThreeWay,
        }
    }
}

/// One annotated row, produced on demand by [`TrendAnnotatedSeries::rows`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: Option<u64>,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub regime: Regime,
}

/// The source series plus one moving-average and regime column each.
///
/// Column vectors always have the same length as the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnnotatedSeries {
    config: TrendConfig,
    series: PriceSeries,
    short_ma: Vec<Option<f64>>,
    long_ma: Vec<Option<f64>>,
    regime: Vec<Regime>,
}

impl TrendAnnotatedSeries {
    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// The unannotated series the columns were computed from.
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn short_ma(&self) -> &[Option<f64>] {
        &self.short_ma
    }

    pub fn long_ma(&self) -> &[Option<f64>] {
        &self.long_ma
    }

    pub fn regimes(&self) -> &[Regime] {
        &self.regime
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<TrendRow> {
        let bar = self.series.bars().get(index)?;
        Some(TrendRow {
            date: bar.date,
            close: bar.close,
            volume: bar.volume,
            short_ma: self.short_ma[index],
            long_ma: self.long_ma[index],
            regime: self.regime[index],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = TrendRow> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    pub fn latest(&self) -> TrendRow {
        let last = self.len() - 1;
        TrendRow {
            date: self.series.last().date,
            close: self.series.last().close,
            volume: self.series.last().volume,
            short_ma: self.short_ma[last],
            long_ma: self.long_ma[last],
            regime: self.regime[last],
        }
    }

    /// Trailing slice of the annotated rows. Averages keep the values computed
    /// over the full history, so a 1M view of a long series still shows its
    /// 50-day average.
    pub fn window(&self, window: TimeWindow) -> TrendAnnotatedSeries {
        let keep = match window.days() {
            Some(days) if days < self.len() => days,
            _ => return self.clone(),
        };
        let start = self.len() - keep;
        TrendAnnotatedSeries {
            config: self.config,
            series: self.series.trailing(keep),
            short_ma: self.short_ma[start..].to_vec(),
            long_ma: self.long_ma[start..].to_vec(),
            regime: self.regime[start..].to_vec(),
        }
    }
}

/// Label one row from its two averages.
pub fn classify(short_ma: Option<f64>, long_ma: Option<f64>, policy: TiePolicy) -> Regime {
    match (short_ma, long_ma) {
        (Some(s), Some(l)) if s > l => Regime::Bullish,
        (Some(s), Some(l)) if s < l => Regime::Bearish,
        _ => match policy {
            TiePolicy::ThreeWay => Regime::Neutral,
            TiePolicy::CollapseToBearish => Regime::Bearish,
        },
    }
}

/// Annotate `series` with short/long moving averages and a regime per row.
pub fn detect_trend(series: &PriceSeries, config: &TrendConfig) -> TrendAnnotatedSeries {
    let closes = series.closes();
    let short_ma = Sma::new(config.short_window).over(&closes);
    let long_ma = Sma::new(config.long_window).over(&closes);
    let regime: Vec<Regime> = short_ma
        .iter()
        .zip(&long_ma)
        .map(|(&s, &l)| classify(s, l, config.tie_policy))
        .collect();

    tracing::debug!(
        rows = series.len(),
        short = config.short_window.get(),
        long = config.long_window.get(),
        "trend annotated"
    );

    TrendAnnotatedSeries {
        config: *config,
        series: series.clone(),
        short_ma,
        long_ma,
        regime,
    }
}

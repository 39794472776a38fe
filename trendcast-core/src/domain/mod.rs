//! Domain types for TrendCast

pub mod bar;
pub mod forecast;
pub mod regime;
pub mod series;

pub use bar::PriceBar;
pub use forecast::{ForecastPoint, ForecastSeries, LinearTrend};
pub use regime::Regime;
pub use series::{PriceSeries, SeriesError};

/// Symbol type alias
pub type Symbol = String;

//! PriceBar: one daily observation in a price series.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Daily closing price for a single symbol on a single day.
///
/// A close that could not be read as a number is carried as `f64::NAN`
/// (a void bar). Stages that need numbers drop void bars; the moving
/// averages treat any window containing one as undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    #[serde(deserialize_with = "close_or_void")]
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Returns true if the close is not a usable number.
    pub fn is_void(&self) -> bool {
        !self.close.is_finite()
    }
}

/// JSON writes a NaN close as `null`; read it back as a void close.
fn close_or_void<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

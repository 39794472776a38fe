use serde::{Deserialize, Serialize};
use std::fmt;

/// Trend direction from comparing a short and a long moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    Bullish,
    Bearish,
    /// Averages equal, or at least one is still warming up.
    Neutral,
}

impl Regime {
    pub fn as_str(self) -> &'static str {
        match self {
            Regime::Bullish => "Bullish",
            Regime::Bearish => "Bearish",
            Regime::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

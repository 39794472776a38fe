//! Primary-then-fallback source composition.
//!
//! Fallback policy:
//! 1. Ask the primary source
//! 2. On any error, log a warning and ask the fallback
//! 3. If both fail, return the fallback's error
//!
//! The returned [`Fetched`] records which source answered, so series built
//! from synthetic data stay identifiable downstream.

use super::{Fetched, PriceSource, SourceError, SourceKind};
use trendcast_core::PriceSeries;

pub struct FallbackSource {
    primary: Box<dyn PriceSource>,
    fallback: Box<dyn PriceSource>,
}

impl FallbackSource {
    pub fn new(primary: Box<dyn PriceSource>, fallback: Box<dyn PriceSource>) -> Self {
        Self { primary, fallback }
    }
}

impl PriceSource for FallbackSource {
    fn name(&self) -> &str {
        "fallback"
    }

    fn kind(&self) -> SourceKind {
        self.primary.kind()
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, SourceError> {
        self.fetch_tagged(symbol).map(|f| f.series)
    }

    fn fetch_tagged(&self, symbol: &str) -> Result<Fetched, SourceError> {
        match self.primary.fetch_tagged(symbol) {
            Ok(fetched) => Ok(fetched),
            Err(e) => {
                tracing::warn!(
                    symbol,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "primary source failed, using fallback"
                );
                self.fallback.fetch_tagged(symbol)
            }
        }
    }
}

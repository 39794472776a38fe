//! Price sources and structured error types.
//!
//! The PriceSource trait abstracts over where a series comes from (Yahoo
//! Finance, a CSV file, synthetic sample data) so callers pick the
//! implementation explicitly and tests can substitute their own.

pub mod csv_file;
pub mod fallback;
pub mod live;
pub mod synthetic;

pub use csv_file::{load_csv, read_csv, CsvSource};
pub use fallback::FallbackSource;
pub use live::LiveSource;
pub use synthetic::{sample_quote, SampleQuote, SyntheticSource, SAMPLE_QUOTES};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trendcast_core::domain::Symbol;
use trendcast_core::{PriceSeries, SchemaError, SeriesError};

/// Exchange suffix appended to bare symbols.
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".NS";

/// Structured error types for source operations.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider refused the request: {0}")]
    Blocked(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("source error: {0}")]
    Other(String),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Live,
    Csv,
    Synthetic,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Live => "live",
            SourceKind::Csv => "csv",
            SourceKind::Synthetic => "synthetic",
        }
    }

    pub fn is_synthetic(self) -> bool {
        self == SourceKind::Synthetic
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetched series tagged with the source that served it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub symbol: Symbol,
    pub series: PriceSeries,
    pub kind: SourceKind,
}

/// Trait for price sources (Yahoo Finance, CSV, synthetic).
///
/// Implementations receive an already-normalized symbol. Caching sits above
/// this trait; sources don't know about the cache.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Provenance tag for series served by this source.
    fn kind(&self) -> SourceKind;

    /// Fetch the daily close series for `symbol`.
    fn fetch(&self, symbol: &str) -> Result<PriceSeries, SourceError>;

    /// Fetch and tag with the serving source. Composite sources override this
    /// to report which inner source answered.
    fn fetch_tagged(&self, symbol: &str) -> Result<Fetched, SourceError> {
        Ok(Fetched {
            symbol: symbol.to_string(),
            series: self.fetch(symbol)?,
            kind: self.kind(),
        })
    }
}

/// Upper-case and trim `symbol`, appending `.NS` when it carries no exchange
/// suffix.
pub fn normalize_symbol(symbol: &str) -> Symbol {
    let symbol = symbol.trim().to_ascii_uppercase();
    if symbol.contains('.') {
        symbol
    } else {
        format!("{symbol}{DEFAULT_EXCHANGE_SUFFIX}")
    }
}

//! TrendCast Runner: price sources, caching, batch runs and report export.
//!
//! This crate builds on `trendcast-core` to provide:
//! - Price sources: Yahoo Finance, CSV files, seeded synthetic data
//! - Primary-then-fallback source composition
//! - A bounded LRU cache of fetched series
//! - Parallel batch analysis
//! - CSV and JSON report bundles

pub mod batch;
pub mod cache;
pub mod export;
pub mod source;

pub use batch::{analyze_batch, analyze_symbols, BatchItem, BatchSummary};
pub use cache::{SourceCache, DEFAULT_CACHE_CAPACITY};
pub use export::{
    analysis_to_json, export_analysis, table_to_csv, write_table_csv, ExportError,
};
pub use source::{
    load_csv, normalize_symbol, read_csv, sample_quote, CsvSource, FallbackSource, Fetched,
    LiveSource, PriceSource, SampleQuote, SourceError, SourceKind, SyntheticSource,
};

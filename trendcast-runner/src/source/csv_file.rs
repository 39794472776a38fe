//! CSV price files.
//!
//! Files carry a `Date,Close[,Volume]` header (case-insensitive, extra
//! columns ignored). Rows go through the price schema, so a missing column
//! fails before any row is read and non-numeric closes become void.

use std::path::{Path, PathBuf};

use super::{PriceSource, SourceError, SourceKind};
use trendcast_core::{PriceSchema, PriceSeries, Table};

/// Read a CSV file into a [`Table`] without interpreting any cell.
pub fn read_csv(path: &Path) -> Result<Table, SourceError> {
    let csv_err = |source| SourceError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut table = Table::new(reader.headers().map_err(csv_err)?.iter());
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        table.push_row(record.iter());
    }
    Ok(table)
}

/// Read and validate a CSV price file.
pub fn load_csv(path: &Path) -> Result<PriceSeries, SourceError> {
    let table = read_csv(path)?;
    let series = PriceSchema::parse(&table)?;
    tracing::debug!(path = %path.display(), rows = series.len(), "loaded csv closes");
    Ok(series)
}

/// Serves `{dir}/{SYMBOL}.csv`.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File for `symbol`; `None` when the symbol could name a path outside
    /// the directory.
    pub fn path_for(&self, symbol: &str) -> Option<PathBuf> {
        let unsafe_name = symbol.is_empty()
            || symbol.starts_with('.')
            || symbol.contains(['/', '\\'])
            || symbol.contains("..");
        if unsafe_name {
            return None;
        }
        Some(self.dir.join(format!("{symbol}.csv")))
    }
}

impl PriceSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Csv
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, SourceError> {
        let path = self
            .path_for(symbol)
            .filter(|p| p.exists())
            .ok_or_else(|| SourceError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        load_csv(&path)
    }
}

//! Report export: CSV tables and JSON analysis artifacts.
//!
//! An artifact bundle is a directory containing:
//! - `trend.csv`: Date, Close, Short_MA, Long_MA, Trend
//! - `forecast.csv`: Date, Predicted_Close (removed when there is no forecast)
//! - `summary.csv`: Stock Name, High, Low, Returns (%), Sharpe Ratio
//! - `analysis.json`: the full analysis summary

use std::path::{Path, PathBuf};

use thiserror::Error;
use trendcast_core::{summary_table, Analysis, Table, ToTable};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const TREND_FILE: &str = "trend.csv";
pub const FORECAST_FILE: &str = "forecast.csv";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const ANALYSIS_FILE: &str = "analysis.json";

/// Render a table as CSV text.
pub fn table_to_csv(table: &Table) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(table.header())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Write a table as CSV to `path`.
pub fn write_table_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(table.header())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize the analysis summary to pretty JSON.
pub fn analysis_to_json(analysis: &Analysis) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&analysis.summary())?)
}

/// Write the full artifact bundle for one analysis into `dir`, creating it
/// as needed. Returns the paths written.
pub fn export_analysis(
    name: &str,
    analysis: &Analysis,
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(4);

    let trend_path = dir.join(TREND_FILE);
    write_table_csv(&analysis.trend.to_table(), &trend_path)?;
    written.push(trend_path);

    let forecast_path = dir.join(FORECAST_FILE);
    match &analysis.forecast {
        Ok(forecast) => {
            write_table_csv(&forecast.to_table(), &forecast_path)?;
            written.push(forecast_path);
        }
        Err(_) => match std::fs::remove_file(&forecast_path) {
            Ok(()) => tracing::debug!(path = %forecast_path.display(), "removed stale forecast"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ExportError::Io {
                    path: forecast_path,
                    source,
                })
            }
        },
    }

    let summary_path = dir.join(SUMMARY_FILE);
    write_table_csv(&summary_table(name, &analysis.metrics), &summary_path)?;
    written.push(summary_path);

    let json_path = dir.join(ANALYSIS_FILE);
    std::fs::write(&json_path, analysis_to_json(analysis)?).map_err(|source| ExportError::Io {
        path: json_path.clone(),
        source,
    })?;
    written.push(json_path);

    tracing::info!(dir = %dir.display(), files = written.len(), "exported analysis");
    Ok(written)
}

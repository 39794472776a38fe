//! Price table schema: column checks and cell coercion.
//!
//! `date` and `close` are required, `volume` is optional. Column names match
//! case-insensitively so exported `Date,Close,Volume` headers load directly.
//! Missing columns fail before any row is read.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::domain::{PriceBar, PriceSeries, SeriesError};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid volume '{value}'")]
    InvalidVolume { row: usize, value: String },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Expected schema for price tables.
pub struct PriceSchema;

/// Column positions resolved from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub close: usize,
    pub volume: Option<usize>,
}

impl PriceSchema {
    pub const DATE: &'static str = "date";
    pub const CLOSE: &'static str = "close";
    pub const VOLUME: &'static str = "volume";

    /// Check that the required columns exist.
    pub fn validate(table: &Table) -> Result<ColumnMap, SchemaError> {
        let required = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };
        Ok(ColumnMap {
            date: required(Self::DATE)?,
            close: required(Self::CLOSE)?,
            volume: table.column_index(Self::VOLUME),
        })
    }

    /// Validate the header, then coerce every row into a [`PriceSeries`].
    ///
    /// Close cells that are not numbers become void closes rather than
    /// errors; date and volume cells must parse.
    pub fn parse(table: &Table) -> Result<PriceSeries, SchemaError> {
        let columns = Self::validate(table)?;
        let mut bars = Vec::with_capacity(table.len());
        let mut void = 0usize;

        for (row, cells) in table.rows().iter().enumerate() {
            let cell = |i: usize| cells.get(i).map(|c| c.trim()).unwrap_or("");

            let date_cell = cell(columns.date);
            let date = parse_date(date_cell).ok_or_else(|| SchemaError::InvalidDate {
                row,
                value: date_cell.to_string(),
            })?;

            let close = coerce_close(cell(columns.close));
            if close.is_nan() {
                void += 1;
            }

            let mut bar = PriceBar::new(date, close);
            if let Some(i) = columns.volume {
                let volume_cell = cell(i);
                if !volume_cell.is_empty() {
                    let volume =
                        parse_volume(volume_cell).ok_or_else(|| SchemaError::InvalidVolume {
                            row,
                            value: volume_cell.to_string(),
                        })?;
                    bar = bar.with_volume(volume);
                }
            }
            bars.push(bar);
        }

        if void > 0 {
            tracing::warn!(void, rows = bars.len(), "non-numeric close values coerced to void");
        }

        Ok(PriceSeries::new(bars)?)
    }
}

impl TryFrom<&Table> for PriceSeries {
    type Error = SchemaError;

    fn try_from(table: &Table) -> Result<Self, Self::Error> {
        PriceSchema::parse(table)
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time of day.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Numeric coercion: anything that isn't a finite number becomes NaN.
fn coerce_close(cell: &str) -> f64 {
    match cell.replace(',', "").parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

/// Whole non-negative numbers, also when written as `1000.0`.
fn parse_volume(cell: &str) -> Option<u64> {
    if let Ok(v) = cell.parse::<u64>() {
        return Some(v);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Some(v as u64),
        _ => None,
    }
}

//! Row-oriented string table: a header plus rows of cells.
//!
//! Used both as raw input (cells read from a CSV or another tabular source,
//! checked by [`crate::schema`]) and as report output (see [`crate::report`]).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn with_row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(row);
        self
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matching names case-insensitively after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Cell at (row, column), `None` if either is out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_ignores_case_and_padding() {
        let table = Table::new(["Date", " Close ", "Volume"]);
        assert_eq!(table.column_index("date"), Some(0));
        assert_eq!(table.column_index("CLOSE"), Some(1));
        assert_eq!(table.column_index("adj close"), None);
    }

    #[test]
    fn cells_out_of_range_are_none() {
        let table = Table::new(["a", "b"]).with_row(["1"]);
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(1, 0), None);
        assert_eq!(table.len(), 1);
    }
}

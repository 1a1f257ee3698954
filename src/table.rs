//! Raw detector output: cells, rows, tables and pages, plus the cell sanitizer.
//!
//! A [`RawTable`] is exactly what the layout detector produced for one table
//! region: a ragged grid of optional strings. Absent cells stay `None` until
//! sanitizing, which turns them into `""` and pads every row to a uniform
//! width.

use serde::{Deserialize, Serialize};

/// A single detected cell. `None` means the detector found no text there.
pub type Cell = Option<String>;

/// One detected row, possibly shorter than its neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Vec<Cell>);

impl Row {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Sanitize without padding: absent cells become `""`.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|c| c.clone().unwrap_or_default()).collect()
    }
}

impl<C, S> From<C> for Row
where
    C: IntoIterator<Item = Option<S>>,
    S: Into<String>,
{
    fn from(value: C) -> Self {
        Row(value.into_iter().map(|c| c.map(Into::into)).collect())
    }
}

/// One table region detected on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTable(pub Vec<Row>);

impl RawTable {
    pub fn rows(&self) -> &[Row] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Width of the widest row; `0` for an empty table.
    pub fn width(&self) -> usize {
        self.0.iter().map(Row::len).max().unwrap_or(0)
    }

    /// Every row sanitized and padded to [`RawTable::width`].
    pub fn sanitized(&self) -> Vec<Vec<String>> {
        let width = self.width();
        self.0.iter().map(|r| sanitize_row(r, width)).collect()
    }
}

impl<T, R> From<T> for RawTable
where
    T: IntoIterator<Item = R>,
    R: Into<Row>,
{
    fn from(value: T) -> Self {
        RawTable(value.into_iter().map(Into::into).collect())
    }
}

/// Tables found on one page, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number.
    pub number: usize,
    pub tables: Vec<RawTable>,
}

/// Turn `row` into exactly `width` strings.
///
/// Absent cells become `""` and missing trailing cells are padded with `""`.
/// Callers always pass a width at least as large as the row, so nothing is
/// ever cut off.
pub fn sanitize_row(row: &Row, width: usize) -> Vec<String> {
    let mut out = row.to_strings();
    if out.len() < width {
        out.resize(width, String::new());
    }
    out
}

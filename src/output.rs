//! Output types for both pipeline variants, with JSON and CSV rendering.
//!
//! JSON shapes:
//!
//! ```text
//! flat:        { "rows": 2, "data": [["Date","Amount"], ["2025-01-03","-4.50"]] }
//! normalized:  { "rows": 1, "columns": ["Date","Amount"],
//!                "data": [{"Date": "2025-01-03", "Amount": -4.5}] }
//! ```
//!
//! CSV output always has a uniform column count; absent values render as
//! empty cells.

use crate::error::ExtractError;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;

/// A typed cell in normalized output.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// CSV form: null renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Null => serializer.serialize_none(),
        }
    }
}

// ── Flat variant ─────────────────────────────────────────────────────────────

/// Every detected row as plain text, header rows included.
///
/// Rows keep their own width; [`FlatOutput::to_csv`] pads them to the widest
/// row in the whole output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatOutput {
    pub rows: usize,
    pub data: Vec<Vec<String>>,
}

impl FlatOutput {
    pub fn new(data: Vec<Vec<String>>) -> Self {
        Self {
            rows: data.len(),
            data,
        }
    }

    /// True when no table was found anywhere in the document.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Widest row in the output.
    pub fn max_width(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Render as CSV, right-padding every row to [`FlatOutput::max_width`].
    ///
    /// Returns `Ok(None)` when there are no rows, so callers can report
    /// "no tables found" instead of sending an empty document.
    pub fn to_csv(&self) -> Result<Option<String>, ExtractError> {
        if self.is_empty() {
            return Ok(None);
        }
        let width = self.max_width();
        let mut writer = csv::WriterBuilder::new()
            .flexible(false)
            .from_writer(Vec::new());
        for row in &self.data {
            let padding = std::iter::repeat_n("", width - row.len());
            writer.write_record(row.iter().map(String::as_str).chain(padding))?;
        }
        finish_csv(writer).map(Some)
    }
}

// ── Normalized variant ───────────────────────────────────────────────────────

/// Canonical, typed columns produced by the bank normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedOutput {
    pub rows: usize,
    /// Canonical column names, in canonical order.
    pub columns: Vec<String>,
    /// One entry per row, positionally aligned with `columns`.
    pub data: Vec<Vec<Value>>,
}

impl NormalizedOutput {
    pub fn new(columns: Vec<String>, data: Vec<Vec<Value>>) -> Self {
        Self {
            rows: data.len(),
            columns,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Value at (`row`, `column`).
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.data.get(row)?.get(idx)
    }

    /// Render as CSV with a header row. An empty result yields an empty string.
    pub fn to_csv(&self) -> Result<String, ExtractError> {
        if self.columns.is_empty() {
            return Ok(String::new());
        }
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.data {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        finish_csv(writer)
    }
}

/// Serialises `data` as objects keyed by column, in column order.
struct RowObject<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for NormalizedOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data: Vec<RowObject<'_>> = self
            .data
            .iter()
            .map(|values| RowObject {
                columns: &self.columns,
                values,
            })
            .collect();
        let mut s = serializer.serialize_struct("NormalizedOutput", 3)?;
        s.serialize_field("rows", &self.rows)?;
        s.serialize_field("columns", &self.columns)?;
        s.serialize_field("data", &data)?;
        s.end()
    }
}

// ── Either variant ───────────────────────────────────────────────────────────

/// The result of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutput {
    Flat(FlatOutput),
    Normalized(NormalizedOutput),
}

impl ExtractionOutput {
    pub fn rows(&self) -> usize {
        match self {
            ExtractionOutput::Flat(f) => f.rows,
            ExtractionOutput::Normalized(n) => n.rows,
        }
    }

    /// Pretty JSON in the shapes described at the top of this module.
    pub fn to_json(&self) -> Result<String, ExtractError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// CSV text, or `None` for a flat result with no rows.
    pub fn to_csv(&self) -> Result<Option<String>, ExtractError> {
        match self {
            ExtractionOutput::Flat(f) => f.to_csv(),
            ExtractionOutput::Normalized(n) => n.to_csv().map(Some),
        }
    }
}

/// The "no tables found" signal for CSV callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoTablesFound {
    pub rows: usize,
    pub message: &'static str,
}

impl Default for NoTablesFound {
    fn default() -> Self {
        Self {
            rows: 0,
            message: "no tables found",
        }
    }
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String, ExtractError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExtractError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExtractError::Internal(e.to_string()))
}

//! The record set: named, equal-length columns passed between stages.
//!
//! Record sets are values. Every stage takes one by reference and returns a
//! new one; nothing is mutated after construction.

/// A single column: its name and one optional value per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<String>>,
}

/// Ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    columns: Vec<Column>,
    row_count: usize,
}

impl RecordSet {
    /// Zero columns, zero rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Columns with no rows.
    pub fn with_columns(names: Vec<String>) -> Self {
        let columns = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::new(),
            })
            .collect();
        Self {
            columns,
            row_count: 0,
        }
    }

    /// Build from a header and positional rows.
    ///
    /// Every row must be exactly as wide as `names`; names must be unique.
    /// Both hold for rows produced by the table builder.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == names.len()));
        let row_count = rows.len();
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(row_count),
            })
            .collect();
        for row in rows {
            for (col, value) in columns.iter_mut().zip(row) {
                col.values.push(value);
            }
        }
        Self { columns, row_count }
    }

    pub(crate) fn from_columns(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == row_count));
        Self { columns, row_count }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when there are no columns and no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.row_count == 0
    }

    /// Value at (`row`, column `name`), flattening "no such column" into absent.
    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        self.column(name)
            .and_then(|c| c.values.get(row))
            .and_then(|v| v.as_deref())
    }
}

//! The layout-detector seam.
//!
//! Finding table regions on a PDF page is somebody else's job. This crate
//! only needs, per page, the tables that were found: ragged grids of
//! optional strings. [`TableSource`] is that contract, and
//! [`JsonTableSource`] reads it from the JSON a detector run produced.
//!
//! ## Detector dump format
//!
//! ```json
//! [
//!   [ [["Date", "Description", "Amount"], ["2025-01-03", null, "-4.50"]] ],
//!   { "error": "could not resolve ruling lines" },
//!   []
//! ]
//! ```
//!
//! The top level is one entry per page, optionally wrapped as
//! `{"pages": [...]}`. A page is a list of tables (a table is a list of rows,
//! a row a list of `string | null`), or an `{"error": ...}` object for a page
//! the detector failed on. A `null` page, or a `null` table within a page,
//! means the detector found nothing there.

use crate::error::{ExtractError, PageError};
use crate::table::RawTable;
use serde::de::Error as _;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Per-page access to detected tables.
///
/// Pages are 1-indexed. Implementations report detector failures as
/// [`PageError`]; the pipeline logs them and treats the page as empty.
pub trait TableSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Tables detected on `page`, in detection order.
    fn page_tables(&self, page: usize) -> Result<Vec<RawTable>, PageError>;
}

/// Detector output already in memory, typically loaded from a JSON dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonTableSource {
    pages: Vec<DetectedPage>,
}

#[derive(Debug, Clone, PartialEq)]
enum DetectedPage {
    Tables(Vec<RawTable>),
    Failed { error: String },
}

impl DetectedPage {
    fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::Object(mut obj) => match obj.remove("error") {
                Some(serde_json::Value::String(error)) => Ok(DetectedPage::Failed { error }),
                Some(other) => Ok(DetectedPage::Failed {
                    error: other.to_string(),
                }),
                None => Err(serde_json::Error::custom("page object without an \"error\" field")),
            },
            serde_json::Value::Null => Ok(DetectedPage::Tables(Vec::new())),
            other => Vec::<Option<RawTable>>::deserialize(other)
                .map(|tables| DetectedPage::Tables(tables.into_iter().flatten().collect())),
        }
    }
}

impl JsonTableSource {
    /// A source whose every page was detected successfully.
    pub fn from_pages(pages: Vec<Vec<RawTable>>) -> Self {
        Self {
            pages: pages.into_iter().map(DetectedPage::Tables).collect(),
        }
    }

    /// Parse a detector dump.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let pages = match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Object(mut obj) => obj
                .remove("pages")
                .ok_or_else(|| serde_json::Error::custom("expected a \"pages\" array"))?,
            other => other,
        };
        let serde_json::Value::Array(entries) = pages else {
            return Err(serde_json::Error::custom("expected an array of pages"));
        };
        let pages = entries
            .into_iter()
            .map(DetectedPage::from_value)
            .collect::<Result<_, _>>()?;
        Ok(Self { pages })
    }

    /// Read and parse a detector dump from disk.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExtractError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ExtractError::MalformedTables {
                path: path.to_path_buf(),
                detail: e.to_string(),
            },
        })?;
        let source = Self::from_json(&text).map_err(|e| ExtractError::MalformedTables {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        debug!("Loaded {} pages from {}", source.page_count(), path.display());
        Ok(source)
    }

    /// Record a detector failure for the next page.
    pub fn push_failed_page(&mut self, error: impl Into<String>) {
        self.pages.push(DetectedPage::Failed {
            error: error.into(),
        });
    }
}

impl TableSource for JsonTableSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_tables(&self, page: usize) -> Result<Vec<RawTable>, PageError> {
        let total = self.pages.len();
        match page.checked_sub(1).and_then(|i| self.pages.get(i)) {
            Some(DetectedPage::Tables(tables)) => Ok(tables.clone()),
            Some(DetectedPage::Failed { error }) => Err(PageError::DetectionFailed {
                page,
                detail: error.clone(),
            }),
            None => Err(PageError::OutOfRange { page, total }),
        }
    }
}

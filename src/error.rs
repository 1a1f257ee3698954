//! Error types for the edgequake-pdf2csv library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] is **fatal**: the extraction cannot proceed at all
//!   (no input supplied, unreadable detector dump, output not writable).
//!   Returned as `Err(ExtractError)` from the top-level `extract*` functions.
//!
//! * [`PageError`] is **non-fatal**: the layout detector failed on a single
//!   page. The page is treated as holding no tables and every other page is
//!   still processed.
//!
//! Cell coercion failures (an unparseable date or amount) are neither: they
//! degrade the affected field to its fallback value and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2csv library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is empty or neither a path nor a valid HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Detector errors ───────────────────────────────────────────────────
    /// The detector dump could not be decoded as pages of tables.
    #[error("Detector output '{path}' is malformed: {detail}")]
    MalformedTables { path: PathBuf, detail: String },

    /// A table with no rows reached the table builder.
    ///
    /// Empty tables are filtered before building, so this only surfaces when
    /// the builder is called directly.
    #[error("Cannot build a record set from an empty table")]
    EmptyTable,

    // ── Output errors ─────────────────────────────────────────────────────
    /// CSV or JSON rendering failed.
    #[error("Failed to render output: {0}")]
    Render(String),

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<csv::Error> for ExtractError {
    fn from(e: csv::Error) -> Self {
        ExtractError::Render(e.to_string())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(e: serde_json::Error) -> Self {
        ExtractError::Render(e.to_string())
    }
}

/// A non-fatal error for a single page.
///
/// Logged and counted by the pipeline; the page contributes zero tables.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The layout detector failed on this page.
    #[error("Page {page}: table detection failed: {detail}")]
    DetectionFailed { page: usize, detail: String },

    /// The requested page does not exist in the source.
    #[error("Page {page} is out of range (document has {total} pages)")]
    OutOfRange { page: usize, total: usize },
}

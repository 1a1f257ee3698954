//! # edgequake-pdf2csv
//!
//! Turn the tables a PDF layout detector found into CSV or JSON records.
//!
//! ## Why this crate?
//!
//! Table detectors hand back ragged grids: rows of different widths, absent
//! cells, headers that say "Txn Date" on one page and "Posting Date" on the
//! next, amounts written as `$1,200.00` or `(45.00)`. This crate cleans those
//! grids up, merges the tables of a whole document into one record set and,
//! for bank statements, maps them onto canonical typed columns.
//!
//! ## Pipeline Overview
//!
//! ```text
//! detector dump (path / URL / bytes)
//!  │
//!  ├─ 1. Input        resolve local file or download from URL
//!  ├─ 2. Source       pages of raw tables; failed pages count as empty
//!  │
//!  ├─ flat ────────── every row as text, padded to one width on CSV output
//!  │
//!  └─ normalized
//!      ├─ 3. Classify     header cells → column roles, unique names
//!      ├─ 4. Build        one record set per table
//!      ├─ 5. Consolidate  union of all tables, first-seen column order
//!      └─ 6. Normalize    Date / Description / Amount / Debit / Credit / Balance
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2csv::{extract, ExtractionConfig, OutputVariant};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .variant(OutputVariant::Normalized)
//!         .build()?;
//!     let output = extract("statement.tables.json", &config).await?;
//!     println!("{}", output.to_json()?);
//!     eprintln!("rows: {}", output.rows());
//!     Ok(())
//! }
//! ```
//!
//! The pipeline itself does not need a runtime. Any [`TableSource`] can be
//! fed straight in:
//!
//! ```rust
//! use edgequake_pdf2csv::{extract_from_source, ExtractionConfig, JsonTableSource, RawTable};
//!
//! let table = RawTable::from(vec![
//!     vec![Some("Date"), Some("Description"), Some("Amount")],
//!     vec![Some("2025-01-03"), Some("Coffee Shop"), Some("-4.50")],
//! ]);
//! let source = JsonTableSource::from_pages(vec![vec![table]]);
//! let output = extract_from_source(&source, &ExtractionConfig::default()).unwrap();
//! assert_eq!(output.rows(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2csv` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdf2csv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod source;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, OutputFormat, OutputVariant, PageSelection};
pub use convert::{
    extract, extract_flat, extract_from_bytes, extract_from_source, extract_normalized,
    extract_sync, extract_to_file, render, render_or_signal,
};
pub use error::{ExtractError, PageError};
pub use output::{ExtractionOutput, FlatOutput, NoTablesFound, NormalizedOutput, Value};
pub use pipeline::classify::{classify_header, ColumnRole};
pub use pipeline::normalize::{normalize_amount, normalize_date};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::RecordSet;
pub use source::{JsonTableSource, TableSource};
pub use table::{Page, RawTable, Row};

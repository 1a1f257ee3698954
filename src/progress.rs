//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to hear about
//! each page as the pipeline reads it. Pages are read one at a time, in
//! order, on the caller's thread.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2csv::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct TableCounter {
//!     tables: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for TableCounter {
//!     fn on_page_complete(&self, _page_num: usize, _total_pages: usize, tables: usize) {
//!         self.tables.fetch_add(tables, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(TableCounter { tables: AtomicUsize::new(0) });
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline as it reads each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `Send + Sync` so one callback can be shared by
/// concurrent, independent extraction runs.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first page is read.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's tables were collected.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: pages selected for this run
    /// * `tables`: non-empty tables found on the page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, tables: usize) {
        let _ = (page_num, total_pages, tables);
    }

    /// Called when the detector failed on a page. The page counts as empty.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after every selected page was read.
    ///
    /// # Arguments
    /// * `total_pages`: pages selected for this run
    /// * `rows`: rows in the final output
    fn on_extraction_complete(&self, total_pages: usize, rows: usize) {
        let _ = (total_pages, rows);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

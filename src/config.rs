//! Configuration types for table extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The pipeline itself has very few
//! knobs; most of the fields here concern the boundary (which pages, which
//! output shape, how long to wait for a download).

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for one extraction run.
///
/// # Example
/// ```rust
/// use edgequake_pdf2csv::{ExtractionConfig, OutputVariant};
///
/// let config = ExtractionConfig::builder()
///     .variant(OutputVariant::Normalized)
///     .default_year(2025)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Which pipeline variant to run. Default: [`OutputVariant::Flat`].
    pub variant: OutputVariant,

    /// Rendering used by the CLI and [`crate::convert::extract_to_file`].
    /// Default: [`OutputFormat::Csv`].
    pub format: OutputFormat,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Year assumed for statement dates written without one ("Jul 20").
    /// `None` (default) uses the current local year.
    pub default_year: Option<i32>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-page progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            variant: OutputVariant::default(),
            format: OutputFormat::default(),
            pages: PageSelection::default(),
            default_year: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("variant", &self.variant)
            .field("format", &self.format)
            .field("pages", &self.pages)
            .field("default_year", &self.default_year)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    pub(crate) fn normalize_options(&self) -> crate::pipeline::normalize::NormalizeOptions {
        crate::pipeline::normalize::NormalizeOptions {
            default_year: self.default_year,
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn variant(mut self, variant: OutputVariant) -> Self {
        self.config.variant = variant;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn default_year(mut self, year: i32) -> Self {
        self.config.default_year = Some(year);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if let Some(year) = c.default_year {
            if !(1..=9999).contains(&year) {
                return Err(ExtractError::InvalidConfig(format!(
                    "Default year must be 1–9999, got {year}"
                )));
            }
        }
        if c.download_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(ExtractError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which pipeline produces the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputVariant {
    /// Every row as plain text, header rows included. (default)
    #[default]
    Flat,
    /// Canonical Date/Description/Amount/Debit/Credit/Balance columns, typed.
    Normalized,
}

/// How a result is rendered for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values. (default)
    #[default]
    Csv,
    /// Pretty-printed JSON.
    Json,
}

/// Specifies which pages of the document to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// All pages (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 1-indexed page numbers.
    pub fn to_page_numbers(&self, total_pages: usize) -> Vec<usize> {
        let in_range = |p: &usize| *p >= 1 && *p <= total_pages;
        let mut pages: Vec<usize> = match self {
            PageSelection::All => (1..=total_pages).collect(),
            PageSelection::Single(p) => std::iter::once(*p).filter(in_range).collect(),
            PageSelection::Range(start, end) => ((*start).max(1)..=(*end).min(total_pages)).collect(),
            PageSelection::Set(pages) => pages.iter().copied().filter(in_range).collect(),
        };
        pages.sort_unstable();
        pages.dedup();
        pages
    }
}

impl FromStr for PageSelection {
    type Err = ExtractError;

    /// Parse `all`, `5`, `3-15`, or a comma list mixing both (`1,3-5,9`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let items = s
            .split(',')
            .map(parse_page_item)
            .collect::<Result<Vec<_>, _>>()?;

        match items.as_slice() {
            [(start, end)] if start == end => Ok(PageSelection::Single(*start)),
            [(start, end)] => Ok(PageSelection::Range(*start, *end)),
            _ => Ok(PageSelection::Set(
                items.iter().flat_map(|&(start, end)| start..=end).collect(),
            )),
        }
    }
}

/// One `N` or `N-M` item of a page list, as an inclusive range.
fn parse_page_item(item: &str) -> Result<(usize, usize), ExtractError> {
    let page = |text: &str| {
        text.trim()
            .parse::<usize>()
            .ok()
            .filter(|&p| p >= 1)
            .ok_or_else(|| {
                ExtractError::InvalidConfig(format!(
                    "'{}' is not a page number (pages count from 1)",
                    text.trim()
                ))
            })
    };
    let (start, end) = match item.split_once('-') {
        Some((a, b)) => (page(a)?, page(b)?),
        None => {
            let p = page(item)?;
            (p, p)
        }
    };
    if start > end {
        return Err(ExtractError::InvalidConfig(format!(
            "Page range '{}' runs backwards",
            item.trim()
        )));
    }
    Ok((start, end))
}

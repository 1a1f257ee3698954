//! Extraction entry points.
//!
//! The `*_from_source` functions run the pipeline over any [`TableSource`]
//! and never touch the file system. [`extract`] and friends add the boundary:
//! resolve a path or URL, load the detector dump, then run the pipeline.

use crate::config::{ExtractionConfig, OutputFormat, OutputVariant};
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, FlatOutput, NoTablesFound, NormalizedOutput};
use crate::pipeline::{build, consolidate, flat, input, normalize};
use crate::source::{JsonTableSource, TableSource};
use crate::table::Page;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract tables from a detector dump at a local path or HTTP/HTTPS URL.
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors: missing or unreadable
/// input, a failed download, or a dump that is not pages of tables. A
/// document with no tables is an `Ok` result with zero rows.
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let source = JsonTableSource::from_path(resolved.path())?;
    // `resolved` is dropped (and any temp storage removed) when we return.
    extract_from_source(&source, config)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

/// Extract tables from a detector dump held in memory.
///
/// The bytes are spilled to a managed temp file that is removed on return.
pub fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let spilled = input::spill_bytes(bytes)?;
    let source = JsonTableSource::from_path(spilled.path())?;
    extract_from_source(&source, config)
}

/// Extract and write the rendered result to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files. Returns
/// the number of rows written. When a flat CSV extraction finds no tables,
/// the file holds the [`NoTablesFound`] JSON signal, as stdout would.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<usize, ExtractError> {
    let output = extract(input_str, config).await?;
    let path = output_path.as_ref();

    let rendered = render_or_signal(&output, config.format)?;
    if output.rows() == 0 {
        warn!("No tables found; {} holds an empty result", path.display());
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExtractError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, rendered)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.rows())
}

/// Run the configured variant over `source`.
pub fn extract_from_source(
    source: &dyn TableSource,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let start = Instant::now();
    let pages = collect_pages(source, config);

    let output = match config.variant {
        OutputVariant::Flat => ExtractionOutput::Flat(flat::flatten(&pages)),
        OutputVariant::Normalized => {
            ExtractionOutput::Normalized(normalize_pages(&pages, config)?)
        }
    };

    info!(
        "Extraction complete: {} rows from {} pages in {}ms",
        output.rows(),
        pages.len(),
        start.elapsed().as_millis()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(pages.len(), output.rows());
    }
    Ok(output)
}

/// Flat variant over `source`.
pub fn extract_flat(source: &dyn TableSource, config: &ExtractionConfig) -> FlatOutput {
    flat::flatten(&collect_pages(source, config))
}

/// Normalized variant over `source`.
pub fn extract_normalized(
    source: &dyn TableSource,
    config: &ExtractionConfig,
) -> Result<NormalizedOutput, ExtractError> {
    normalize_pages(&collect_pages(source, config), config)
}

/// Render `output` in `format`.
///
/// `Ok(None)` means a flat CSV with no rows: the caller should report
/// [`NoTablesFound`] rather than an empty document.
pub fn render(
    output: &ExtractionOutput,
    format: OutputFormat,
) -> Result<Option<String>, ExtractError> {
    match format {
        OutputFormat::Json => output.to_json().map(Some),
        OutputFormat::Csv => output.to_csv(),
    }
}

/// Render `output`, substituting the "no tables found" JSON signal where
/// [`render`] has nothing to show.
pub fn render_or_signal(
    output: &ExtractionOutput,
    format: OutputFormat,
) -> Result<String, ExtractError> {
    match render(output, format)? {
        Some(text) => Ok(text),
        None => Ok(serde_json::to_string(&NoTablesFound::default())?),
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Read the selected pages, swallowing detector failures and dropping
/// tables with no rows.
fn collect_pages(source: &dyn TableSource, config: &ExtractionConfig) -> Vec<Page> {
    let numbers = config.pages.to_page_numbers(source.page_count());
    let total = numbers.len();
    debug!("Selected {} of {} pages", total, source.page_count());

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total);
    }

    numbers
        .into_iter()
        .map(|number| {
            let tables = match source.page_tables(number) {
                Ok(tables) => tables,
                Err(e) => {
                    warn!("{}; treating page as having no tables", e);
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_page_error(number, total, &e.to_string());
                    }
                    Vec::new()
                }
            };
            let found = tables.len();
            let tables: Vec<_> = tables.into_iter().filter(|t| !t.is_empty()).collect();
            if tables.len() < found {
                debug!("Page {}: dropped {} empty tables", number, found - tables.len());
            }
            debug!("Page {}: {} tables", number, tables.len());
            if let Some(ref cb) = config.progress_callback {
                cb.on_page_complete(number, total, tables.len());
            }
            Page { number, tables }
        })
        .collect()
}

fn normalize_pages(
    pages: &[Page],
    config: &ExtractionConfig,
) -> Result<NormalizedOutput, ExtractError> {
    let record_sets = pages
        .iter()
        .flat_map(|p| p.tables.iter())
        .map(build::build_record_set)
        .collect::<Result<Vec<_>, _>>()?;
    let consolidated = consolidate::consolidate(&record_sets);
    debug!(
        "Consolidated {} tables into {} columns x {} rows",
        record_sets.len(),
        consolidated.column_count(),
        consolidated.row_count()
    );
    Ok(normalize::normalize(&consolidated, &config.normalize_options()))
}

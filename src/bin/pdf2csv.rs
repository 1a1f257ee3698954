//! CLI binary for edgequake-pdf2csv.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2csv::{
    extract, extract_to_file, render_or_signal, ExtractionConfig, ExtractionProgressCallback,
    OutputFormat, OutputVariant, PageSelection, ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── Per-page reporting ───────────────────────────────────────────────────────

/// Prints one line per page to stderr and counts detector failures.
#[derive(Default)]
struct CliProgressCallback {
    tables: AtomicUsize,
    errors: AtomicUsize,
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_page_complete(&self, page_num: usize, total_pages: usize, tables: usize) {
        self.tables.fetch_add(tables, Ordering::Relaxed);
        eprintln!(
            "  {} page {page_num}/{total_pages}  {}",
            green("✓"),
            dim(&format!("{tables} tables"))
        );
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        eprintln!("  {} page {page_num}/{total_pages}  {}", red("✗"), dim(error));
    }
}

/// Extract tables detected in PDF documents to CSV or JSON.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2csv",
    version,
    about = "Extract tables detected in PDF documents to CSV or JSON",
    long_about = "Read the tables a PDF layout detector found (a JSON dump, local or by URL) \
and write them as CSV or JSON. The flat variant keeps every row as text; the normalized \
variant merges all tables and maps bank-statement columns onto Date, Description, Amount, \
Debit, Credit and Balance.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// Detector dump: local file path or HTTP/HTTPS URL.
    input: String,

    /// Write the result to this file instead of stdout.
    #[arg(short, long, env = "PDF2CSV_OUTPUT")]
    output: Option<PathBuf>,

    /// Output shape: flat rows or normalized bank-statement columns.
    #[arg(long, env = "PDF2CSV_VARIANT", value_enum, default_value = "flat")]
    variant: VariantArg,

    /// Shorthand for `--variant normalized`.
    #[arg(long, conflicts_with = "variant")]
    normalize: bool,

    /// Rendering: csv or json.
    #[arg(long, env = "PDF2CSV_FORMAT", value_enum, default_value = "csv")]
    format: FormatArg,

    /// Page selection: all, 5, 3-15, or a list such as 1,3-5,9.
    #[arg(long, env = "PDF2CSV_PAGES", default_value = "all")]
    pages: String,

    /// Year for dates written without one (default: current year).
    #[arg(long, env = "PDF2CSV_YEAR")]
    year: Option<i32>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2CSV_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Enable DEBUG-level tracing logs and per-page lines.
    #[arg(short, long, env = "PDF2CSV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2CSV_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    Flat,
    Normalized,
}

impl From<VariantArg> for OutputVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Flat => OutputVariant::Flat,
            VariantArg::Normalized => OutputVariant::Normalized,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress = cli.verbose.then(|| Arc::new(CliProgressCallback::default()));
    let config = build_config(&cli, progress.clone().map(|p| p as ProgressCallback))?;

    let start = Instant::now();

    // ── Extract ──────────────────────────────────────────────────────────
    let rows = if let Some(ref path) = cli.output {
        extract_to_file(&cli.input, path, &config)
            .await
            .with_context(|| format!("Failed to extract tables from {}", cli.input))?
    } else {
        let output = extract(&cli.input, &config)
            .await
            .with_context(|| format!("Failed to extract tables from {}", cli.input))?;
        let text = render_or_signal(&output, config.format)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
        output.rows()
    };

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet {
        let mut line = format!(
            "{} {rows} rows in {:.2}s",
            green("✓"),
            start.elapsed().as_secs_f64()
        );
        if let Some(ref p) = progress {
            line.push_str(&dim(&format!(
                "  ({} tables, {} failed pages)",
                p.tables.load(Ordering::Relaxed),
                p.errors.load(Ordering::Relaxed)
            )));
        }
        if let Some(ref path) = cli.output {
            line.push_str(&format!(" → {}", path.display()));
        }
        eprintln!("{line}");
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let variant = if cli.normalize {
        OutputVariant::Normalized
    } else {
        cli.variant.into()
    };

    let mut builder = ExtractionConfig::builder()
        .variant(variant)
        .format(cli.format.into())
        .pages(
            cli.pages
                .parse::<PageSelection>()
                .with_context(|| format!("Invalid --pages '{}'", cli.pages))?,
        )
        .download_timeout_secs(cli.download_timeout);

    if let Some(year) = cli.year {
        builder = builder.default_year(year);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

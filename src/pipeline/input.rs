//! Input resolution: normalise a user-supplied path, URL or byte buffer to a
//! local detector dump.
//!
//! Downloads and in-memory uploads are written to temporary storage that is
//! removed when the [`ResolvedInput`] is dropped. A failure to remove it is
//! ignored; it never affects the extraction result.

use crate::error::ExtractError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

/// The resolved input: a local path, or a file in temporary storage.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the dump was downloaded to a temp directory that
    /// lives as long as this value.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
    /// Input was a byte buffer, spilled to a temp file.
    Spilled(NamedTempFile),
}

impl ResolvedInput {
    /// Get the path to the file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
            ResolvedInput::Spilled(tmp) => tmp.path(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local file path.
///
/// An empty input is the one request-level error the caller can make by
/// omission: there is nothing to extract from.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, ExtractError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ExtractError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Write `bytes` to a temp file that is deleted when the result is dropped.
pub fn spill_bytes(bytes: &[u8]) -> Result<ResolvedInput, ExtractError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("pdf2csv-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| ExtractError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| ExtractError::Internal(format!("tempfile write: {e}")))?;
    debug!("Spilled {} bytes to {}", bytes.len(), tmp.path().display());
    Ok(ResolvedInput::Spilled(tmp))
}

fn resolve_local(path_str: &str) -> Result<ResolvedInput, ExtractError> {
    let path = PathBuf::from(path_str);

    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(ExtractError::InvalidInput { input: path_str.to_string() }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => return Err(ExtractError::FileNotFound { path }),
    }

    debug!("Resolved local input: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Fetch the dump at `url` into a fresh temp directory.
///
/// The whole body is buffered; detector dumps are small.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, ExtractError> {
    info!("Downloading detector output from: {}", url);
    let failed = |e: reqwest::Error| download_error(url, timeout_secs, e);

    let body = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(failed)?
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(failed)?
        .bytes()
        .await
        .map_err(failed)?;

    let temp_dir = tempfile::Builder::new()
        .prefix("pdf2csv-")
        .tempdir()
        .map_err(|e| ExtractError::Internal(format!("tempdir: {e}")))?;
    let path = temp_dir.path().join(extract_filename(url));
    tokio::fs::write(&path, &body)
        .await
        .map_err(|e| ExtractError::Internal(format!("tempfile write: {e}")))?;

    debug!("Downloaded {} bytes to {}", body.len(), path.display());
    Ok(ResolvedInput::Downloaded {
        path,
        _temp_dir: temp_dir,
    })
}

fn download_error(url: &str, timeout_secs: u64, e: reqwest::Error) -> ExtractError {
    let url = url.to_string();
    if e.is_timeout() {
        return ExtractError::DownloadTimeout {
            url,
            secs: timeout_secs,
        };
    }
    let reason = match e.status() {
        Some(status) => format!("HTTP {status}"),
        None => e.to_string(),
    };
    ExtractError::DownloadFailed { url, reason }
}

/// Last path segment of the URL if it looks like a file name.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "tables.json".to_string()
}

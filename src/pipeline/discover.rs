//! Candidate discovery: find the PDFs to summarise and check their size.
//!
//! Discovery is non-recursive and tolerant: a missing input directory simply
//! yields no candidates. Size is checked per file right before processing
//! so a file replaced after listing is judged on its current size.

use crate::error::PdfSumError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// True when the file name ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}

/// List the PDF files directly inside `directory`, sorted by file name.
///
/// Returns an empty list when `directory` does not exist or is not a
/// directory. Sub-directories are never entered, and entries that are not
/// regular files are skipped even if their name ends in `.pdf`.
pub fn list_pdf_files(directory: &Path) -> Result<Vec<PathBuf>, PdfSumError> {
    if !directory.is_dir() {
        debug!("PDF directory {} not found", directory.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(directory).map_err(|e| PdfSumError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PdfSumError::DirectoryUnreadable {
            path: directory.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if has_pdf_extension(&path) && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} PDF(s) in {}", files.len(), directory.display());
    Ok(files)
}

/// Check that `path` exists and is no larger than `max_mb` megabytes.
///
/// A file of exactly `max_mb * 1 048 576` bytes passes.
pub fn validate_size(path: &Path, max_mb: u64) -> Result<u64, PdfSumError> {
    let metadata = std::fs::metadata(path).map_err(|_| PdfSumError::FileNotFound {
        path: path.to_path_buf(),
    })?;

    let size_bytes = metadata.len();
    let max_bytes = max_mb.saturating_mul(1024 * 1024);
    if size_bytes > max_bytes {
        return Err(PdfSumError::FileTooLarge {
            path: path.to_path_buf(),
            size_bytes,
            max_mb,
        });
    }
    Ok(size_bytes)
}

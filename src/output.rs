//! Output types: per-file results and the batch outcome.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of summarising a single PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Source PDF.
    pub pdf_path: PathBuf,
    /// The Markdown report that was written.
    pub report_path: PathBuf,
    /// Characters of text extracted from the PDF.
    pub extracted_chars: usize,
    /// Chunks the text was split into.
    pub chunks: usize,
    /// Completion calls made for this file.
    pub completion_calls: usize,
    /// Characters in the final summary.
    pub summary_chars: usize,
    /// Wall-clock time for this file in milliseconds.
    pub duration_ms: u64,
}

/// Result of a complete batch run.
///
/// A run over a directory without PDFs has an empty `files` list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Directory that was scanned.
    pub directory: PathBuf,
    /// One entry per PDF, in processing order.
    pub files: Vec<FileReport>,
    /// Total wall-clock time in milliseconds.
    pub total_duration_ms: u64,
}

impl BatchOutcome {
    /// True when no PDF was found to process.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Completion calls across all files.
    pub fn total_completion_calls(&self) -> usize {
        self.files.iter().map(|f| f.completion_calls).sum()
    }
}

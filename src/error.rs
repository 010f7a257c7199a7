//! Error types for the edgequake-pdfsum library.
//!
//! Every failure in a batch run is fatal: the first error aborts the whole
//! run and the process exits with code 1. There is therefore a single error
//! type, [`PdfSumError`], grouped by the stage that produces it. Use
//! [`PdfSumError::kind`] when a caller needs to branch on the category
//! rather than the exact variant.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdfsum library.
#[derive(Debug, Error)]
pub enum PdfSumError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key in the environment or the properties file.
    #[error("OpenAI API key is not set in environment or properties")]
    MissingApiKey,

    /// A setting was present but could not be parsed or is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Discovery errors ──────────────────────────────────────────────────
    /// A candidate file disappeared between discovery and validation.
    #[error("File does not exist: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A candidate file is bigger than `pdf.max.size.mb`.
    #[error(
        "PDF file exceeds maximum size of {max_mb} MB: {} ({:.2} MB)",
        file_name(.path),
        megabytes(.size_bytes)
    )]
    FileTooLarge {
        path: PathBuf,
        size_bytes: u64,
        max_mb: u64,
    },

    /// The input directory exists but could not be listed.
    #[error("Failed to read directory '{}': {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The file could not be parsed as a PDF.
    #[error("Failed to extract text from PDF: {} - {detail}", file_name(.path))]
    ExtractionFailed { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
PDFium is normally downloaded automatically on first run.\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy."
    )]
    PdfiumBindingFailed(String),

    // ── Completion errors ─────────────────────────────────────────────────
    /// The completion service returned an error. Never retried.
    #[error("LLM API error: {message}")]
    CompletionFailed { message: String },

    /// The completion call did not answer within the configured timeout.
    #[error("LLM call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    // ── Report errors ─────────────────────────────────────────────────────
    /// The writer was handed a missing or nonexistent source file.
    #[error("{0}")]
    InvalidArgument(String),

    /// Could not create or write the Markdown report.
    #[error("Failed to write output file '{}': {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error category, matching the stages of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    FileTooLarge,
    Discovery,
    Extraction,
    Write,
    Completion,
    Internal,
}

impl PdfSumError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::FileNotFound { .. } | Self::DirectoryUnreadable { .. } => ErrorKind::Discovery,
            Self::ExtractionFailed { .. } | Self::PdfiumBindingFailed(_) => ErrorKind::Extraction,
            Self::InvalidArgument(_) | Self::OutputWriteFailed { .. } => ErrorKind::Write,
            Self::CompletionFailed { .. } | Self::ApiTimeout { .. } => ErrorKind::Completion,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True for errors raised before any file is touched.
    pub fn is_configuration_error(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// The message shown to the user on the single error line.
    ///
    /// Oversized files abort the remaining batch, which the message says.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileTooLarge { .. } => format!("{self} Processing aborted."),
            _ => self.to_string(),
        }
    }
}

fn megabytes(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! Text extraction: PDF file → plain text via pdfium.
//!
//! pdfium is a C++ library with thread-local state, so extraction is a plain
//! blocking call. The batch runner moves it onto the blocking pool with
//! `tokio::task::spawn_blocking` rather than calling it from async code.
//!
//! A PDF that parses but carries no text layer (e.g. a scan) is a success
//! with an empty string. Only files that cannot be parsed are errors.

use crate::error::PdfSumError;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Turns a PDF on disk into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of every page, trimmed. Empty when the PDF has no text.
    fn extract_text(&self, path: &Path) -> Result<String, PdfSumError>;
}

/// [`TextExtractor`] backed by pdfium.
///
/// The pdfium shared library is located through `pdfium-auto`, which uses
/// `PDFIUM_LIB_PATH` when set and otherwise downloads and caches the
/// platform binary on first use.
#[derive(Debug, Clone, Default)]
pub struct PdfiumExtractor {
    password: Option<String>,
}

impl PdfiumExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Password for encrypted documents.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl TextExtractor for PdfiumExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, PdfSumError> {
        check_pdf_header(path)?;

        let pdfium = pdfium_auto::bind_pdfium_silent()
            .map_err(|e| PdfSumError::PdfiumBindingFailed(e.to_string()))?;

        let document = pdfium
            .load_pdf_from_file(path, self.password.as_deref())
            .map_err(|e| PdfSumError::ExtractionFailed {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        let mut text = String::new();
        for (idx, page) in pages.iter().enumerate() {
            let page_text = page.text().map_err(|e| PdfSumError::ExtractionFailed {
                path: path.to_path_buf(),
                detail: format!("page {}: {:?}", idx + 1, e),
            })?;
            let content = page_text.all();
            debug!("Page {} → {} chars", idx + 1, content.len());
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&content);
        }

        Ok(text.trim().to_string())
    }
}

/// Reject files that do not start with the `%PDF` magic bytes.
///
/// Catches renamed non-PDFs with a readable message before pdfium sees them.
pub fn check_pdf_header(path: &Path) -> Result<(), PdfSumError> {
    let mut file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PdfSumError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => PdfSumError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    })?;

    let mut magic = [0u8; 4];
    match file.read_exact(&mut magic) {
        Ok(()) if &magic == b"%PDF" => Ok(()),
        Ok(()) => Err(PdfSumError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: format!("not a PDF (first bytes: {:?})", magic),
        }),
        Err(_) => Err(PdfSumError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: "file is too short to be a PDF".to_string(),
        }),
    }
}

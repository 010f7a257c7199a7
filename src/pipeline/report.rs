//! Markdown report: summary → `<name>.pdf.md` next to the source PDF.
//!
//! The file is written to a temporary file in the target directory and then
//! renamed over the destination, so a crash never leaves a half-written
//! report behind. An existing report is replaced.

use crate::error::PdfSumError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `chrono` format for the "Generated on" line: local time, no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const FOOTER: &str = "*Generated using edgequake-llm & OpenAI GPT*";

/// Render the report body. Field order is fixed.
pub fn render_report(summary: &str, filename: &str, timestamp: &str) -> String {
    format!(
        "# Summary for {filename}\n\
         \n\
         **Original File:** {filename}  \n\
         **Generated on:** {timestamp}\n\
         \n\
         ---\n\
         \n\
         ## Summary\n\
         \n\
         {summary}\n\
         \n\
         ---\n\
         \n\
         {FOOTER}\n"
    )
}

/// Path of the report for `original`: same directory, file name + `.md`.
pub fn report_path_for(original: &Path) -> PathBuf {
    let mut name = original
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".md");
    original.with_file_name(name)
}

/// Writes summary reports beside their source PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter;

impl MarkdownWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write the report for `original` and return its path.
    ///
    /// `original` must name an existing file; this is checked before any
    /// output is created.
    pub fn write(&self, summary: &str, original: Option<&Path>) -> Result<PathBuf, PdfSumError> {
        let original = original
            .filter(|p| p.exists())
            .ok_or_else(|| PdfSumError::InvalidArgument("Original PDF file must exist".into()))?;

        let filename = original
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let body = render_report(summary, &filename, &timestamp);

        let target = report_path_for(original);
        write_atomic(&target, body.as_bytes())?;
        debug!("Wrote {} bytes to {}", body.len(), target.display());
        Ok(target)
    }
}

fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), PdfSumError> {
    let write_failed = |source: std::io::Error| PdfSumError::OutputWriteFailed {
        path: target.to_path_buf(),
        source,
    };

    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.flush().map_err(write_failed)?;
    tmp.persist(target).map_err(|e| write_failed(e.error))?;
    Ok(())
}

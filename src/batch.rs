//! Batch orchestration: directory in, one Markdown report per PDF out.
//!
//! ```text
//! require API key ──▶ discover ──▶ for each PDF (in name order):
//!                                    size check ─▶ extract ─▶ summarize ─▶ write
//! ```
//!
//! The run is all-or-nothing per file and stops at the first error: files
//! after a failing one are left untouched, and reports already written stay
//! on disk.

use crate::config::SummaryConfig;
use crate::error::PdfSumError;
use crate::output::{BatchOutcome, FileReport};
use crate::pipeline::discover::{list_pdf_files, validate_size};
use crate::pipeline::extract::{PdfiumExtractor, TextExtractor};
use crate::pipeline::llm::{CompletionModel, LlmCompletionModel};
use crate::pipeline::report::MarkdownWriter;
use crate::pipeline::summarize::{ChunkingSummarizer, Summarizer};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs the summarisation pipeline over every PDF in a directory.
pub struct BatchRunner {
    config: SummaryConfig,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
    writer: MarkdownWriter,
    progress: ProgressCallback,
}

impl BatchRunner {
    pub fn new(
        config: SummaryConfig,
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            config,
            extractor,
            summarizer,
            writer: MarkdownWriter::new(),
            progress: Arc::new(NoopProgressCallback),
        }
    }

    /// Production wiring: pdfium extraction and an OpenAI-backed summariser.
    ///
    /// Fails with [`PdfSumError::MissingApiKey`] when no key was resolved.
    pub fn from_config(config: SummaryConfig) -> Result<Self, PdfSumError> {
        let model: Arc<dyn CompletionModel> = Arc::new(LlmCompletionModel::from_config(&config)?);
        let summarizer = Arc::new(ChunkingSummarizer::new(model, config.chunk_budget));
        Ok(Self::new(config, Arc::new(PdfiumExtractor::new()), summarizer))
    }

    /// Receive per-file progress events.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress = cb;
        self
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Process every PDF in the configured directory.
    ///
    /// Returns an outcome with no files when the directory holds no PDF (or
    /// does not exist). Any error aborts the run.
    pub async fn run(&self) -> Result<BatchOutcome, PdfSumError> {
        let start = Instant::now();
        self.config.require_api_key()?;

        let directory = self.config.pdf_directory.clone();
        let files = list_pdf_files(&directory)?;

        if files.is_empty() {
            info!("No PDFs found in {}", directory.display());
            self.progress.on_no_files(&directory);
            return Ok(BatchOutcome {
                directory,
                files: Vec::new(),
                total_duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        let total = files.len();
        info!("Processing {} PDF(s) from {}", total, directory.display());
        self.progress.on_batch_start(total);

        let mut reports = Vec::with_capacity(total);
        for (idx, path) in files.iter().enumerate() {
            let index = idx + 1;
            self.progress.on_file_start(index, total, path);

            match self.process_file(path).await {
                Ok(report) => {
                    self.progress.on_file_complete(index, total, &report);
                    reports.push(report);
                }
                Err(e) => {
                    debug!("Aborting batch at {}: {}", path.display(), e);
                    self.progress
                        .on_file_error(index, total, path, &e.user_message());
                    return Err(e);
                }
            }
        }

        self.progress.on_batch_complete(reports.len());
        Ok(BatchOutcome {
            directory,
            files: reports,
            total_duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Validate, extract, summarise and write one file.
    pub async fn process_file(&self, path: &Path) -> Result<FileReport, PdfSumError> {
        let start = Instant::now();

        let size = validate_size(path, self.config.max_pdf_size_mb)?;
        info!("Summarising {} ({} bytes)", path.display(), size);

        let text = self.extract(path.to_path_buf()).await?;
        debug!("Extracted {} chars", text.chars().count());

        let summary = self.summarizer.summarize(&text).await?;
        let report_path = self.writer.write(&summary.text, Some(path))?;
        info!("Report written to {}", report_path.display());

        Ok(FileReport {
            pdf_path: path.to_path_buf(),
            report_path,
            extracted_chars: text.chars().count(),
            chunks: summary.chunks,
            completion_calls: summary.completion_calls,
            summary_chars: summary.text.chars().count(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn extract(&self, path: PathBuf) -> Result<String, PdfSumError> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || extractor.extract_text(&path))
            .await
            .map_err(|e| PdfSumError::Internal(format!("spawn_blocking panicked: {}", e)))?
    }
}

/// Process exit code for a batch result: 0 on success, 1 on any error.
pub fn exit_code(result: &Result<BatchOutcome, PdfSumError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(&Ok(BatchOutcome::default())), 0);
        assert_eq!(exit_code(&Err(PdfSumError::MissingApiKey)), 1);
    }

    #[test]
    fn from_config_without_key_fails() {
        assert!(matches!(
            BatchRunner::from_config(SummaryConfig::default()),
            Err(PdfSumError::MissingApiKey)
        ));
    }

    #[test]
    fn from_config_with_key_builds() {
        let config = SummaryConfig::builder().api_key("sk-test").build().unwrap();
        let runner = BatchRunner::from_config(config).unwrap();
        assert_eq!(runner.config().chunk_budget, 8000);
    }
}

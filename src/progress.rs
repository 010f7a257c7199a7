//! Progress-callback trait for per-file batch events.
//!
//! Attach an [`Arc<dyn BatchProgressCallback>`] with
//! [`crate::batch::BatchRunner::progress_callback`] to be told as each file
//! moves through the pipeline. The binary uses it to drive a terminal
//! progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfsum::{BatchProgressCallback, FileReport};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Counter(AtomicUsize);
//!
//! impl BatchProgressCallback for Counter {
//!     fn on_file_complete(&self, index: usize, total: usize, report: &FileReport) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, report.report_path.display());
//!     }
//! }
//! ```

use crate::output::FileReport;
use std::path::Path;
use std::sync::Arc;

/// Called by the batch runner as it works through the discovered files.
///
/// Files are processed one at a time, so calls never overlap. All methods
/// have default no-op implementations.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before the first file.
    ///
    /// # Arguments
    /// * `total_files`: number of PDFs that will be processed
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called when the directory holds no PDF.
    fn on_no_files(&self, directory: &Path) {
        let _ = directory;
    }

    /// Called before a file is validated and extracted.
    ///
    /// # Arguments
    /// * `index`: 1-indexed position in the batch
    /// * `total`: number of files in the batch
    /// * `path`: the PDF about to be processed
    fn on_file_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called after the report for a file has been written.
    fn on_file_complete(&self, index: usize, total: usize, report: &FileReport) {
        let _ = (index, total, report);
    }

    /// Called when a file fails. The batch stops after this call.
    fn on_file_error(&self, index: usize, total: usize, path: &Path, error: &str) {
        let _ = (index, total, path, error);
    }

    /// Called once after every file has been written successfully.
    fn on_batch_complete(&self, processed: usize) {
        let _ = processed;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias for the type held by [`crate::batch::BatchRunner`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

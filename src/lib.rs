//! # edgequake-pdfsum
//!
//! Summarise every PDF in a directory into a Markdown report using an LLM.
//!
//! For each `*.pdf` found, the text is extracted with pdfium, split into
//! chunks that fit a single request, summarised chunk by chunk, merged into
//! one unified summary, and written next to the source as `<name>.pdf.md`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ./pdfs/
//!  │
//!  ├─ 1. Discover   list *.pdf (name order), enforce size limit
//!  ├─ 2. Extract    pdfium text layer (blocking, spawn_blocking)
//!  ├─ 3. Chunk      paragraph / sentence packing, 8000 chars per chunk
//!  ├─ 4. Summarize  one call per chunk, one merge call when >1 chunk
//!  └─ 5. Report     <name>.pdf.md, atomic write
//! ```
//!
//! Files are processed one at a time. The first error stops the batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfsum::{BatchRunner, Properties, ProcessEnv, SummaryConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let props = Properties::load(Path::new("application.properties"), false);
//!     let config = SummaryConfig::resolve(&ProcessEnv, &props)?;
//!     let outcome = BatchRunner::from_config(config)?.run().await?;
//!     for file in &outcome.files {
//!         println!("{}", file.report_path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsum` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdfsum = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{exit_code, BatchRunner};
pub use config::{EnvSource, ProcessEnv, Properties, SummaryConfig, SummaryConfigBuilder};
pub use error::{ErrorKind, PdfSumError};
pub use output::{BatchOutcome, FileReport};
pub use pipeline::extract::{PdfiumExtractor, TextExtractor};
pub use pipeline::llm::{CompletionModel, LlmCompletionModel};
pub use pipeline::report::MarkdownWriter;
pub use pipeline::summarize::{ChunkingSummarizer, Summarizer, Summary};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};

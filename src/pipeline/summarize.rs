//! Chunked summarisation: text → one summary.
//!
//! ```text
//! text ──▶ chunks ──▶ chunk summaries ──▶ unified summary
//!          (chunk)    (1 call each)       (1 call, only when >1 chunk)
//! ```
//!
//! Calls are issued one at a time in chunk order. The first failing call
//! ends the summary with that error; earlier results are discarded.

use crate::error::PdfSumError;
use crate::pipeline::chunk::split_into_chunks;
use crate::pipeline::llm::CompletionModel;
use crate::prompts::{chunk_prompt, combine_prompt, EMPTY_TEXT_SUMMARY};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Result of summarising one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// The summary text, as returned by the model.
    pub text: String,
    /// Number of chunks the input was split into (0 for blank input).
    pub chunks: usize,
    /// Completion calls made to produce `text`.
    pub completion_calls: usize,
}

/// Produces a summary for a document's text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<Summary, PdfSumError>;
}

/// [`Summarizer`] that splits long text into chunks and merges their
/// summaries with a final call.
pub struct ChunkingSummarizer {
    model: Arc<dyn CompletionModel>,
    chunk_budget: usize,
}

impl ChunkingSummarizer {
    pub fn new(model: Arc<dyn CompletionModel>, chunk_budget: usize) -> Self {
        Self {
            model,
            chunk_budget,
        }
    }
}

#[async_trait]
impl Summarizer for ChunkingSummarizer {
    async fn summarize(&self, text: &str) -> Result<Summary, PdfSumError> {
        if text.trim().is_empty() {
            return Ok(Summary {
                text: EMPTY_TEXT_SUMMARY.to_string(),
                chunks: 0,
                completion_calls: 0,
            });
        }

        let chunks = split_into_chunks(text, self.chunk_budget);
        debug!(
            "Summarising {} chars in {} chunk(s)",
            text.chars().count(),
            chunks.len()
        );

        if chunks.len() == 1 {
            let text = self.model.complete(&chunk_prompt(&chunks[0])).await?;
            return Ok(Summary {
                text,
                chunks: 1,
                completion_calls: 1,
            });
        }

        let mut partials = Vec::with_capacity(chunks.len());
        for (idx, chunk) in chunks.iter().enumerate() {
            debug!(
                "Chunk {}/{}: {} chars",
                idx + 1,
                chunks.len(),
                chunk.chars().count()
            );
            partials.push(self.model.complete(&chunk_prompt(chunk)).await?);
        }

        let text = self.model.complete(&combine_prompt(&partials)).await?;
        Ok(Summary {
            text,
            chunks: chunks.len(),
            completion_calls: chunks.len() + 1,
        })
    }
}

//! Pipeline stages for summarising one PDF.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the two external boundaries (pdfium and the completion service)
//! sit behind traits.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ extract ──▶ chunk ──▶ summarize ──▶ report
//! (dir scan)   (pdfium)    (split)   (llm calls)   (markdown)
//! ```
//!
//! 1. [`discover`]: list `*.pdf` candidates and enforce the size limit
//! 2. [`extract`]: PDF → plain text; blocking, run in `spawn_blocking`
//! 3. [`chunk`]: split text into budget-sized pieces
//! 4. [`summarize`]: per-chunk summaries, then one unified summary;
//!    talks to the model through [`llm`], the only stage with network I/O
//! 5. [`report`]: write `<name>.pdf.md` beside the source file

pub mod chunk;
pub mod discover;
pub mod extract;
pub mod llm;
pub mod report;
pub mod summarize;

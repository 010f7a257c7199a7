//! Text chunking: split extracted text into pieces that fit one request.
//!
//! Packing is greedy and order-preserving. Paragraphs (separated by blank
//! lines) are the preferred unit; a paragraph longer than the budget is
//! broken into sentences. A single sentence longer than the budget is kept
//! whole as its own chunk rather than being cut mid-sentence.
//!
//! Lengths are counted in `char`s, not bytes, so multi-byte text is not
//! penalised relative to ASCII.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Blank line: newline, optional whitespace, newline.
static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t\r\f\v]*\n").unwrap());

/// Sentence end: terminal punctuation followed by whitespace.
static RE_SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Split `text` into chunks of at most `budget` characters.
///
/// Every chunk is a contiguous slice of `text`, so separators inside a chunk
/// are kept exactly as extracted; text that fits the budget comes back whole.
/// Returns an empty vector for blank input. Chunks are trimmed and never
/// empty.
pub fn split_into_chunks(text: &str, budget: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if char_len(trimmed) <= budget {
        return vec![trimmed.to_string()];
    }

    let mut packer = Packer::new(text, budget);
    for paragraph in paragraph_spans(text) {
        if char_len(&text[paragraph.clone()]) <= budget {
            packer.push(paragraph);
        } else {
            for sentence in sentence_spans(text, paragraph) {
                packer.push(sentence);
            }
        }
    }
    packer.finish()
}

/// Paragraphs of `text`, trimmed, empty ones dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    paragraph_spans(text).into_iter().map(|r| &text[r]).collect()
}

/// Sentences of `text`; terminal punctuation stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_spans(text, 0..text.len())
        .into_iter()
        .map(|r| &text[r])
        .collect()
}

fn paragraph_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    for m in RE_PARAGRAPH_BREAK.find_iter(text) {
        spans.extend(trim_span(text, start..m.start()));
        start = m.end();
    }
    spans.extend(trim_span(text, start..text.len()));
    spans
}

fn sentence_spans(text: &str, within: Range<usize>) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = within.start;
    for m in RE_SENTENCE_END.find_iter(&text[within.clone()]) {
        // Punctuation is a single ASCII byte, so +1 stays on a char boundary.
        let end = within.start + m.start() + 1;
        spans.extend(trim_span(text, start..end));
        start = within.start + m.end();
    }
    spans.extend(trim_span(text, start..within.end));
    spans
}

/// Narrow `span` to exclude surrounding whitespace; `None` if nothing is left.
fn trim_span(text: &str, span: Range<usize>) -> Option<Range<usize>> {
    let s = &text[span.clone()];
    let lead = s.len() - s.trim_start().len();
    let kept = s.trim().len();
    (kept > 0).then(|| span.start + lead..span.start + lead + kept)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedy accumulator over byte spans of the source text.
struct Packer<'a> {
    text: &'a str,
    budget: usize,
    current: Option<Range<usize>>,
    current_len: usize,
    chunks: Vec<String>,
}

impl<'a> Packer<'a> {
    fn new(text: &'a str, budget: usize) -> Self {
        Self {
            text,
            budget,
            current: None,
            current_len: 0,
            chunks: Vec::new(),
        }
    }

    /// Extend the current chunk to the end of `unit`, or close it first if
    /// that would overflow.
    fn push(&mut self, unit: Range<usize>) {
        let Some(current) = self.current.clone() else {
            self.current_len = char_len(&self.text[unit.clone()]);
            self.current = Some(unit);
            return;
        };

        let joined_len = self.current_len + char_len(&self.text[current.end..unit.end]);
        if joined_len <= self.budget {
            self.current = Some(current.start..unit.end);
            self.current_len = joined_len;
        } else {
            self.flush();
            self.current_len = char_len(&self.text[unit.clone()]);
            self.current = Some(unit);
        }
    }

    fn flush(&mut self) {
        if let Some(span) = self.current.take() {
            self.chunks.push(self.text[span].to_string());
            self.current_len = 0;
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_has_no_chunks() {
        assert!(split_into_chunks("", 100).is_empty());
        assert!(split_into_chunks("  \n\n \t ", 100).is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        let text = "First paragraph.\n\nSecond paragraph.";
        assert_eq!(split_into_chunks(text, 100), vec![text.to_string()]);
    }

    #[test]
    fn text_within_budget_is_kept_verbatim() {
        let text = "Page one text.\r\n\r\nPage two text.\n \nTail.";
        assert_eq!(split_into_chunks(text, 100), vec![text.to_string()]);
        let padded = format!("\n  {text}\r\n");
        assert_eq!(split_into_chunks(&padded, 100), vec![text.to_string()]);
    }

    #[test]
    fn over_budget_text_is_split_even_if_rejoined_would_fit() {
        // 45 chars as given; rejoined with a plain blank line it would be 40.
        let text = "aaaaaaaaaaaaaaaaaaa\r\n \t \r\nbbbbbbbbbbbbbbbbbbb";
        assert!(text.chars().count() > 40);
        let chunks = split_into_chunks(text, 40);
        assert_eq!(chunks, vec!["aaaaaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbbbbb"]);
    }

    #[test]
    fn text_exactly_at_budget_is_one_chunk() {
        let text = "a".repeat(120);
        let chunks = split_into_chunks(&text, 120);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn paragraphs_pack_greedily() {
        let p = "x".repeat(40);
        let text = format!("{p}\n\n{p}\n\n{p}");
        // Two paragraphs + separator = 82 chars, fits in 100; the third does not.
        let chunks = split_into_chunks(&text, 100);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{p}\n\n{p}"));
        assert_eq!(chunks[1], p);
    }

    #[test]
    fn blank_lines_with_whitespace_split_paragraphs() {
        let paras = split_paragraphs("one\n  \ntwo\n\n\n\nthree\nstill three");
        assert_eq!(paras, vec!["one", "two", "three\nstill three"]);
    }

    #[test]
    fn long_paragraph_splits_on_sentences() {
        let sentence = "This is a sample sentence for testing purposes.";
        let text = std::iter::repeat(sentence)
            .take(10)
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_into_chunks(&text, 120);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 120, "chunk too long: {chunk:?}");
            assert!(chunk.ends_with('.'), "chunk must end on a sentence: {chunk:?}");
        }
    }

    #[test]
    fn no_chunk_exceeds_budget_for_mixed_text() {
        let mut text = String::new();
        for i in 0..50 {
            text.push_str(&format!(
                "Paragraph {i} opens here. It has a second sentence! Does it ask? Yes.\n\n"
            ));
        }
        for chunk in split_into_chunks(&text, 150) {
            assert!(chunk.chars().count() <= 150);
        }
    }

    #[test]
    fn oversized_sentence_passes_through_whole() {
        let giant = format!("{}.", "w".repeat(300));
        let text = format!("Short one. {giant} Another short one.");
        let chunks = split_into_chunks(&text, 100);
        assert!(chunks.contains(&giant), "got: {chunks:?}");
        for chunk in chunks.iter().filter(|c| **c != giant) {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn chunk_order_follows_text_order() {
        let text = (0..30)
            .map(|i| format!("Sentence number {i:02} is here."))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_into_chunks(&text, 90);
        let rejoined = chunks.join(" ");
        let positions: Vec<usize> = (0..30)
            .map(|i| rejoined.find(&format!("number {i:02} ")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sentences_keep_punctuation() {
        assert_eq!(
            split_sentences("Hi there. How are you? Great!  Bye"),
            vec!["Hi there.", "How are you?", "Great!", "Bye"]
        );
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        // 50 two-byte chars: 100 bytes but 50 chars.
        let text = "é".repeat(50);
        assert_eq!(split_into_chunks(&text, 50).len(), 1);
    }
}

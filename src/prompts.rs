//! Prompt templates for document summarisation.
//!
//! All wording sent to the model lives here, so changing the instructions
//! (sentence limits, tone) touches exactly one file and tests can assert on
//! the rendered prompts without a live model.

/// Returned instead of calling the model when there is no text.
pub const EMPTY_TEXT_SUMMARY: &str = "No content to summarize.";

/// Template for summarising one chunk. `{text}` is replaced with the chunk.
pub const CHUNK_SUMMARY_TEMPLATE: &str = "Please provide a concise summary of the following text in maximum 5 sentences.
Focus on the main points and key information.

Text to summarize:
{text}
";

/// Template for merging chunk summaries. `{summaries}` is replaced with the
/// chunk summaries, in chunk order, separated by blank lines.
pub const COMBINE_SUMMARY_TEMPLATE: &str = "Please provide a unified summary of the following summaries in maximum 10 sentences.
Focus on connecting the main themes and key points.

Summaries to combine:
{summaries}
";

/// Separator placed between chunk summaries in the combine prompt.
pub const SUMMARY_SEPARATOR: &str = "\n\n";

/// Build the prompt that summarises a single chunk.
pub fn chunk_prompt(text: &str) -> String {
    CHUNK_SUMMARY_TEMPLATE.replace("{text}", text)
}

/// Build the prompt that merges per-chunk summaries into one.
pub fn combine_prompt(summaries: &[String]) -> String {
    COMBINE_SUMMARY_TEMPLATE.replace("{summaries}", &summaries.join(SUMMARY_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_prompt_embeds_text_and_limit() {
        let p = chunk_prompt("The quick brown fox.");
        assert!(p.contains("maximum 5 sentences"));
        assert!(p.contains("Text to summarize:\nThe quick brown fox.\n"));
    }

    #[test]
    fn combine_prompt_keeps_order() {
        let p = combine_prompt(&["first".to_string(), "second".to_string()]);
        assert!(p.contains("unified summary"));
        assert!(p.contains("maximum 10 sentences"));
        assert!(p.contains("Summaries to combine:\nfirst\n\nsecond\n"));
    }

    #[test]
    fn chunk_text_with_placeholder_like_braces_is_kept() {
        // Only the template placeholder is replaced, not braces in the text.
        let p = chunk_prompt("call {summaries} later");
        assert!(p.contains("call {summaries} later"));
    }
}

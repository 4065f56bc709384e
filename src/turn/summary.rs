// turn/summary.rs

use crate::ai::{ChatModel, CompletionRequest};
use crate::message::ChatMessage;
use crate::prompt::{self, NO_INFORMATION};
use crate::search::SearchResult;

const SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 500;
pub const SUMMARY_SOURCES: usize = 3;
const FALLBACK_SNIPPET_CHARS: usize = 200;

/// Condenses the top results into a short digest. Never fails.
pub async fn summarize(
    model: &dyn ChatModel,
    helper_model: &str,
    query: &str,
    results: &[SearchResult],
) -> String {
    if results.is_empty() {
        return NO_INFORMATION.to_string();
    }

    let top = &results[..results.len().min(SUMMARY_SOURCES)];
    let request = CompletionRequest::new(
        helper_model,
        vec![ChatMessage::user(prompt::search_summary(query, top))],
        SUMMARY_TEMPERATURE,
    )
    .max_tokens(SUMMARY_MAX_TOKENS);

    match model.complete(request).await {
        Ok(completion) => completion.content,
        Err(e) => {
            log::warn!("Summary failed, falling back to snippets: {e}");
            snippet_fallback(top)
        }
    }
}

/// Truncated snippets of the top sources, one per line.
pub fn snippet_fallback(results: &[SearchResult]) -> String {
    results
        .iter()
        .take(SUMMARY_SOURCES)
        .map(|r| r.snippet.chars().take(FALLBACK_SNIPPET_CHARS).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

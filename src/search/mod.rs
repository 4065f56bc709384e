// search/mod.rs

mod cache;
mod duckduckgo;

pub use cache::{CachedSearch, SearchCache};
pub use duckduckgo::{DuckDuckGo, InstantAnswer, SafeSearch, parse_instant_answer};

use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESULTS: usize = 5;

/// One normalized search hit. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// A single way of querying a search provider.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    fn name(&self) -> String;

    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchResult>, SearchError>;
}

/// Tries each strategy in order and keeps the first non-empty answer.
pub struct WebRetriever {
    strategies: Vec<Box<dyn SearchStrategy>>,
}

impl WebRetriever {
    pub fn new(strategies: Vec<Box<dyn SearchStrategy>>) -> Self {
        Self { strategies }
    }

    /// The three DuckDuckGo profiles: no region, worldwide, then `cn-zh` with safesearch off.
    pub fn duckduckgo(client: reqwest::Client) -> Self {
        Self::new(vec![
            Box::new(DuckDuckGo::new(client.clone(), None, SafeSearch::Moderate)),
            Box::new(DuckDuckGo::new(
                client.clone(),
                Some("wt-wt".to_string()),
                SafeSearch::Moderate,
            )),
            Box::new(DuckDuckGo::new(client, Some("cn-zh".to_string()), SafeSearch::Off)),
        ])
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    // Never fails: an exhausted chain is an empty list.
    pub async fn retrieve(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        log::info!("Searching: {query}");
        for (i, strategy) in self.strategies.iter().enumerate() {
            match strategy.search(query, max_results).await {
                Ok(results) if !results.is_empty() => {
                    log::info!(
                        "Strategy {} ({}) found {} results",
                        i + 1,
                        strategy.name(),
                        results.len()
                    );
                    return results.into_iter().take(max_results).collect();
                }
                Ok(_) => log::debug!(
                    "Strategy {} ({}) returned nothing, trying the next one",
                    i + 1,
                    strategy.name()
                ),
                Err(e) => log::warn!("Strategy {} ({}) failed: {e}", i + 1, strategy.name()),
            }
        }
        log::warn!("No search strategy returned results for {query:?}");
        Vec::new()
    }
}

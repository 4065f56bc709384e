// turn/mod.rs
//
// One user turn: decide -> (retrieve -> summarize) -> synthesize.

mod decision;
mod summary;
mod synthesis;

pub use decision::{SearchDecision, decide};
pub use summary::{SUMMARY_SOURCES, snippet_fallback, summarize};
pub use synthesis::{build_messages, synthesize};

use std::sync::Arc;

use strum::Display;
use tokio::sync::Mutex;

use crate::ai::ChatModel;
use crate::message::ChatMessage;
use crate::persona::Persona;
use crate::search::{CachedSearch, DEFAULT_MAX_RESULTS, SearchCache, SearchResult, WebRetriever};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TurnStage {
    Idle,
    Deciding,
    Retrieving,
    Summarizing,
    Synthesizing,
    Done,
}

impl TurnStage {
    pub fn label(&self) -> &'static str {
        match self {
            TurnStage::Idle => "No search needed",
            TurnStage::Deciding => "Deciding whether to search",
            TurnStage::Retrieving => "Searching the web",
            TurnStage::Summarizing => "Summarizing search results",
            TurnStage::Synthesizing => "Thinking",
            TurnStage::Done => "Done",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub primary_model: String,
    pub helper_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_search_results: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for PipelineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            primary_model: settings.primary_model.clone(),
            helper_model: settings.helper_model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            max_search_results: if settings.max_search_results == 0 {
                DEFAULT_MAX_RESULTS
            } else {
                settings.max_search_results
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub persona: &'static Persona,
    pub history: Vec<ChatMessage>,
    pub user_message: String,
    pub search_enabled: bool,
}

/// What one turn produced. `reply` is `None` when the primary model call failed,
/// in which case usage is zero and `error` explains why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnResult {
    pub reply: Option<String>,
    pub tokens_used: u32,
    pub cost: f64,
    pub search_performed: bool,
    pub search_query: String,
    pub search_summary: String,
    pub search_results: Vec<SearchResult>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct TurnPipeline {
    model: Arc<dyn ChatModel>,
    retriever: Arc<WebRetriever>,
    cache: Arc<Mutex<SearchCache>>,
    config: PipelineConfig,
}

impl TurnPipeline {
    pub fn new(model: Arc<dyn ChatModel>, retriever: WebRetriever, config: PipelineConfig) -> Self {
        Self {
            model,
            retriever: Arc::new(retriever),
            cache: Arc::new(Mutex::new(SearchCache::new())),
            config,
        }
    }

    pub fn cache(&self) -> Arc<Mutex<SearchCache>> {
        Arc::clone(&self.cache)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run_turn(
        &self,
        request: TurnRequest,
        observer: &(dyn Fn(TurnStage) + Send + Sync),
    ) -> TurnResult {
        let mut result = TurnResult::default();
        let model = self.model.as_ref();

        if request.search_enabled {
            observer(TurnStage::Deciding);
            let decision = decide(
                model,
                &self.config.helper_model,
                &request.user_message,
                request.persona.name,
            )
            .await;

            if decision.need_search {
                let entry = self.search(&decision.search_query, observer).await;
                result.search_performed = true;
                result.search_query = decision.search_query;
                result.search_summary = entry.summary;
                result.search_results = entry.results;
            } else {
                observer(TurnStage::Idle);
            }
        }

        observer(TurnStage::Synthesizing);
        let summary = result
            .search_performed
            .then_some(result.search_summary.as_str());
        let messages = build_messages(
            request.persona,
            summary,
            &request.history,
            &request.user_message,
        );

        match synthesize(
            model,
            &self.config.primary_model,
            self.config.temperature,
            self.config.max_tokens,
            messages,
        )
        .await
        {
            Ok(completion) => {
                result.tokens_used = completion.usage.total_tokens;
                result.cost = completion.usage.cost();
                result.reply = Some(completion.content);
            }
            Err(e) => {
                log::error!("Reply generation failed: {e}");
                result.error = Some(format!("Failed to generate a reply: {e}"));
            }
        }

        observer(TurnStage::Done);
        result
    }

    // The cache lock is never held across a network call.
    async fn search(
        &self,
        query: &str,
        observer: &(dyn Fn(TurnStage) + Send + Sync),
    ) -> CachedSearch {
        if let Some(hit) = self.cache.lock().await.get(query).cloned() {
            log::info!("Using cached search for {query:?}");
            return hit;
        }

        observer(TurnStage::Retrieving);
        let results = self
            .retriever
            .retrieve(query, self.config.max_search_results)
            .await;

        observer(TurnStage::Summarizing);
        let summary = summarize(
            self.model.as_ref(),
            &self.config.helper_model,
            query,
            &results,
        )
        .await;

        let entry = CachedSearch { summary, results };
        self.cache.lock().await.insert(query, entry.clone());
        entry
    }
}

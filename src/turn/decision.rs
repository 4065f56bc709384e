// turn/decision.rs

use serde::{Deserialize, Serialize};

use crate::ai::{ChatModel, CompletionRequest};
use crate::error::AIError;
use crate::message::ChatMessage;
use crate::prompt;

const DECISION_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDecision {
    pub need_search: bool,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub reason: String, // Only logged.
}

impl SearchDecision {
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            need_search: false,
            search_query: String::new(),
            reason: reason.into(),
        }
    }

    /// Parses and validates the model's JSON answer.
    pub fn parse(raw: &str) -> Result<Self, AIError> {
        let mut decision: SearchDecision = serde_json::from_str(raw.trim())?;
        decision.search_query = decision.search_query.trim().to_string();
        if decision.need_search && decision.search_query.is_empty() {
            return Err(AIError::MalformedDecision(
                "need_search is true but search_query is empty".to_string(),
            ));
        }
        Ok(decision)
    }
}

/// Asks the helper model whether the message needs a web search.
/// Any failure means no search for this turn.
pub async fn decide(
    model: &dyn ChatModel,
    helper_model: &str,
    user_message: &str,
    persona_name: &str,
) -> SearchDecision {
    let request = CompletionRequest::new(
        helper_model,
        vec![ChatMessage::user(prompt::search_decision(
            user_message,
            persona_name,
        ))],
        DECISION_TEMPERATURE,
    )
    .json_output();

    let outcome = match model.complete(request).await {
        Ok(completion) => SearchDecision::parse(&completion.content),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(decision) => {
            log::debug!(
                "Search decision: need_search={}, query={:?}, reason={}",
                decision.need_search,
                decision.search_query,
                decision.reason
            );
            decision
        }
        Err(e) => {
            log::warn!("Search decision failed: {e}");
            SearchDecision::skip(format!("decision failed: {e}"))
        }
    }
}

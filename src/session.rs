use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::message::ChatMessage;
use crate::persona::{self, Persona};
use crate::search::SearchResult;
use crate::turn::TurnResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub query: String,
    pub summary: String,
    pub user_question: String,
    pub results: Vec<SearchResult>,
}

/// Everything one chat session accumulates. Mutated only from the UI task.
#[derive(Debug, Clone)]
pub struct SessionState {
    persona: Option<&'static Persona>,
    pub messages: Vec<ChatMessage>,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub search_enabled: bool,
    pub search_history: Vec<SearchRecord>,
}

impl SessionState {
    pub fn new(search_enabled: bool) -> Self {
        Self {
            persona: None,
            messages: Vec::new(),
            total_tokens: 0,
            total_cost: 0.0,
            search_enabled,
            search_history: Vec::new(),
        }
    }

    pub fn persona(&self) -> Option<&'static Persona> {
        self.persona
    }

    /// Switching to another persona clears the conversation.
    pub fn select_persona(&mut self, id: &str) -> Result<&'static Persona> {
        let selected = persona::find(id).ok_or_else(|| AppError::UnknownPersona(id.to_string()))?;
        if self.persona.map(|current| current.id) != Some(selected.id) {
            self.persona = Some(selected);
            self.messages.clear();
        }
        Ok(selected)
    }

    /// Selects the persona and replaces the conversation with a saved one.
    pub fn restore(&mut self, id: &str, messages: Vec<ChatMessage>) -> Result<&'static Persona> {
        let selected = self.select_persona(id)?;
        self.messages = messages;
        Ok(selected)
    }

    pub fn reset(&mut self) {
        self.messages.clear();
    }

    pub fn toggle_search(&mut self) -> bool {
        self.search_enabled = !self.search_enabled;
        self.search_enabled
    }

    /// Records a finished turn. Returns false, leaving everything untouched,
    /// when the turn produced no reply.
    pub fn apply_turn(&mut self, user_message: &str, result: &TurnResult) -> bool {
        let Some(reply) = &result.reply else {
            return false;
        };

        self.total_tokens += u64::from(result.tokens_used);
        self.total_cost += result.cost;
        self.messages.push(ChatMessage::user(user_message));
        self.messages.push(ChatMessage::assistant(reply.clone()));

        if result.search_performed {
            self.search_history.push(SearchRecord {
                query: result.search_query.clone(),
                summary: result.search_summary.clone(),
                user_question: user_message.to_string(),
                results: result.search_results.clone(),
            });
        }
        true
    }

    pub fn search_count(&self) -> usize {
        self.search_history.len()
    }

    /// Most recent first.
    pub fn recent_searches(&self, n: usize) -> impl Iterator<Item = &SearchRecord> {
        self.search_history.iter().rev().take(n)
    }
}

// turn/synthesis.rs

use crate::ai::{ChatModel, Completion, CompletionRequest};
use crate::error::AIError;
use crate::message::ChatMessage;
use crate::persona::Persona;
use crate::prompt;

/// Builds system prompt + history + new message. The summary, when present,
/// is appended to the persona's system prompt.
pub fn build_messages(
    persona: &Persona,
    summary: Option<&str>,
    history: &[ChatMessage],
    user_message: &str,
) -> Vec<ChatMessage> {
    let mut system = prompt::system_prompt(persona);
    if let Some(summary) = summary {
        system.push_str("\n\n");
        system.push_str(&prompt::search_enhancement(
            user_message,
            persona.name,
            summary,
        ));
    }

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(user_message));
    messages
}

pub async fn synthesize(
    model: &dyn ChatModel,
    primary_model: &str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
) -> Result<Completion, AIError> {
    let request =
        CompletionRequest::new(primary_model, messages, temperature).max_tokens(max_tokens);
    model.complete(request).await
}

use crate::config::Credentials;
use crate::error::AIError;
use crate::message::{ChatMessage, Role};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
};
use async_trait::async_trait;

// Per-token prices of the primary model.
pub const PROMPT_TOKEN_RATE: f64 = 0.000005;
pub const COMPLETION_TOKEN_RATE: f64 = 0.000015;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            max_tokens: None,
            json_output: false,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    pub fn cost(&self) -> f64 {
        self.prompt_tokens as f64 * PROMPT_TOKEN_RATE
            + self.completion_tokens as f64 * COMPLETION_TOKEN_RATE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Usage,
}

/// A chat-completion backend. The turn pipeline only talks to the model through this trait.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AIError>;
}

/// OpenAI-compatible endpoint reached through `async-openai`.
#[derive(Debug, Clone)]
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
}

impl OpenAIChatModel {
    pub fn new(credentials: &Credentials) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(credentials.api_key.clone())
            .with_api_base(credentials.base_url.clone());
        Self {
            client: Client::with_config(openai_config),
        }
    }
}

fn to_openai_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, AIError> {
    let content = message.content.clone();
    let converted: ChatCompletionRequestMessage = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(converted)
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[allow(deprecated)]
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AIError> {
        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(request.model.as_str())
            .messages(messages)
            .temperature(request.temperature);
        if let Some(max_tokens) = request.max_tokens {
            args.max_tokens(max_tokens);
        }
        if request.json_output {
            args.response_format(ResponseFormat::JsonObject);
        }

        log::debug!(
            "Chat completion: model={}, messages={}",
            request.model,
            request.messages.len()
        );
        let response = self.client.chat().create(args.build()?).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AIError::NoMessageFound)?;
        let usage = response
            .usage
            .map(|usage| Usage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            })
            .unwrap_or_default();

        Ok(Completion { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_uses_fixed_rates() {
        let usage = Usage::new(500, 200);
        assert_eq!(usage.total_tokens, 700);
        assert!((usage.cost() - 0.0055).abs() < 1e-12);
    }
}

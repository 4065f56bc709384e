use thiserror::Error;

// Enum for handling various application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("AI error: {0}")]
    AI(#[from] AIError), // Errors related to language-model calls.

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError), // Missing or invalid startup configuration.

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to data serialization.

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error), // Input/output errors.

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("There is no conversation to save")]
    NothingToSave,

    #[error("A reply is already being generated")]
    TurnInProgress,

    #[error("Logger error: {0}")]
    Logger(String),
}

// Errors related to language-model operations.
#[derive(Debug, Error)]
pub enum AIError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("No message found")]
    NoMessageFound, // The model answered without any content.

    #[error("Malformed decision: {0}")]
    MalformedDecision(String),
}

impl From<serde_json::Error> for AIError {
    fn from(err: serde_json::Error) -> AIError {
        AIError::MalformedDecision(err.to_string())
    }
}

// Errors raised by a single search provider call. They never leave the retrieval step.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {0} from search provider")]
    Status(u16),

    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),
}

impl From<log::SetLoggerError> for AppError {
    fn from(err: log::SetLoggerError) -> Self {
        AppError::Logger(err.to_string())
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

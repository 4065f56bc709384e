pub mod ai;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod message;
pub mod persona;
pub mod prompt;
pub mod save;
pub mod search;
pub mod session;
pub mod settings;
pub mod tui;
pub mod turn;
pub mod ui;

// Re-export commonly used items for easier access
pub use ai::{ChatModel, Completion, CompletionRequest, OpenAIChatModel, Usage};
pub use error::{AIError, AppError, ConfigError, SearchError};
pub use message::{ChatMessage, Role};
pub use persona::{PERSONAS, Persona};
pub use search::{SearchResult, SearchStrategy, WebRetriever};
pub use session::{SearchRecord, SessionState};
pub use turn::{PipelineConfig, TurnPipeline, TurnRequest, TurnResult, TurnStage};

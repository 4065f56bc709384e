// /app.rs
use crate::{
    context::{Context, Notice, TurnStatus},
    error::AppError,
    save::TranscriptManager,
    session::SessionState,
    settings::Settings,
    tui::{Tui, TuiEvent},
    turn::{TurnPipeline, TurnRequest, TurnResult, TurnStage},
    ui::{ChatView, Component, ComponentEnum, PersonaMenu, spinner::Spinner},
};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub enum Action {
    Quit,
    SwitchComponent(ComponentEnum),
    StartChat(&'static str),
    LoadTranscript(PathBuf),
    SendMessage(String),
    ToggleSearch,
    ResetConversation,
    SaveTranscript,
    TurnStage(TurnStage),
    TurnFinished {
        user_message: String,
        result: Box<TurnResult>,
    },
}

pub struct App {
    running: bool,
    component: ComponentEnum,
    settings: Settings,
    session: SessionState,
    transcripts: TranscriptManager,
    pipeline: TurnPipeline,
    turn: TurnStatus,
    notice: Option<Notice>,
    spinner: Spinner,
    action_sender: UnboundedSender<Action>,
    action_receiver: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(settings: Settings, pipeline: TurnPipeline) -> Self {
        let (action_sender, action_receiver) = mpsc::unbounded_channel();
        Self {
            running: true,
            component: ComponentEnum::from(PersonaMenu::default()),
            session: SessionState::new(settings.search_enabled),
            transcripts: TranscriptManager::new(&settings.transcript_dir),
            settings,
            pipeline,
            turn: TurnStatus::default(),
            notice: None,
            spinner: Spinner::new(),
            action_sender,
            action_receiver,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(10.0) // spinner speed
            .frame_rate(30.0);

        tui.enter()?;
        log::info!(
            "persona_chat started with {} transcripts on disk",
            self.transcripts.available_transcripts.len()
        );

        while self.running {
            tui.draw(|frame| {
                let context = Context {
                    session: &mut self.session,
                    transcripts: &mut self.transcripts,
                    settings: &self.settings,
                    turn: &self.turn,
                    notice: self.notice.as_ref(),
                    spinner: &self.spinner,
                };
                self.component
                    .render(frame.area(), frame.buffer_mut(), &context)
            })?;

            if let Some(event) = tui.next().await {
                self.handle_tui_event(event);
            } else {
                break;
            }

            // Background turns report back through the action channel.
            while let Ok(action) = self.action_receiver.try_recv() {
                self.handle_action(action);
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key_event) => self.on_key(key_event),
            TuiEvent::Paste(text) => self.component.on_paste(&text),
            TuiEvent::Tick => self.spinner.tick(),
            TuiEvent::Error => log::warn!("Terminal event stream reported an error"),
            TuiEvent::Init | TuiEvent::Render | TuiEvent::Resize(_, _) => {}
        }
    }

    fn on_key(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.running = false;
            return;
        }

        let action = self.component.on_key(
            key_event,
            &mut Context {
                session: &mut self.session,
                transcripts: &mut self.transcripts,
                settings: &self.settings,
                turn: &self.turn,
                notice: self.notice.as_ref(),
                spinner: &self.spinner,
            },
        );
        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SwitchComponent(component) => {
                self.notice = None;
                self.component = component;
            }
            Action::StartChat(id) => self.start_chat(id),
            Action::LoadTranscript(path) => self.load_transcript(path),
            Action::SendMessage(message) => self.send_message(message),
            Action::ToggleSearch => {
                let enabled = self.session.toggle_search();
                log::info!("Web search {}", if enabled { "enabled" } else { "disabled" });
                self.notice = Some(Notice::info(if enabled {
                    "Web search enabled"
                } else {
                    "Web search disabled"
                }));
            }
            Action::ResetConversation => {
                if self.turn.in_progress() {
                    self.notice = Some(Notice::error(AppError::TurnInProgress.to_string()));
                    return;
                }
                self.session.reset();
                self.notice = Some(Notice::info("Conversation cleared"));
            }
            Action::SaveTranscript => self.save_transcript(),
            Action::TurnStage(stage) => {
                // Late stage reports from a finished turn are dropped.
                if self.turn.in_progress() {
                    self.turn.stage = Some(stage);
                }
            }
            Action::TurnFinished {
                user_message,
                result,
            } => self.finish_turn(&user_message, &result),
        }
    }

    fn start_chat(&mut self, id: &str) {
        // Returning to the persona of the running turn is fine; anything else
        // would hand its reply to another conversation.
        let current = self.session.persona().map(|persona| persona.id);
        if self.turn.in_progress() && current != Some(id) {
            self.notice = Some(Notice::error(AppError::TurnInProgress.to_string()));
            return;
        }
        match self.session.select_persona(id) {
            Ok(persona) => {
                log::info!("Chatting with {}", persona.name);
                self.notice = None;
                self.component = ComponentEnum::from(ChatView::new());
            }
            Err(e) => {
                log::error!("{e}");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    fn load_transcript(&mut self, path: PathBuf) {
        if self.turn.in_progress() {
            self.notice = Some(Notice::error(AppError::TurnInProgress.to_string()));
            return;
        }
        let restored = TranscriptManager::load(&path).and_then(|transcript| {
            self.session
                .restore(&transcript.character, transcript.messages)
        });
        match restored {
            Ok(persona) => {
                log::info!("Loaded transcript {}", path.display());
                self.notice = Some(Notice::info(format!(
                    "Resumed conversation with {}",
                    persona.name
                )));
                self.component = ComponentEnum::from(ChatView::new());
            }
            Err(e) => {
                log::error!("Failed to load transcript {}: {e}", path.display());
                self.notice = Some(Notice::error(format!("Failed to load transcript: {e}")));
            }
        }
    }

    fn save_transcript(&mut self) {
        let Some(persona) = self.session.persona() else {
            return;
        };
        match self.transcripts.save(persona.id, &self.session.messages) {
            Ok(path) => {
                self.notice = Some(Notice::info(format!("Saved to {}", path.display())));
            }
            Err(e) => {
                log::error!("Failed to save transcript: {e}");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    fn send_message(&mut self, message: String) {
        let Some(persona) = self.session.persona() else {
            return;
        };
        if self.turn.in_progress() {
            self.notice = Some(Notice::error(AppError::TurnInProgress.to_string()));
            return;
        }

        let request = TurnRequest {
            persona,
            history: self.session.messages.clone(),
            user_message: message.clone(),
            search_enabled: self.session.search_enabled,
        };
        self.turn.start(message.clone());
        self.notice = None;
        self.spinner.start();

        let pipeline = self.pipeline.clone();
        let sender = self.action_sender.clone();
        tokio::spawn(async move {
            let stage_sender = sender.clone();
            let observer = move |stage: TurnStage| {
                let _ = stage_sender.send(Action::TurnStage(stage));
            };
            let result = pipeline.run_turn(request, &observer).await;
            let _ = sender.send(Action::TurnFinished {
                user_message: message,
                result: Box::new(result),
            });
        });
    }

    fn finish_turn(&mut self, user_message: &str, result: &TurnResult) {
        self.turn.finish();
        self.spinner.stop();

        if self.session.apply_turn(user_message, result) {
            let mut notice = format!("{} tokens (${:.6})", result.tokens_used, result.cost);
            if result.search_performed {
                notice.push_str(&format!(" | search: \"{}\"", result.search_query));
            }
            self.notice = Some(Notice::info(notice));
        } else {
            let error = result
                .error
                .clone()
                .unwrap_or_else(|| "No reply was generated".to_string());
            self.notice = Some(Notice::error(error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ai::{ChatModel, Completion, CompletionRequest},
        error::AIError,
        message::ChatMessage,
        search::WebRetriever,
        turn::PipelineConfig,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Silent;

    #[async_trait]
    impl ChatModel for Silent {
        async fn complete(&self, _request: CompletionRequest) -> Result<Completion, AIError> {
            Err(AIError::NoMessageFound)
        }
    }

    fn app(transcript_dir: &std::path::Path) -> App {
        let settings = Settings {
            transcript_dir: transcript_dir.to_path_buf(),
            ..Settings::default()
        };
        let pipeline = TurnPipeline::new(
            Arc::new(Silent),
            WebRetriever::new(Vec::new()),
            PipelineConfig::default(),
        );
        App::new(settings, pipeline)
    }

    fn reply(text: &str) -> Action {
        Action::TurnFinished {
            user_message: "Tell me about the Reichenbach Falls scene".to_string(),
            result: Box::new(TurnResult {
                reply: Some(text.to_string()),
                tokens_used: 700,
                cost: 0.0055,
                ..TurnResult::default()
            }),
        }
    }

    #[test]
    fn persona_switch_waits_for_running_turn() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());

        app.handle_action(Action::StartChat("sherlock"));
        app.turn
            .start("Tell me about the Reichenbach Falls scene".to_string());
        app.handle_action(Action::StartChat("tony_stark"));

        assert_eq!(app.session.persona().map(|p| p.id), Some("sherlock"));
        assert_eq!(
            app.notice,
            Some(Notice::error(AppError::TurnInProgress.to_string()))
        );

        // Going back to the same chat is allowed.
        app.handle_action(Action::StartChat("sherlock"));
        assert_eq!(app.session.persona().map(|p| p.id), Some("sherlock"));

        app.handle_action(reply("Elementary, my dear Watson."));
        assert_eq!(app.session.messages.len(), 2);
        assert_eq!(
            app.session.messages[1],
            ChatMessage::assistant("Elementary, my dear Watson.")
        );

        // Idle again, so switching clears the history.
        app.handle_action(Action::StartChat("tony_stark"));
        assert_eq!(app.session.persona().map(|p| p.id), Some("tony_stark"));
        assert!(app.session.messages.is_empty());
        assert_eq!(app.session.total_tokens, 700);
    }

    #[test]
    fn transcript_load_waits_for_running_turn() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        let mut transcripts = TranscriptManager::new(tmp.path());
        let path = transcripts
            .save("harry", &[ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")])
            .unwrap();

        app.handle_action(Action::StartChat("sherlock"));
        app.turn.start("Who is Moriarty?".to_string());
        app.handle_action(Action::LoadTranscript(path.clone()));

        assert_eq!(app.session.persona().map(|p| p.id), Some("sherlock"));
        assert!(app.session.messages.is_empty());

        app.handle_action(reply("The Napoleon of crime."));
        app.handle_action(Action::LoadTranscript(path));
        assert_eq!(app.session.persona().map(|p| p.id), Some("harry"));
        assert_eq!(app.session.messages.len(), 2);
        assert_eq!(app.session.messages[1].content, "Hello!");
    }
}

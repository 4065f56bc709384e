use crate::{
    save::TranscriptManager, session::SessionState, settings::Settings, turn::TurnStage,
    ui::spinner::Spinner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-line message shown in the console area of the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// State of the turn running in the background, if any.
#[derive(Debug, Clone, Default)]
pub struct TurnStatus {
    pub pending_message: Option<String>,
    pub stage: Option<TurnStage>,
}

impl TurnStatus {
    pub fn in_progress(&self) -> bool {
        self.pending_message.is_some()
    }

    pub fn start(&mut self, message: String) {
        self.pending_message = Some(message);
        self.stage = None;
    }

    pub fn finish(&mut self) {
        self.pending_message = None;
        self.stage = None;
    }
}

#[derive(Debug)]
pub struct Context<'a> {
    pub session: &'a mut SessionState,
    pub transcripts: &'a mut TranscriptManager,
    pub settings: &'a Settings,
    pub turn: &'a TurnStatus,
    pub notice: Option<&'a Notice>,
    pub spinner: &'a Spinner,
}

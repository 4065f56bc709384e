use crate::turn::TurnStage;

const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

#[derive(Debug, Default)]
pub struct Spinner {
    current_frame: usize,
    is_spinning: bool,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.is_spinning = true;
    }

    pub fn stop(&mut self) {
        self.is_spinning = false;
    }

    pub fn is_spinning(&self) -> bool {
        self.is_spinning
    }

    pub fn tick(&mut self) {
        if self.is_spinning {
            self.current_frame = (self.current_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn get_frame(&self) -> char {
        SPINNER_CHARS[self.current_frame]
    }
}

pub fn spinner_frame(spinner: &Spinner, persona_name: &str, stage: Option<TurnStage>) -> String {
    match stage {
        Some(TurnStage::Synthesizing) | None => {
            format!(" {persona_name} is thinking {} ", spinner.get_frame())
        }
        Some(stage) => format!(" {}... {} ", stage.label(), spinner.get_frame()),
    }
}

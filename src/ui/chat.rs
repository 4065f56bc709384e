// ui/chat.rs

use super::{
    Component, ComponentEnum, PersonaMenu,
    constants::{
        CHAT_HINTS, QUESTION_PREVIEW_CHARS, RECENT_SEARCHES, SOURCES_SHOWN, SUMMARY_PREVIEW_CHARS,
    },
    draw::{render_hints, render_notice, render_too_small, too_small, truncate_chars},
    spinner::spinner_frame,
};
use crate::{
    app::Action,
    context::Context,
    message::Role,
    persona::Persona,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};
use tui_textarea::TextArea;

const SCROLL_STEP: usize = 5;

#[derive(Debug)]
pub struct ChatView {
    textarea: TextArea<'static>,
    // Lines scrolled up from the bottom of the log.
    scroll_offset: usize,
    max_scroll: usize,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("Say something...");
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Message "),
        );
        Self {
            textarea,
            scroll_offset: 0,
            max_scroll: 0,
        }
    }

    fn take_input(&mut self) -> String {
        let text = self.textarea.lines().join("\n");
        self.textarea.select_all();
        self.textarea.cut();
        text
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = (self.scroll_offset + SCROLL_STEP).min(self.max_scroll);
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(SCROLL_STEP);
    }
}

impl Component for ChatView {
    fn on_key(&mut self, key: KeyEvent, context: &mut Context) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('t') if ctrl => Some(Action::ToggleSearch),
            KeyCode::Char('r') if ctrl => Some(Action::ResetConversation),
            KeyCode::Char('s') if ctrl => Some(Action::SaveTranscript),
            KeyCode::PageUp => {
                self.scroll_up();
                None
            }
            KeyCode::PageDown => {
                self.scroll_down();
                None
            }
            KeyCode::Esc => Some(Action::SwitchComponent(ComponentEnum::from(
                PersonaMenu::selecting(context.session.persona().map(|p| p.id)),
            ))),
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
            {
                self.textarea.insert_newline();
                None
            }
            KeyCode::Enter => {
                // One turn at a time.
                if context.turn.in_progress() {
                    return None;
                }
                if self.textarea.lines().iter().all(|line| line.trim().is_empty()) {
                    return None;
                }
                let text = self.take_input();
                self.scroll_offset = 0;
                Some(Action::SendMessage(text.trim().to_string()))
            }
            _ => {
                self.textarea.input(key);
                None
            }
        }
    }

    fn on_paste(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if too_small(area) {
            render_too_small(buffer, area);
            return;
        }
        let Some(persona) = context.session.persona() else {
            return;
        };

        let [main, sidebar] =
            Layout::horizontal([Constraint::Min(50), Constraint::Length(36)]).areas(area);
        let [log_area, status, input, notice, hints] = Layout::vertical([
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(main);

        self.render_log(buffer, log_area, persona, context);

        if context.turn.in_progress() {
            Paragraph::new(spinner_frame(context.spinner, persona.name, context.turn.stage))
                .style(Style::default().fg(Color::Yellow))
                .render(status, buffer);
        }

        Widget::render(&self.textarea, input, buffer);
        render_notice(buffer, notice, context.notice);
        render_hints(buffer, hints, CHAT_HINTS);

        render_sidebar(buffer, sidebar, persona, context);
    }
}

impl ChatView {
    fn render_log(&mut self, buffer: &mut Buffer, area: Rect, persona: &Persona, context: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Green))
            .title(format!(" {} {} ", persona.emoji, persona.name));
        let inner = block.inner(area);
        block.render(area, buffer);

        let width = inner.width.saturating_sub(2).max(1) as usize;
        let mut lines = Vec::new();

        if context.session.messages.is_empty() && context.turn.pending_message.is_none() {
            lines.push(
                Line::from(format!("{} {} is ready to talk.", persona.avatar, persona.name))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray)),
            );
        }

        for message in &context.session.messages {
            let (speaker, style, alignment) = match message.role {
                Role::User => ("You", Style::default().fg(Color::Cyan), Alignment::Right),
                Role::Assistant => (persona.name, Style::default().fg(Color::Green), Alignment::Left),
                Role::System => continue,
            };
            push_message(&mut lines, speaker, &message.content, style, alignment, width);
        }

        // Shown dimmed until the turn commits it to history.
        if let Some(pending) = &context.turn.pending_message {
            push_message(
                &mut lines,
                "You",
                pending,
                Style::default().fg(Color::DarkGray),
                Alignment::Right,
                width,
            );
        }

        let height = inner.height as usize;
        self.max_scroll = lines.len().saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        let start = self.max_scroll - self.scroll_offset;

        let visible: Vec<Line> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible).render(inner, buffer);
    }
}

fn push_message(
    lines: &mut Vec<Line<'static>>,
    speaker: &str,
    content: &str,
    style: Style,
    alignment: Alignment,
    width: usize,
) {
    lines.push(
        Line::from(Span::styled(
            speaker.to_string(),
            style.add_modifier(Modifier::BOLD),
        ))
        .alignment(alignment),
    );
    for paragraph in content.lines() {
        if paragraph.is_empty() {
            lines.push(Line::default());
            continue;
        }
        for wrapped in textwrap::wrap(paragraph, width) {
            lines.push(Line::styled(wrapped.into_owned(), style).alignment(alignment));
        }
    }
    lines.push(Line::default());
}

fn render_sidebar(buffer: &mut Buffer, area: Rect, persona: &Persona, context: &Context) {
    let [profile, stats, searches] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(5),
    ])
    .areas(area);

    let rounded = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
    };
    let label = Style::default().fg(Color::DarkGray);

    let search_status = if context.session.search_enabled {
        Span::styled("on", Style::default().fg(Color::Green))
    } else {
        Span::styled("off", Style::default().fg(Color::Red))
    };
    Paragraph::new(vec![
        Line::from(format!("{} {}", persona.emoji, persona.name)).style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(persona.source).style(label),
        Line::from(vec![Span::styled("Web search: ", label), search_status]),
        Line::from(vec![
            Span::styled("Model: ", label),
            Span::raw(context.settings.primary_model.clone()),
        ]),
    ])
    .block(rounded(" Persona "))
    .wrap(Wrap { trim: true })
    .render(profile, buffer);

    let session = &*context.session;
    Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Messages: ", label),
            Span::raw(session.messages.len().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Tokens:   ", label),
            Span::raw(session.total_tokens.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Cost:     ", label),
            Span::raw(format!("${:.6}", session.total_cost)),
        ]),
        Line::from(vec![
            Span::styled("Searches: ", label),
            Span::raw(session.search_count().to_string()),
        ]),
    ])
    .block(rounded(" Session "))
    .render(stats, buffer);

    let width = searches.width.saturating_sub(4).max(1) as usize;
    let mut lines = Vec::new();
    for record in session.recent_searches(RECENT_SEARCHES) {
        lines.push(Line::styled(
            format!("🔍 {}", record.query),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            format!("Q: {}", truncate_chars(&record.user_question, QUESTION_PREVIEW_CHARS)),
            label,
        ));
        for wrapped in textwrap::wrap(&truncate_chars(&record.summary, SUMMARY_PREVIEW_CHARS), width) {
            lines.push(Line::raw(wrapped.into_owned()));
        }
        for result in record.results.iter().take(SOURCES_SHOWN) {
            let title = if result.title.is_empty() {
                result.url.as_str()
            } else {
                result.title.as_str()
            };
            lines.push(Line::styled(
                format!(" - {}", truncate_chars(title, width.saturating_sub(3))),
                Style::default().fg(Color::Blue),
            ));
        }
        lines.push(Line::default());
    }
    if lines.is_empty() {
        lines.push(Line::styled("No searches yet.", label));
    }

    Paragraph::new(lines)
        .block(rounded(" Recent searches "))
        .render(searches, buffer);
}

// ui/load_menu.rs

use std::path::PathBuf;

use super::{
    Component, ComponentEnum, PersonaMenu,
    constants::LOAD_MENU_HINTS,
    draw::{center_rect, render_header, render_hints, render_notice, render_too_small, too_small},
    widgets::StatefulList,
};
use crate::{app::Action, context::Context, save::transcript_label};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::*,
};

#[derive(Debug)]
pub struct LoadMenu {
    transcripts: StatefulList<PathBuf>,
}

impl LoadMenu {
    pub fn new(context: &Context) -> Self {
        Self {
            transcripts: StatefulList::with_items(context.transcripts.available_transcripts.clone()),
        }
    }
}

impl Component for LoadMenu {
    fn on_key(&mut self, key: KeyEvent, context: &mut Context) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.transcripts.previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.transcripts.next();
                None
            }
            KeyCode::Enter => self
                .transcripts
                .selected()
                .map(|path| Action::LoadTranscript(path.clone())),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::SwitchComponent(
                ComponentEnum::from(PersonaMenu::selecting(
                    context.session.persona().map(|p| p.id),
                )),
            )),
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if too_small(area) {
            render_too_small(buffer, area);
            return;
        }

        let [header, notice, body, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        render_header(buffer, header);
        render_notice(buffer, notice, context.notice);
        render_hints(buffer, hints, LOAD_MENU_HINTS);

        let list_area = center_rect(body, Constraint::Percentage(60), Constraint::Percentage(90));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Transcripts in {} ", context.transcripts.dir().display()));

        if self.transcripts.items.is_empty() {
            Paragraph::new("No saved transcripts found.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block)
                .render(list_area, buffer);
            return;
        }

        let items: Vec<ListItem> = self
            .transcripts
            .items
            .iter()
            .map(|path| ListItem::new(transcript_label(path)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        StatefulWidget::render(list, list_area, buffer, &mut self.transcripts.state);
    }
}

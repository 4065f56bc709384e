// ui/persona_menu.rs

use super::{
    Component, ComponentEnum, LoadMenu,
    constants::PERSONA_MENU_HINTS,
    draw::{render_header, render_hints, render_notice, render_title, render_too_small, too_small},
    widgets::StatefulList,
};
use crate::{
    app::Action,
    context::Context,
    persona::{PERSONAS, Persona},
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};

#[derive(Debug)]
pub struct PersonaMenu {
    list: StatefulList<&'static Persona>,
}

impl Default for PersonaMenu {
    fn default() -> Self {
        Self {
            list: StatefulList::with_items(PERSONAS.iter().collect()),
        }
    }
}

impl PersonaMenu {
    /// Opens the menu with `id` highlighted, if it exists.
    pub fn selecting(id: Option<&str>) -> Self {
        let mut menu = Self::default();
        if let Some(index) = id.and_then(|id| PERSONAS.iter().position(|p| p.id == id)) {
            menu.list.state.select(Some(index));
        }
        menu
    }
}

impl Component for PersonaMenu {
    fn on_key(&mut self, key: KeyEvent, context: &mut Context) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.next();
                None
            }
            KeyCode::Enter | KeyCode::Right => {
                self.list.selected().map(|persona| Action::StartChat(persona.id))
            }
            KeyCode::Char('l') => {
                context.transcripts.refresh();
                Some(Action::SwitchComponent(ComponentEnum::from(LoadMenu::new(
                    context,
                ))))
            }
            KeyCode::Char('t') => Some(Action::ToggleSearch),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char(c) => c
                .to_digit(10)
                .and_then(|digit| self.list.select_digit(digit))
                .map(|persona| Action::StartChat(persona.id)),
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if too_small(area) {
            render_too_small(buffer, area);
            return;
        }

        let [header, title, notice, body, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(if area.height > 30 { 7 } else { 0 }),
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(area);

        render_header(buffer, header);
        if title.height > 0 {
            render_title(buffer, title);
        }
        render_notice(buffer, notice, context.notice);

        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
                .areas(body);
        self.render_list(buffer, list_area, context);
        self.render_details(buffer, detail_area);

        render_hints(buffer, hints, PERSONA_MENU_HINTS);
    }
}

impl PersonaMenu {
    fn render_list(&mut self, buffer: &mut Buffer, area: Rect, context: &Context) {
        let items: Vec<ListItem> = self
            .list
            .items
            .iter()
            .enumerate()
            .map(|(i, persona)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("{} {}", persona.emoji, persona.name)),
                ]))
            })
            .collect();

        let search_status = if context.session.search_enabled {
            Span::styled(" search on ", Style::default().fg(Color::Green))
        } else {
            Span::styled(" search off ", Style::default().fg(Color::DarkGray))
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Personas ")
                    .title_bottom(Line::from(search_status).right_aligned()),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        StatefulWidget::render(list, area, buffer, &mut self.list.state);
    }

    fn render_details(&self, buffer: &mut Buffer, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Details ");

        let Some(persona) = self.list.selected() else {
            block.render(area, buffer);
            return;
        };

        let label = |text: &'static str| {
            Span::styled(
                text,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        };

        let mut lines = vec![
            Line::from(vec![label("Source: "), Span::raw(persona.source)]),
            Line::default(),
            Line::from(label("Background")),
        ];
        lines.extend(persona.background.lines().map(Line::from));
        lines.push(Line::default());
        lines.push(Line::from(label("Personality")));
        lines.extend(persona.personality.lines().map(Line::from));
        lines.push(Line::default());
        lines.push(Line::from(label("Speaking style")));
        lines.extend(persona.speaking_style.lines().map(Line::from));

        Paragraph::new(lines)
            .block(block.title(format!(" {} {} ", persona.emoji, persona.name)))
            .wrap(Wrap { trim: true })
            .render(area, buffer);
    }
}

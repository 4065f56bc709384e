// ui/draw.rs

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::*,
};

use super::constants::TITLE;
use crate::context::{Notice, NoticeKind};

pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

pub fn center_rect(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

pub fn too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

pub fn render_too_small(buffer: &mut Buffer, area: Rect) {
    Paragraph::new("Terminal too small. Please resize.")
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

pub fn render_header(buffer: &mut Buffer, area: Rect) {
    Paragraph::new(format!("Persona Chat v{}", env!("CARGO_PKG_VERSION")))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

pub fn render_title(buffer: &mut Buffer, area: Rect) {
    let title_area = center_rect(area, Constraint::Length(64), Constraint::Length(6));
    Paragraph::new(TITLE)
        .alignment(Alignment::Left)
        .style(Style::default().fg(Color::Magenta))
        .render(title_area, buffer);
}

pub fn render_notice(buffer: &mut Buffer, area: Rect, notice: Option<&Notice>) {
    if let Some(notice) = notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Yellow,
            NoticeKind::Error => Color::Red,
        };
        Paragraph::new(notice.text.as_str())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buffer);
    }
}

pub fn render_hints(buffer: &mut Buffer, area: Rect, hints: &str) {
    Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max).collect();
        truncated.push_str("...");
        truncated
    }
}

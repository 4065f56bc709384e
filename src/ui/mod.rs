// ui/mod.rs

mod chat;
pub mod constants;
pub mod draw;
mod load_menu;
mod persona_menu;
pub mod spinner;
pub mod widgets;

pub use chat::ChatView;
pub use load_menu::LoadMenu;
pub use persona_menu::PersonaMenu;

use crossterm::event::KeyEvent;
use enum_dispatch::enum_dispatch;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::{app::Action, context::Context};

#[enum_dispatch]
pub trait Component {
    fn on_key(&mut self, key: KeyEvent, context: &mut Context) -> Option<Action>;
    fn on_paste(&mut self, _text: &str) {}
    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context);
}

#[enum_dispatch(Component)]
pub enum ComponentEnum {
    PersonaMenu,
    ChatView,
    LoadMenu,
}

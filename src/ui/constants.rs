// ui/constants.rs

pub const TITLE: &str = r#" ____                                    ____ _           _
|  _ \ ___ _ __ ___  ___  _ __   __ _   / ___| |__   __ _| |_
| |_) / _ \ '__/ __|/ _ \| '_ \ / _` | | |   | '_ \ / _` | __|
|  __/  __/ |  \__ \ (_) | | | | (_| | | |___| | | | (_| | |_
|_|   \___|_|  |___/\___/|_| |_|\__,_|  \____|_| |_|\__,_|\__|
"#;

pub const PERSONA_MENU_HINTS: &str =
    "Select with ↑↓ or jk or a digit. Enter to chat, l to load a transcript, t to toggle search, q to quit.";
pub const CHAT_HINTS: &str = "Enter send | Esc personas | Ctrl+T search | Ctrl+R reset | Ctrl+S save | PgUp/PgDn scroll";
pub const LOAD_MENU_HINTS: &str = "Select with ↑↓ or jk. Enter to load, Esc to go back.";

pub const RECENT_SEARCHES: usize = 5;
pub const SOURCES_SHOWN: usize = 3;
pub const SUMMARY_PREVIEW_CHARS: usize = 150;
pub const QUESTION_PREVIEW_CHARS: usize = 40;

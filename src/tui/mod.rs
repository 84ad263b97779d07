//! Terminal UI components using ratatui

pub mod clipboard;
mod terminal;
mod ui;

pub use terminal::Tui;
pub use ui::render;

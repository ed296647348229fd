pub mod detail;
pub mod listing;

use crate::tui::{keys::KeyMap, styles::Theme, Frame};
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

/// What a page asks the application to do after handling a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    None,
    Quit,
    OpenUser(i64),
    OpenRandom,
    Back,
}

/// Base trait for all pages
pub trait Page {
    /// Get the page title
    fn title(&self) -> String;

    /// Handle keyboard input
    fn handle_key_event(&mut self, event: KeyEvent, keys: &KeyMap) -> PageAction;

    /// Render the page
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Whether the page is capturing raw text input
    fn is_capturing_input(&self) -> bool {
        false
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout utilities for TUI components
pub mod layout {
    use super::*;

    /// Create a centered rectangle with given width and height
    pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);

        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((area.height - height) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length((area.width - width) / 2),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(popup_layout[1])[1]
    }

    /// Create a centered rectangle with percentage of the parent area
    pub fn centered_rect_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
        let scale = |length: u16, percent: u16| (u32::from(length) * u32::from(percent.min(100)) / 100) as u16;
        let width = scale(area.width, percent_x);
        let height = scale(area.height, percent_y);
        centered_rect(width, height, area)
    }

}

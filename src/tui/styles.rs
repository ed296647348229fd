use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,

    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    pub background: Color,
    pub background_alt: Color,

    pub border: Color,

    pub warning: Color,
    pub error: Color,
    pub info: Color,

    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(147, 51, 234),    // Purple
            accent: Color::Rgb(59, 130, 246),     // Blue

            text: Color::Rgb(248, 250, 252),      // Slate-50
            text_dim: Color::Rgb(100, 116, 139),  // Slate-500
            text_bright: Color::Rgb(255, 255, 255),

            background: Color::Rgb(15, 23, 42),   // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800

            border: Color::Rgb(71, 85, 105),      // Slate-600

            warning: Color::Rgb(245, 158, 11),    // Amber-500
            error: Color::Rgb(239, 68, 68),       // Red-500
            info: Color::Rgb(59, 130, 246),       // Blue-500

            selection: Color::Rgb(30, 58, 138),   // Blue-900
        }
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Table header row
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Field labels in the detail view
    pub fn label_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text_bright)
            .add_modifier(Modifier::BOLD)
    }

    /// Enabled paging control
    pub fn control_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Disabled paging control
    pub fn disabled_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .add_modifier(Modifier::DIM)
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background_alt)
    }

    /// Background activity such as a look-ahead fetch
    pub fn activity_style(&self) -> Style {
        Style::default()
            .fg(self.info)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn notice_style(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Style for help text and popups
    pub fn help_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background)
    }

    /// Style for placeholder text
    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .add_modifier(Modifier::ITALIC)
    }
}

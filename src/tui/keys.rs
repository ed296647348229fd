use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, description: &str) -> Self {
        Self {
            key,
            modifiers,
            description: description.to_string(),
        }
    }

    pub fn plain(key: KeyCode, description: &str) -> Self {
        Self::new(key, KeyModifiers::NONE, description)
    }

    /// Shift is implied by the character itself, so it is ignored for chars
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers - KeyModifiers::SHIFT,
            _ => event.modifiers,
        };
        self.key == event.code && self.modifiers == modifiers
    }

    /// Short label for the help overlay
    pub fn label(&self) -> String {
        let key = match self.key {
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Char(c) => c.to_string(),
            other => format!("{:?}", other),
        };

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key.to_uppercase())
        } else {
            key
        }
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub quit: KeyBinding,
    pub force_quit: KeyBinding,
    pub help: KeyBinding,

    pub previous_page: KeyBinding,
    pub next_page: KeyBinding,
    pub first_page: KeyBinding,
    pub last_page: KeyBinding,
    pub jump_back: KeyBinding,
    pub jump_forward: KeyBinding,

    pub select_up: KeyBinding,
    pub select_down: KeyBinding,
    pub open: KeyBinding,

    pub reload: KeyBinding,
    pub random: KeyBinding,
    pub dismiss: KeyBinding,
    pub back: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::plain(KeyCode::Char('q'), "Quit"),
            force_quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Quit immediately"),
            help: KeyBinding::plain(KeyCode::Char('?'), "Show/hide help"),

            previous_page: KeyBinding::plain(KeyCode::Left, "Previous page"),
            next_page: KeyBinding::plain(KeyCode::Right, "Next page"),
            first_page: KeyBinding::plain(KeyCode::Home, "First page"),
            last_page: KeyBinding::plain(KeyCode::End, "Last known page"),
            jump_back: KeyBinding::plain(KeyCode::PageUp, "Jump back one window"),
            jump_forward: KeyBinding::plain(KeyCode::PageDown, "Jump forward one window"),

            select_up: KeyBinding::plain(KeyCode::Up, "Select previous user"),
            select_down: KeyBinding::plain(KeyCode::Down, "Select next user"),
            open: KeyBinding::plain(KeyCode::Enter, "Open selected user"),

            reload: KeyBinding::plain(KeyCode::Char('r'), "Reload users"),
            random: KeyBinding::plain(KeyCode::Char('R'), "Random user"),
            dismiss: KeyBinding::plain(KeyCode::Char('x'), "Dismiss notice"),
            back: KeyBinding::plain(KeyCode::Esc, "Back to the listing"),
        }
    }
}

impl KeyMap {
    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.force_quit.matches(event)
    }

    /// Check if the event should show help
    pub fn should_show_help(&self, event: &KeyEvent) -> bool {
        self.help.matches(event)
    }

    fn bindings(&self) -> [&KeyBinding; 16] {
        [
            &self.previous_page,
            &self.next_page,
            &self.first_page,
            &self.last_page,
            &self.jump_back,
            &self.jump_forward,
            &self.select_up,
            &self.select_down,
            &self.open,
            &self.reload,
            &self.random,
            &self.dismiss,
            &self.back,
            &self.help,
            &self.quit,
            &self.force_quit,
        ]
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        self.bindings()
            .iter()
            .map(|binding| format!("{:<8} {}", binding.label(), binding.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_shifted_chars_match() {
        let keys = KeyMap::default();
        assert!(keys.random.matches(&key(KeyCode::Char('R'), KeyModifiers::SHIFT)));
        assert!(keys.random.matches(&key(KeyCode::Char('R'), KeyModifiers::NONE)));
        assert!(!keys.reload.matches(&key(KeyCode::Char('R'), KeyModifiers::SHIFT)));
        assert!(keys.help.matches(&key(KeyCode::Char('?'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_modifiers_must_match() {
        let keys = KeyMap::default();
        assert!(keys.should_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!keys.should_quit(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!keys.next_page.matches(&key(KeyCode::Right, KeyModifiers::ALT)));
    }

    #[test]
    fn test_help_text_lists_every_binding() {
        let help = KeyMap::default().help_text();
        assert_eq!(help.lines().count(), 16);
        assert!(help.contains("PgDn     Jump forward one window"));
        assert!(help.contains("Ctrl+C   Quit immediately"));
    }
}

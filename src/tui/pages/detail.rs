use super::{Page, PageAction};
use crate::app::ListingLocation;
use crate::client::User;
use crate::paging::{PagingError, PagingResult};
use crate::tui::{keys::KeyMap, styles::Theme, Frame};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Which user the page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTarget {
    User(i64),
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Box<User>),
    Missing(String),
    Failed(String),
}

/// One user, opened from the listing
pub struct DetailPage {
    target: DetailTarget,

    /// Lookup this page is waiting for; older responses are ignored
    request: u64,
    state: DetailState,
    back_to: ListingLocation,
}

impl DetailPage {
    pub fn new(target: DetailTarget, request: u64, back_to: ListingLocation) -> Self {
        Self {
            target,
            request,
            state: DetailState::Loading,
            back_to,
        }
    }

    pub fn target(&self) -> DetailTarget {
        self.target
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn back_to(&self) -> ListingLocation {
        self.back_to
    }

    /// Apply a lookup result; returns false when it belongs to another request
    pub fn apply(&mut self, request: u64, result: PagingResult<User>) -> bool {
        if request != self.request {
            return false;
        }

        self.state = match result {
            Ok(user) => DetailState::Loaded(Box::new(user)),
            Err(PagingError::RecordNotFound(what)) => DetailState::Missing(what),
            Err(err) => DetailState::Failed(err.to_string()),
        };
        true
    }

    fn body(&self, theme: &Theme) -> Vec<Line<'static>> {
        match &self.state {
            DetailState::Loading => vec![Line::styled("Loading…", theme.placeholder_style())],
            DetailState::Missing(what) => vec![Line::styled(
                format!("Not found: {}", what),
                theme.warning_style(),
            )],
            DetailState::Failed(error) => vec![Line::styled(
                format!("Failed to load user: {}", error),
                theme.notice_style(),
            )],
            DetailState::Loaded(user) => user
                .display_fields()
                .into_iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{:<12}", format!("{}:", label)), theme.label_style()),
                        Span::styled(value, theme.text_style()),
                    ])
                })
                .collect(),
        }
    }

    fn footer(&self) -> String {
        let back = format!("Esc: back to page {}", self.back_to.page);
        match self.target {
            DetailTarget::Random => format!("{}   R: another random user", back),
            DetailTarget::User(_) => back,
        }
    }
}

impl Page for DetailPage {
    fn title(&self) -> String {
        match (&self.state, self.target) {
            (DetailState::Loaded(user), _) => user.full_name(),
            (_, DetailTarget::User(id)) => format!("User {}", id),
            (_, DetailTarget::Random) => "Random user".to_string(),
        }
    }

    fn handle_key_event(&mut self, event: KeyEvent, keys: &KeyMap) -> PageAction {
        if keys.back.matches(&event) {
            PageAction::Back
        } else if keys.quit.matches(&event) {
            PageAction::Quit
        } else if keys.random.matches(&event) && self.target == DetailTarget::Random {
            PageAction::OpenRandom
        } else {
            PageAction::None
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(format!(" {} ", self.title()));

        let body = Paragraph::new(self.body(theme))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(body, chunks[0]);

        frame.render_widget(
            Paragraph::new(self.footer()).style(theme.label_style()),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::tui::pages::testing::user;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(page: &mut DetailPage, code: KeyCode) -> PageAction {
        page.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), &KeyMap::default())
    }

    #[test]
    fn test_apply_ignores_stale_requests() {
        let mut page = DetailPage::new(DetailTarget::User(5), 2, ListingLocation::new(3));

        assert!(!page.apply(1, Ok(user(9))));
        assert_eq!(page.state(), &DetailState::Loading);

        assert!(page.apply(2, Ok(user(5))));
        assert_eq!(page.title(), "First5 Last5");
    }

    #[test]
    fn test_apply_maps_errors() {
        let mut page = DetailPage::new(DetailTarget::User(404), 1, ListingLocation::new(1));
        page.apply(1, Err(PagingError::RecordNotFound("user 404".to_string())));
        assert_eq!(page.state(), &DetailState::Missing("user 404".to_string()));

        let mut page = DetailPage::new(DetailTarget::Random, 1, ListingLocation::new(1));
        page.apply(
            1,
            Err(PagingError::LookupFailed(ClientError::ConfigError("bad url".to_string()))),
        );
        assert!(matches!(page.state(), DetailState::Failed(_)));
        assert_eq!(page.title(), "Random user");
    }

    #[test]
    fn test_keys() {
        let mut page = DetailPage::new(DetailTarget::User(5), 1, ListingLocation::new(7));
        assert_eq!(press(&mut page, KeyCode::Char('R')), PageAction::None);
        assert_eq!(press(&mut page, KeyCode::Esc), PageAction::Back);
        assert_eq!(page.back_to().page, 7);
        assert_eq!(page.footer(), "Esc: back to page 7");

        let mut page = DetailPage::new(DetailTarget::Random, 1, ListingLocation::new(2));
        assert_eq!(press(&mut page, KeyCode::Char('R')), PageAction::OpenRandom);
        assert_eq!(press(&mut page, KeyCode::Char('q')), PageAction::Quit);
    }

    #[test]
    fn test_loaded_body_lists_fields() {
        let mut page = DetailPage::new(DetailTarget::User(5), 1, ListingLocation::new(1));
        page.apply(1, Ok(user(5)));

        let lines: Vec<String> = page
            .body(&Theme::default())
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(lines.contains(&"Email:      user5@example.com".to_string()));
        assert!(lines.contains(&"Address:    Lisbon, Portugal".to_string()));
    }
}

use super::{Page, PageAction};
use crate::app::{Listing, ListingView};
use crate::client::User;
use crate::paging::{ControlBar, ControlKind, MAX_BULK_LOAD};
use crate::tui::{keys::KeyMap, styles::Theme, utils::layout::centered_rect, Frame};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
};

/// Longest count the reload prompt accepts as input
const PROMPT_DIGITS: usize = 4;

/// Paged user table with the paging bar and reload prompt
pub struct ListingPage {
    listing: Listing<User>,
    selected: usize,
    selected_on: usize,

    /// Reload prompt input, when open
    prompt: Option<String>,
}

impl ListingPage {
    pub fn new(listing: Listing<User>) -> Self {
        let page = listing.page();
        Self {
            listing,
            selected: 0,
            selected_on: page,
            prompt: None,
        }
    }

    pub fn listing(&self) -> &Listing<User> {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut Listing<User> {
        &mut self.listing
    }

    /// The selection goes back to the top whenever the page changes
    fn sync_selection(&mut self) {
        if self.selected_on != self.listing.page() {
            self.selected_on = self.listing.page();
            self.selected = 0;
        }
    }

    fn selection(&mut self, rows: usize) -> usize {
        self.sync_selection();
        self.selected = self.selected.min(rows.saturating_sub(1));
        self.selected
    }

    fn handle_prompt_key(&mut self, event: KeyEvent) {
        let Some(input) = self.prompt.as_mut() else {
            return;
        };

        match event.code {
            KeyCode::Char(c) if c.is_ascii_digit() && input.len() < PROMPT_DIGITS => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => self.submit_prompt(),
            _ => {}
        }
    }

    fn submit_prompt(&mut self) {
        let Some(input) = self.prompt.take() else {
            return;
        };

        match input.parse::<u32>() {
            Ok(count) if count > 0 => self.listing.request_reload(count),
            _ => self
                .listing
                .show_notice(format!("Enter a number of users between 1 and {}", MAX_BULK_LOAD)),
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, view: &ListingView<User>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(format!(" Users · {} ", view.location));

        if view.rows.is_empty() {
            let (text, style) = if view.is_loading() {
                ("Loading users…", theme.placeholder_style())
            } else {
                ("No users on this page", theme.warning_style())
            };
            frame.render_widget(Paragraph::new(text).style(style).block(block), area);
            return;
        }

        let header = Row::new(["ID", "Gender", "First name", "Last name", "Email", "Phone", "Location"])
            .style(theme.header_style());

        let rows = view.rows.iter().map(|user| {
            Row::new([
                user.id.to_string(),
                user.gender.clone(),
                user.first_name.clone(),
                user.last_name.clone(),
                user.email.clone(),
                user.phone.clone().unwrap_or_default(),
                user.location(),
            ])
            .style(theme.text_style())
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Percentage(30),
            Constraint::Length(16),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .highlight_style(theme.selection_style())
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(Some(self.selection(view.rows.len())));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, theme: &Theme, view: &ListingView<User>) {
        let mut spans = vec![Span::styled(
            format!("{} users buffered", view.buffered),
            theme.text_style(),
        )];

        if view.reloading {
            spans.push(Span::styled("  · reloading…", theme.activity_style()));
        } else if view.fetching {
            spans.push(Span::styled("  · loading more…", theme.activity_style()));
        } else if !view.has_more {
            spans.push(Span::styled("  · all users loaded", theme.label_style()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(input) = &self.prompt else {
            return;
        };

        let popup = centered_rect(44, 3, area);
        let text = format!("Users to generate (1-{}): {}_", MAX_BULK_LOAD, input);
        let paragraph = Paragraph::new(text).style(theme.help_style()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Reload · Enter to submit, Esc to cancel "),
        );

        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

/// Paging bar: `««  «  3 4 [5] 6 7  »  »»  of 25+`
pub fn pager_spans(bar: &ControlBar, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(bar.controls.len() + 1);

    for control in &bar.controls {
        let style = if control.disabled {
            theme.disabled_style()
        } else if control.active {
            theme.selection_style()
        } else {
            theme.control_style()
        };

        let label = match control.kind {
            ControlKind::Page(_) if control.active => format!("[{}]", control.label()),
            _ => control.label(),
        };
        spans.push(Span::styled(format!(" {} ", label), style));
    }

    let more = if bar.max_page_is_final { "" } else { "+" };
    spans.push(Span::styled(format!("  of {}{}", bar.max_page, more), theme.label_style()));
    spans
}

impl Page for ListingPage {
    fn title(&self) -> String {
        format!("Users · page {}", self.listing.page())
    }

    fn handle_key_event(&mut self, event: KeyEvent, keys: &KeyMap) -> PageAction {
        if self.prompt.is_some() {
            self.handle_prompt_key(event);
            return PageAction::None;
        }

        if keys.quit.matches(&event) {
            return PageAction::Quit;
        }

        self.sync_selection();

        if keys.previous_page.matches(&event) {
            self.listing.previous_page();
        } else if keys.next_page.matches(&event) {
            self.listing.next_page();
        } else if keys.first_page.matches(&event) {
            self.listing.activate(ControlKind::First);
        } else if keys.last_page.matches(&event) {
            self.listing.activate(ControlKind::Last);
        } else if keys.jump_back.matches(&event) {
            self.listing.activate(ControlKind::JumpBack);
        } else if keys.jump_forward.matches(&event) {
            self.listing.activate(ControlKind::JumpForward);
        } else if keys.select_up.matches(&event) {
            self.selected = self.selected.saturating_sub(1);
        } else if keys.select_down.matches(&event) {
            self.selected += 1;
        } else if keys.open.matches(&event) {
            let view = self.listing.view();
            let index = self.selection(view.rows.len());
            if let Some(user) = view.rows.get(index) {
                return PageAction::OpenUser(user.id);
            }
        } else if keys.reload.matches(&event) {
            if !self.listing.is_reloading() {
                self.prompt = Some(String::new());
            }
        } else if keys.random.matches(&event) {
            return PageAction::OpenRandom;
        } else if keys.dismiss.matches(&event) {
            self.listing.dismiss_notice();
        }

        PageAction::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let view = self.listing.view();
        let notice_height = if view.notice.is_some() { 1 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(notice_height),
            ])
            .split(area);

        self.render_table(frame, chunks[0], theme, &view);
        frame.render_widget(Paragraph::new(Line::from(pager_spans(&view.controls, theme))), chunks[1]);
        self.render_status(frame, chunks[2], theme, &view);

        if let Some(notice) = &view.notice {
            let text = format!("{}  (x to dismiss)", notice);
            frame.render_widget(Paragraph::new(text).style(theme.notice_style()), chunks[3]);
        }

        self.render_prompt(frame, area, theme);
    }

    fn is_capturing_input(&self) -> bool {
        self.prompt.is_some()
    }
}

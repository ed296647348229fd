use crate::app::Listing;
use crate::client::User;
use crate::paging::FetchCoordinator;
use crate::tui::{
    events::Event,
    keys::KeyMap,
    pages::{
        detail::{DetailPage, DetailTarget},
        listing::ListingPage,
        Page, PageAction,
    },
    styles::Theme,
    utils::layout::centered_rect_percent,
    Frame,
};
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Current theme for styling
    pub theme: Theme,

    /// Show the help overlay
    pub show_help: bool,

    listing_page: ListingPage,

    /// Open user detail, shown instead of the listing
    detail: Option<DetailPage>,

    coordinator: Arc<FetchCoordinator<User>>,

    /// Event sender for lookup results
    event_sender: mpsc::UnboundedSender<Event>,

    next_request: u64,
}

impl App {
    /// Create a new application instance
    pub fn new(
        listing: Listing<User>,
        coordinator: Arc<FetchCoordinator<User>>,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            should_quit: false,
            key_map: KeyMap::default(),
            theme: Theme::default(),
            show_help: false,
            listing_page: ListingPage::new(listing),
            detail: None,
            coordinator,
            event_sender,
            next_request: 0,
        }
    }

    /// Start the listing's fetch loop
    pub fn mount(&self) {
        self.listing_page.listing().mount();
    }

    fn current_page_mut(&mut self) -> &mut dyn Page {
        match self.detail.as_mut() {
            Some(detail) => detail as &mut dyn Page,
            None => &mut self.listing_page,
        }
    }

    /// Handle incoming events; returns true when the application should exit
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if self.key_map.should_quit(&key_event) {
                    self.should_quit = true;
                    return Ok(true);
                }

                let capturing = self.current_page_mut().is_capturing_input();
                if !capturing && self.key_map.should_show_help(&key_event) {
                    self.show_help = !self.show_help;
                    return Ok(false);
                }

                if self.show_help && !capturing {
                    // Any other key closes the overlay.
                    self.show_help = false;
                    return Ok(false);
                }

                let keys = self.key_map.clone();
                let action = self.current_page_mut().handle_key_event(key_event, &keys);
                self.apply_action(action);
            }

            Event::Listing(listing_event) => {
                self.listing_page.listing_mut().handle_event(listing_event);
            }

            Event::UserLoaded { request, result } => {
                if let Some(detail) = self.detail.as_mut() {
                    if !detail.apply(request, result) {
                        debug!("Dropping stale lookup result {}", request);
                    }
                }
            }

            Event::Resize(_, _) | Event::Tick => {}
        }

        Ok(self.should_quit)
    }

    fn apply_action(&mut self, action: PageAction) {
        match action {
            PageAction::None => {}
            PageAction::Quit => self.should_quit = true,
            PageAction::OpenUser(id) => self.open_detail(DetailTarget::User(id)),
            PageAction::OpenRandom => self.open_detail(DetailTarget::Random),
            PageAction::Back => {
                if let Some(detail) = self.detail.take() {
                    debug!("Back to the listing at {}", detail.back_to());
                }
            }
        }
    }

    /// Show a detail page and start its lookup
    fn open_detail(&mut self, target: DetailTarget) {
        self.next_request += 1;
        let request = self.next_request;
        let back_to = self.listing_page.listing().location();
        self.detail = Some(DetailPage::new(target, request, back_to));

        let coordinator = Arc::clone(&self.coordinator);
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let result = match target {
                DetailTarget::User(id) => coordinator.lookup(id).await,
                DetailTarget::Random => coordinator.random().await,
            };
            let _ = sender.send(Event::UserLoaded { request, result });
        });
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        let theme = self.theme.clone();
        self.current_page_mut().render(frame, chunks[0], &theme);

        self.render_status_bar(frame, chunks[1]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    /// Render the status bar
    fn render_status_bar(&mut self, frame: &mut Frame, area: Rect) {
        let title = self.current_page_mut().title();
        let status_text = format!(
            " userdeck · {} · {} | ? for help | q to quit",
            title,
            self.listing_page.listing().location()
        );

        let status_paragraph = Paragraph::new(status_text).style(self.theme.status_bar_style());
        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_area = centered_rect_percent(60, 70, frame.size());

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(self.theme.help_style());

        let help_paragraph = Paragraph::new(self.key_map.help_text())
            .block(help_block)
            .style(self.theme.text_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }
}

use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::app::ListingEvent;
use crate::client::User;
use crate::paging::PagingResult;

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Listing state change from the fetch loop
    Listing(ListingEvent),

    /// A single-user or random-user lookup finished
    UserLoaded {
        request: u64,
        result: PagingResult<User>,
    },
}

/// Event handler merging terminal input, listing events and internal events
pub struct EventHandler {
    /// Internal event receiver
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Internal event sender
    sender: mpsc::UnboundedSender<Event>,

    /// Listing events produced by spawned fetches
    listing: mpsc::UnboundedReceiver<ListingEvent>,

    /// How long to wait for terminal input before ticking
    tick_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(listing: mpsc::UnboundedReceiver<ListingEvent>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            listing,
            tick_interval: Duration::from_millis(100),
        }
    }

    /// Get the next event; internal and listing events go first
    pub async fn next(&mut self) -> Event {
        if let Ok(event) = self.receiver.try_recv() {
            return event;
        }

        if let Ok(event) = self.listing.try_recv() {
            return Event::Listing(event);
        }

        let tick = self.tick_interval;
        let polled = tokio::task::spawn_blocking(move || -> std::io::Result<Option<CrosstermEvent>> {
            if crossterm::event::poll(tick)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await;

        match polled {
            Ok(Ok(Some(event))) => Self::convert_crossterm_event(event).unwrap_or(Event::Tick),
            _ => Event::Tick,
        }
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                Some(Event::Key(key_event))
            }
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_events_come_before_terminal_input() {
        let (listing_tx, listing_rx) = mpsc::unbounded_channel();
        let mut handler = EventHandler::new(listing_rx);

        handler.sender().send(Event::Resize(80, 24)).unwrap();
        listing_tx.send(ListingEvent::PageChanged { page: 2 }).unwrap();

        assert!(matches!(handler.next().await, Event::Resize(80, 24)));
        assert!(matches!(
            handler.next().await,
            Event::Listing(ListingEvent::PageChanged { page: 2 })
        ));
    }

    #[test]
    fn test_key_release_is_ignored() {
        use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(EventHandler::convert_crossterm_event(CrosstermEvent::Key(release)).is_none());

        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(
            EventHandler::convert_crossterm_event(CrosstermEvent::Key(press)),
            Some(Event::Key(_))
        ));
    }
}

//! The user listing: current page, paging controls and fetch triggers.
//!
//! The listing never fetches inline. Every state change (mount, page change,
//! buffer growth, reload completion) is delivered as a [`ListingEvent`] and
//! handled by re-running the coverage check. At most one check is spawned at a
//! time and it always reports back, so its completion is the next trigger.
//! A failed fetch does not re-trigger, so an outage cannot spin.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{ListingEvent, ListingLocation};
use crate::paging::{
    ControlBar, ControlKind, CoverageOutcome, FetchCoordinator, FetchPlan, PageProjector, Record,
    RecordBuffer,
};

/// Everything needed to render one frame of the listing
#[derive(Debug, Clone)]
pub struct ListingView<R> {
    /// Records on the current page; empty while the page is still loading
    pub rows: Vec<R>,
    pub location: ListingLocation,
    pub controls: ControlBar,
    pub buffered: usize,
    pub has_more: bool,
    pub fetching: bool,
    pub reloading: bool,
    pub notice: Option<String>,
}

impl<R> ListingView<R> {
    pub fn page(&self) -> usize {
        self.location.page
    }

    /// The page has no rows yet but more may arrive
    pub fn is_loading(&self) -> bool {
        self.rows.is_empty() && (self.has_more || self.fetching || self.reloading)
    }
}

/// Paged view over the shared record buffer
pub struct Listing<R: Record + 'static> {
    coordinator: Arc<FetchCoordinator<R>>,
    projector: PageProjector,
    page: usize,
    notice: Option<String>,

    /// Buffer shown while a reload runs, so the old page stays on screen
    /// until the new buffer and page 1 can be shown together
    pinned: Option<Arc<RecordBuffer<R>>>,

    /// A spawned coverage check has not reported back yet
    checking: bool,

    events: mpsc::UnboundedSender<ListingEvent>,
}

impl<R: Record + 'static> Listing<R> {
    pub fn new(
        coordinator: Arc<FetchCoordinator<R>>,
        location: ListingLocation,
        events: mpsc::UnboundedSender<ListingEvent>,
    ) -> Self {
        let settings = coordinator.settings();
        let projector = PageProjector::new(settings.page_size, settings.window_size);

        Self {
            coordinator,
            projector,
            page: location.page,
            notice: None,
            pinned: None,
            checking: false,
            events,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn location(&self) -> ListingLocation {
        ListingLocation::new(self.page)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_reloading(&self) -> bool {
        self.pinned.is_some()
    }

    /// Start the listing; the initial page is honoured as given
    pub fn mount(&self) {
        debug!("Mounting listing at {}", self.location());
        self.emit(ListingEvent::PageChanged { page: self.page });
    }

    /// React to one event from the loop
    pub fn handle_event(&mut self, event: ListingEvent) {
        debug!("Listing event: {:?}", event);

        match &event {
            ListingEvent::BufferAppended { .. }
            | ListingEvent::CoverageSettled
            | ListingEvent::FetchDeferred => {
                self.checking = false;
            }
            ListingEvent::FetchFailed { error } => {
                self.checking = false;
                warn!("Fetch failed: {}", error);
                self.notice = Some(error.clone());
            }
            ListingEvent::ReloadCompleted { buffered, .. } => {
                info!("Reload finished, showing page 1 of {} buffered users", buffered);
                // New buffer and page 1 become visible in the same step.
                self.pinned = None;
                self.page = 1;
                self.notice = None;
            }
            ListingEvent::ReloadFailed { error } => {
                warn!("Reload failed: {}", error);
                let replaced = self
                    .pinned
                    .take()
                    .is_some_and(|old| old.generation() != self.coordinator.snapshot().generation());
                if replaced {
                    // The source was regenerated, so the old page no longer exists.
                    self.page = 1;
                }
                self.notice = Some(format!("Reload failed: {}", error));
            }
            ListingEvent::PageChanged { .. } => {}
        }

        if event.triggers_coverage() {
            self.evaluate();
        }
    }

    /// Move to `page`, clamped to the known range
    pub fn go_to(&mut self, page: usize) {
        if self.is_reloading() {
            return;
        }

        let page = page.clamp(1, self.controls().max_page);
        if page != self.page {
            self.page = page;
            self.emit(ListingEvent::PageChanged { page });
        }
    }

    /// Activate a paging control; disabled or absent controls do nothing
    pub fn activate(&mut self, kind: ControlKind) {
        if let Some(target) = self.controls().activate(kind) {
            self.go_to(target);
        }
    }

    pub fn next_page(&mut self) {
        self.go_to(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Clear the notice and give coverage another chance
    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.evaluate();
        }
    }

    /// Regenerate `count` users at the source and restart from page 1
    pub fn request_reload(&mut self, count: u32) {
        if self.is_reloading() {
            debug!("Reload already running, ignoring request");
            return;
        }

        info!("Reload of {} users requested from {}", count, self.location());
        self.pinned = Some(self.coordinator.snapshot());
        self.notice = None;

        let coordinator = Arc::clone(&self.coordinator);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match coordinator.reload(count).await {
                Ok(outcome) => ListingEvent::ReloadCompleted {
                    buffered: outcome.buffered,
                    has_more: outcome.has_more,
                },
                Err(err) => ListingEvent::ReloadFailed {
                    error: err.to_string(),
                },
            };
            let _ = events.send(event);
        });
    }

    /// Snapshot of what should be on screen
    pub fn view(&self) -> ListingView<R> {
        let buffer = self.visible_buffer();
        let controls = self.controls_for(&buffer);

        ListingView {
            rows: self.projector.visible_slice(&buffer, self.page).to_vec(),
            location: self.location(),
            controls,
            buffered: buffer.len(),
            has_more: buffer.has_more(),
            fetching: self.checking || self.coordinator.is_fetching(),
            reloading: self.is_reloading(),
            notice: self.notice.clone(),
        }
    }

    fn visible_buffer(&self) -> Arc<RecordBuffer<R>> {
        match &self.pinned {
            Some(buffer) => Arc::clone(buffer),
            None => self.coordinator.snapshot(),
        }
    }

    fn controls(&self) -> ControlBar {
        self.controls_for(&self.visible_buffer())
    }

    fn controls_for(&self, buffer: &RecordBuffer<R>) -> ControlBar {
        self.projector.controls(
            self.page,
            buffer.len(),
            buffer.has_more(),
            buffer.estimated_total_pages(),
        )
    }

    /// Spawn a coverage check if the current page or its look-ahead is short
    fn evaluate(&mut self) {
        if self.is_reloading() {
            return;
        }

        match self.coordinator.plan(self.page) {
            FetchPlan::Fetch(urgency) => {
                if self.checking {
                    debug!("Fetch in flight, {:?} trigger for page {} deferred", urgency, self.page);
                    return;
                }
            }
            FetchPlan::Satisfied | FetchPlan::Exhausted => return,
        }

        self.checking = true;
        let coordinator = Arc::clone(&self.coordinator);
        let events = self.events.clone();
        let page = self.page;
        tokio::spawn(async move {
            let event = match coordinator.ensure_coverage(page).await {
                Ok(CoverageOutcome::Fetched {
                    buffered, has_more, ..
                }) => ListingEvent::BufferAppended { buffered, has_more },
                Ok(CoverageOutcome::Busy) => ListingEvent::FetchDeferred,
                Ok(CoverageOutcome::Satisfied | CoverageOutcome::Exhausted) => {
                    ListingEvent::CoverageSettled
                }
                Err(err) => ListingEvent::FetchFailed {
                    error: err.to_string(),
                },
            };
            let _ = events.send(event);
        });
    }

    fn emit(&self, event: ListingEvent) {
        if self.events.send(event).is_err() {
            debug!("Listing event loop closed");
        }
    }
}

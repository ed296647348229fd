//! Core application logic and orchestration
//!
//! This module wires the HTTP source, the shared user cache and the fetch
//! coordinator together, and owns the listing event channel.

mod events;
mod listing;
mod location;

pub use events::*;
pub use listing::{Listing, ListingView};
pub use location::ListingLocation;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::{
    client::{HttpUserSource, RemoteSource, User},
    config::Config,
    paging::{user_cache, BufferStore, FetchCoordinator, PagingSettings},
};

/// Main application structure
pub struct App {
    coordinator: Arc<FetchCoordinator<User>>,
    event_tx: mpsc::UnboundedSender<ListingEvent>,
    event_rx: RwLock<Option<mpsc::UnboundedReceiver<ListingEvent>>>,
}

impl App {
    /// Create a new application instance backed by the user directory API
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let source = HttpUserSource::from_config(&config)?;
        debug!("Using user directory at {}", source.base_url());

        Ok(Self::with_parts(
            PagingSettings::from(&config),
            Arc::new(source),
            user_cache(),
        ))
    }

    /// Assemble an application from an explicit source and store
    pub fn with_parts(
        settings: PagingSettings,
        source: Arc<dyn RemoteSource<User>>,
        store: Arc<dyn BufferStore<User>>,
    ) -> Self {
        let coordinator = Arc::new(FetchCoordinator::new(source, store, settings));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            coordinator,
            event_tx,
            event_rx: RwLock::new(Some(event_rx)),
        }
    }

    pub fn coordinator(&self) -> &Arc<FetchCoordinator<User>> {
        &self.coordinator
    }

    /// Take the listing event receiver; only one loop may own it
    pub async fn take_event_receiver(&self) -> Result<mpsc::UnboundedReceiver<ListingEvent>> {
        self.event_rx
            .write()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("Event loop already started"))
    }

    /// Create a listing positioned at `location`
    pub fn listing(&self, location: ListingLocation) -> Listing<User> {
        Listing::new(Arc::clone(&self.coordinator), location, self.event_tx.clone())
    }
}

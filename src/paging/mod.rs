//! Incremental pagination buffer.
//!
//! Records are pulled from a remote source in batches larger than a page,
//! appended to a flat buffer, and sliced into fixed-size pages on demand.
//! The coordinator decides when to pull more; the projector turns the
//! buffer into a visible page and a set of paging controls.

pub mod buffer;
pub mod cache;
pub mod coordinator;
pub mod errors;
pub mod projector;

pub use buffer::{FetchBatch, RecordBuffer};
pub use cache::{user_cache, BufferStore, MemoryStore};
pub use coordinator::{CoverageOutcome, FetchCoordinator, FetchPlan, FetchUrgency, ReloadOutcome};
pub use errors::{PagingError, PagingResult};
pub use projector::{ControlBar, ControlKind, PageControl, PageProjector};

use std::fmt::Debug;

use crate::config::Config;

/// Upper bound accepted by the directory's bulk-load endpoint
pub const MAX_BULK_LOAD: u32 = 5000;

/// Base trait for records held in the buffer
pub trait Record: Debug + Clone + Send + Sync {
    /// Stable unique identifier
    fn id(&self) -> String;
}

/// Sizes that drive the fetch decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingSettings {
    /// Records shown per page
    pub page_size: usize,

    /// Records requested per network call
    pub fetch_batch_size: usize,

    /// Records to keep buffered beyond the current page
    pub buffer_ahead: usize,

    /// Numbered page buttons shown in the control bar
    pub window_size: usize,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            fetch_batch_size: 50,
            buffer_ahead: 200,
            window_size: 5,
        }
    }
}

impl From<&Config> for PagingSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            fetch_batch_size: config.fetch_batch_size,
            buffer_ahead: config.buffer_ahead,
            window_size: config.window_size,
        }
    }
}

/// `ceil(items / page_size)`, with a zero page size treated as one
pub(crate) fn pages_for(items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    (items + page_size - 1) / page_size
}

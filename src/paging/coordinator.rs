//! Fetch coordination for the record buffer.
//!
//! The coordinator owns the single fetch slot. Every trigger (page change,
//! buffer growth, mount) calls [`FetchCoordinator::ensure_coverage`]; if a
//! fetch is already running the trigger is dropped, and the completion of the
//! running fetch is expected to trigger a fresh evaluation.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{
    BufferStore, FetchBatch, PagingError, PagingResult, PagingSettings, Record, RecordBuffer,
    MAX_BULK_LOAD,
};
use crate::client::RemoteSource;

/// Why a fetch is being issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchUrgency {
    /// The current page is not fully buffered yet
    Blocking,
    /// The current page is covered but the look-ahead is running low
    LookAhead,
}

/// Outcome of evaluating the fetch rule against a buffer snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    Fetch(FetchUrgency),
    Satisfied,
    Exhausted,
}

impl FetchPlan {
    /// Decide whether `page` needs more records
    pub fn evaluate<R: Record>(
        buffer: &RecordBuffer<R>,
        page: usize,
        settings: &PagingSettings,
    ) -> Self {
        if !buffer.has_more() {
            return FetchPlan::Exhausted;
        }

        let required = page.max(1).saturating_mul(settings.page_size);
        let buffered = buffer.len();

        if buffered < required {
            FetchPlan::Fetch(FetchUrgency::Blocking)
        } else if buffered - required < settings.buffer_ahead {
            FetchPlan::Fetch(FetchUrgency::LookAhead)
        } else {
            FetchPlan::Satisfied
        }
    }
}

/// Result of a coverage check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageOutcome {
    /// Another fetch holds the slot; this trigger was dropped
    Busy,
    /// Current page and look-ahead are covered
    Satisfied,
    /// The source has no more records
    Exhausted,
    /// A batch was fetched and merged
    Fetched {
        urgency: FetchUrgency,
        appended: usize,
        buffered: usize,
        has_more: bool,
    },
}

/// Result of a forced reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub buffered: usize,
    pub has_more: bool,
}

/// Decides when to pull records and merges them into the shared buffer
pub struct FetchCoordinator<R: Record> {
    source: Arc<dyn RemoteSource<R>>,
    store: Arc<dyn BufferStore<R>>,
    settings: PagingSettings,

    /// Single fetch slot; held for the whole fetch-and-append transition
    slot: Mutex<()>,
}

impl<R: Record + 'static> FetchCoordinator<R> {
    pub fn new(
        source: Arc<dyn RemoteSource<R>>,
        store: Arc<dyn BufferStore<R>>,
        settings: PagingSettings,
    ) -> Self {
        Self {
            source,
            store,
            settings,
            slot: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &PagingSettings {
        &self.settings
    }

    /// Current buffer contents
    pub fn snapshot(&self) -> Arc<RecordBuffer<R>> {
        self.store.read()
    }

    /// Whether a fetch or reload currently holds the slot
    pub fn is_fetching(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    /// Evaluate the fetch rule for `page` without fetching
    pub fn plan(&self, page: usize) -> FetchPlan {
        FetchPlan::evaluate(&self.store.read(), page, &self.settings)
    }

    /// Fetch one batch if `page` or its look-ahead is not covered.
    ///
    /// At most one fetch runs at a time; a call made while another is in
    /// flight returns [`CoverageOutcome::Busy`] without queueing.
    pub async fn ensure_coverage(&self, page: usize) -> PagingResult<CoverageOutcome> {
        match self.plan(page) {
            FetchPlan::Satisfied => return Ok(CoverageOutcome::Satisfied),
            FetchPlan::Exhausted => return Ok(CoverageOutcome::Exhausted),
            FetchPlan::Fetch(_) => {}
        }

        let _slot = match self.slot.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Fetch already in flight, dropping trigger for page {}", page);
                return Ok(CoverageOutcome::Busy);
            }
        };

        // Re-check under the slot: a fetch may have landed since the first read.
        let buffer = self.store.read();
        let urgency = match FetchPlan::evaluate(&buffer, page, &self.settings) {
            FetchPlan::Fetch(urgency) => urgency,
            FetchPlan::Satisfied => return Ok(CoverageOutcome::Satisfied),
            FetchPlan::Exhausted => return Ok(CoverageOutcome::Exhausted),
        };

        let offset = buffer.len();
        let generation = buffer.generation();
        let limit = self.settings.fetch_batch_size;
        drop(buffer);

        debug!(
            "Fetching {:?} batch for page {}: offset={}, limit={}",
            urgency, page, offset, limit
        );

        let fetched = self
            .source
            .fetch_page(offset, limit)
            .await
            .map_err(|source| PagingError::FetchFailed { offset, source })?;

        let batch = FetchBatch::new(offset, limit, fetched.records, fetched.total_count, generation);

        // The append position is taken from the buffer as it is now, not as it
        // was when the request went out.
        let mut next = (*self.store.read()).clone();
        let appended = next.append(batch, self.settings.page_size)?;
        let buffered = next.len();
        let has_more = next.has_more();
        self.store.write(next);

        info!(
            "Buffered {} more users ({} total, more available: {})",
            appended, buffered, has_more
        );

        Ok(CoverageOutcome::Fetched {
            urgency,
            appended,
            buffered,
            has_more,
        })
    }

    /// Regenerate `count` records at the source and restart the buffer.
    ///
    /// Waits for any in-flight fetch, then posts the bulk load. The old
    /// buffer is kept if the post fails. On success the store receives a
    /// fresh buffer already holding the first batch, in one write.
    pub async fn reload(&self, count: u32) -> PagingResult<ReloadOutcome> {
        if count == 0 || count > MAX_BULK_LOAD {
            return Err(PagingError::InvalidCount {
                count,
                max: MAX_BULK_LOAD,
            });
        }

        let _slot = self.slot.lock().await;

        info!("Requesting bulk load of {} users", count);
        self.source
            .bulk_load(count)
            .await
            .map_err(PagingError::BulkLoadFailed)?;

        let mut fresh = self.store.read().successor();
        let limit = self.settings.fetch_batch_size;

        match self.source.fetch_page(0, limit).await {
            Ok(fetched) => {
                let batch = FetchBatch::new(
                    0,
                    limit,
                    fetched.records,
                    fetched.total_count,
                    fresh.generation(),
                );
                fresh.append(batch, self.settings.page_size)?;

                let outcome = ReloadOutcome {
                    buffered: fresh.len(),
                    has_more: fresh.has_more(),
                };
                self.store.write(fresh);

                info!("Reload complete with {} users buffered", outcome.buffered);
                Ok(outcome)
            }
            Err(source) => {
                // The old records no longer match the source, so the empty
                // buffer is stored and the next coverage check refetches.
                self.store.write(fresh);
                Err(PagingError::FetchFailed { offset: 0, source })
            }
        }
    }

    /// Look up one record, bypassing the buffer
    pub async fn lookup(&self, id: i64) -> PagingResult<R> {
        self.source.record(id).await.map_err(|err| {
            if err.is_not_found() {
                PagingError::RecordNotFound(format!("user {}", id))
            } else {
                PagingError::LookupFailed(err)
            }
        })
    }

    /// Fetch a random record, bypassing the buffer
    pub async fn random(&self) -> PagingResult<R> {
        self.source.random_record().await.map_err(|err| {
            if err.is_not_found() {
                PagingError::RecordNotFound("random user".to_string())
            } else {
                PagingError::LookupFailed(err)
            }
        })
    }
}

//! Append-only record buffer.
//!
//! The buffer only ever grows between resets. Records are indexed by their
//! offset in the remote listing, so `items.len()` is always the offset of the
//! next batch to request.

use tracing::{debug, warn};

use super::{pages_for, PagingError, PagingResult, Record};

/// Result of one remote listing call, tagged with where it was requested
#[derive(Debug, Clone)]
pub struct FetchBatch<R> {
    /// Offset the batch was requested at
    pub offset: usize,

    /// Number of records requested
    pub limit: usize,

    /// Records returned, in listing order
    pub records: Vec<R>,

    /// Total record count reported by the source, if any
    pub total_count: Option<usize>,

    /// Whether the source has nothing beyond this batch
    pub exhausted: bool,

    /// Buffer generation the batch was requested for
    pub generation: u64,
}

impl<R> FetchBatch<R> {
    pub fn new(
        offset: usize,
        limit: usize,
        records: Vec<R>,
        total_count: Option<usize>,
        generation: u64,
    ) -> Self {
        let short = records.len() < limit;
        let drained = total_count.map_or(false, |total| total <= offset + records.len());

        Self {
            offset,
            limit,
            records,
            total_count,
            exhausted: short || drained,
            generation,
        }
    }
}

/// Growing window of fetched records plus exhaustion state
#[derive(Debug, Clone)]
pub struct RecordBuffer<R> {
    items: Vec<R>,
    has_more: bool,
    estimated_total_pages: usize,
    generation: u64,
}

impl<R: Record> RecordBuffer<R> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            has_more: true,
            estimated_total_pages: 1,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn estimated_total_pages(&self) -> usize {
        self.estimated_total_pages
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Merge a batch at the end of the buffer.
    ///
    /// The batch offset is compared against the current length: records the
    /// buffer already holds are skipped, and a batch that would leave a hole
    /// is rejected without touching the buffer. Batches from an earlier
    /// generation are dropped. Returns the number of records appended.
    pub fn append(&mut self, batch: FetchBatch<R>, page_size: usize) -> PagingResult<usize> {
        if batch.generation != self.generation {
            warn!(
                "Dropping batch for generation {} (buffer is at generation {})",
                batch.generation, self.generation
            );
            return Ok(0);
        }

        let expected = self.items.len();
        if batch.offset > expected {
            return Err(PagingError::OffsetGap {
                expected,
                got: batch.offset,
            });
        }

        let overlap = expected - batch.offset;
        if overlap > 0 {
            debug!("Skipping {} records already buffered", overlap);
        }

        let before = self.items.len();
        self.items.extend(batch.records.into_iter().skip(overlap));
        let appended = self.items.len() - before;

        // Exhaustion is terminal until the next reset.
        self.has_more = self.has_more && !batch.exhausted;

        match batch.total_count {
            Some(total) => {
                self.estimated_total_pages = pages_for(total, page_size).max(1);
            }
            None if batch.exhausted => {
                self.estimated_total_pages = pages_for(self.items.len(), page_size).max(1);
            }
            None => {}
        }

        Ok(appended)
    }

    /// Empty buffer for the next generation
    pub fn successor(&self) -> Self {
        Self {
            items: Vec::new(),
            has_more: true,
            estimated_total_pages: 1,
            generation: self.generation + 1,
        }
    }

    /// Drop every record and re-arm `has_more`
    pub fn reset(&mut self) {
        *self = self.successor();
    }
}

impl<R: Record> Default for RecordBuffer<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::testing::{records, TestRecord};

    fn batch(offset: usize, limit: usize, count: usize, total: Option<usize>) -> FetchBatch<TestRecord> {
        FetchBatch::new(offset, limit, records(offset..offset + count), total, 0)
    }

    #[test]
    fn test_new_buffer_is_empty_and_open() {
        let buffer: RecordBuffer<TestRecord> = RecordBuffer::new();
        assert!(buffer.is_empty());
        assert!(buffer.has_more());
        assert_eq!(buffer.estimated_total_pages(), 1);
    }

    #[test]
    fn test_batch_exhaustion_rules() {
        assert!(!batch(0, 50, 50, None).exhausted);
        assert!(batch(0, 50, 45, None).exhausted);
        assert!(batch(50, 50, 50, Some(100)).exhausted);
        assert!(!batch(0, 50, 50, Some(101)).exhausted);
    }

    #[test]
    fn test_full_batch_keeps_estimate_without_signal() {
        let mut buffer = RecordBuffer::new();
        assert_eq!(buffer.append(batch(0, 50, 50, None), 10).unwrap(), 50);

        assert_eq!(buffer.len(), 50);
        assert!(buffer.has_more());
        assert_eq!(buffer.estimated_total_pages(), 1);
    }

    #[test]
    fn test_short_batch_exhausts_and_estimates_pages() {
        let mut buffer = RecordBuffer::new();
        buffer.append(batch(0, 50, 45, None), 10).unwrap();

        assert_eq!(buffer.len(), 45);
        assert!(!buffer.has_more());
        assert_eq!(buffer.estimated_total_pages(), 5);
    }

    #[test]
    fn test_total_count_drives_estimate() {
        let mut buffer = RecordBuffer::new();
        buffer.append(batch(0, 50, 50, Some(1234)), 10).unwrap();

        assert!(buffer.has_more());
        assert_eq!(buffer.estimated_total_pages(), 124);
    }

    #[test]
    fn test_zero_total_keeps_one_page() {
        let mut buffer = RecordBuffer::new();
        buffer.append(batch(0, 50, 0, Some(0)), 10).unwrap();

        assert!(!buffer.has_more());
        assert_eq!(buffer.estimated_total_pages(), 1);
    }

    #[test]
    fn test_has_more_never_rearms_without_reset() {
        let mut buffer = RecordBuffer::new();
        buffer.append(batch(0, 50, 20, None), 10).unwrap();
        assert!(!buffer.has_more());

        // A later full batch cannot reopen the buffer.
        buffer.append(batch(20, 50, 50, None), 10).unwrap();
        assert!(!buffer.has_more());

        buffer.reset();
        assert!(buffer.has_more());
        assert!(buffer.is_empty());
        assert_eq!(buffer.estimated_total_pages(), 1);
    }

    #[test]
    fn test_overlapping_batch_skips_known_records() {
        let mut buffer = RecordBuffer::new();
        buffer.append(batch(0, 50, 50, None), 10).unwrap();

        let appended = buffer.append(batch(40, 50, 50, None), 10).unwrap();
        assert_eq!(appended, 40);
        assert_eq!(buffer.len(), 90);

        let ids: Vec<usize> = buffer.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..90).collect::<Vec<_>>());
    }

    #[test]
    fn test_gap_is_rejected_without_change() {
        let mut buffer = RecordBuffer::new();
        buffer.append(batch(0, 50, 50, None), 10).unwrap();

        let err = buffer.append(batch(60, 50, 50, None), 10).unwrap_err();
        assert!(matches!(err, PagingError::OffsetGap { expected: 50, got: 60 }));
        assert_eq!(buffer.len(), 50);
        assert!(buffer.has_more());
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut buffer = RecordBuffer::new();
        buffer.reset();

        let appended = buffer.append(batch(0, 50, 50, None), 10).unwrap();
        assert_eq!(appended, 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.generation(), 1);
    }
}

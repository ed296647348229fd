//! Remote source trait used by the paging engine

use async_trait::async_trait;

use super::{errors::ClientResult, types::SourcePage};

/// Trait for the remote record store backing the listing
///
/// Implementations perform exactly one call per method; retries are left to
/// the caller re-triggering the action.
#[async_trait]
pub trait RemoteSource<R>: Send + Sync {
    /// Fetch at most `limit` records starting at `offset`
    async fn fetch_page(&self, offset: usize, limit: usize) -> ClientResult<SourcePage<R>>;

    /// Ask the source to regenerate `count` records
    async fn bulk_load(&self, count: u32) -> ClientResult<()>;

    /// Look up a single record by id
    async fn record(&self, id: i64) -> ClientResult<R>;

    /// Fetch one randomly chosen record
    async fn random_record(&self) -> ClientResult<R>;
}

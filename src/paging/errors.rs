//! Error types for the paging engine

use thiserror::Error;

use crate::client::ClientError;

#[derive(Error, Debug)]
pub enum PagingError {
    #[error("Failed to load users at offset {offset}: {source}")]
    FetchFailed {
        offset: usize,
        #[source]
        source: ClientError,
    },

    #[error("Failed to load new users into the directory: {0}")]
    BulkLoadFailed(#[source] ClientError),

    #[error("Not found: {0}")]
    RecordNotFound(String),

    #[error("Lookup failed: {0}")]
    LookupFailed(#[source] ClientError),

    #[error("Count must be between 1 and {max}, got {count}")]
    InvalidCount { count: u32, max: u32 },

    #[error("Batch at offset {got} does not continue a buffer of {expected} records")]
    OffsetGap { expected: usize, got: usize },
}

pub type PagingResult<T> = Result<T, PagingError>;

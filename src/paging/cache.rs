//! Process-wide buffer store.
//!
//! The listing reads and writes its buffer through [`BufferStore`] so the
//! records survive switching to another view and back. [`user_cache`] is the
//! shared instance for the running process; tests build their own
//! [`MemoryStore`].

use std::sync::{Arc, OnceLock, RwLock};

use super::{Record, RecordBuffer};
use crate::client::User;

/// Storage for the one buffer shared by every listing view
pub trait BufferStore<R: Record>: Send + Sync {
    /// Current buffer, or an empty one if nothing was written yet
    fn read(&self) -> Arc<RecordBuffer<R>>;

    /// Replace the stored buffer
    fn write(&self, buffer: RecordBuffer<R>);
}

/// In-memory [`BufferStore`]
#[derive(Debug)]
pub struct MemoryStore<R> {
    buffer: RwLock<Arc<RecordBuffer<R>>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            buffer: RwLock::new(Arc::new(RecordBuffer::new())),
        }
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> BufferStore<R> for MemoryStore<R> {
    fn read(&self) -> Arc<RecordBuffer<R>> {
        let guard = self.buffer.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    fn write(&self, buffer: RecordBuffer<R>) {
        let mut guard = self.buffer.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(buffer);
    }
}

static USER_CACHE: OnceLock<Arc<MemoryStore<User>>> = OnceLock::new();

/// The user buffer shared across the whole process
pub fn user_cache() -> Arc<MemoryStore<User>> {
    Arc::clone(USER_CACHE.get_or_init(|| Arc::new(MemoryStore::new())))
}

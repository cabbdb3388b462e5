use crate::feed::{CachedFeed, LocalFeedItem, Timestamp};
use crate::store::{DeletionCompletion, FeedStore, InsertionCompletion, RetrievalCompletion};
use std::sync::{Mutex, MutexGuard};

/// Volatile store. Completions run synchronously on the calling thread, after the lock is released,
/// so a completion may issue the next operation on the same store.
#[derive(Default)]
pub struct InMemoryFeedStore {
    cache: Mutex<Option<CachedFeed>>,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        InMemoryFeedStore {
            cache: Mutex::new(None),
        }
    }

    // Nothing runs under the lock but a single assignment or clone, so a poisoned slot is still whole.
    fn cache(&self) -> MutexGuard<'_, Option<CachedFeed>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FeedStore for InMemoryFeedStore {
    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        *self.cache() = None;
        completion(Ok(()));
    }

    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: Timestamp, completion: InsertionCompletion) {
        *self.cache() = Some(CachedFeed::new(feed, timestamp));
        completion(Ok(()));
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        let cached = self.cache().clone();
        completion(Ok(cached));
    }
}

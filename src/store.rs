pub mod file;
pub mod memory;

use crate::error::StoreError;
use crate::feed::{CachedFeed, LocalFeedItem, Timestamp};
use std::sync::Arc;

pub type DeletionResult = Result<(), StoreError>;
pub type InsertionResult = Result<(), StoreError>;
pub type RetrievalResult = Result<Option<CachedFeed>, StoreError>;

pub type DeletionCompletion = Box<dyn FnOnce(DeletionResult) + Send>;
pub type InsertionCompletion = Box<dyn FnOnce(InsertionResult) + Send>;
pub type RetrievalCompletion = Box<dyn FnOnce(RetrievalResult) + Send>;

/// Persistence behind the feed cache. A store holds at most one [`CachedFeed`].
///
/// Completions may be invoked on any thread, including synchronously on the caller's. Callers are
/// responsible for hopping to whatever context they need.
///
/// Operations issued against one store must run one at a time and in the order they were issued,
/// whichever threads issue them. Callers add no locking of their own.
pub trait FeedStore: Send + Sync {
    /// Removes the cached feed. Succeeds when nothing is cached.
    fn delete_cached_feed(&self, completion: DeletionCompletion);

    /// Replaces whatever is cached with `feed`, stamped with the caller-supplied `timestamp`.
    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: Timestamp, completion: InsertionCompletion);

    /// Delivers `Ok(None)` for an empty store. Only a backend failure is an error.
    fn retrieve(&self, completion: RetrievalCompletion);
}

impl<S: FeedStore + ?Sized> FeedStore for Arc<S> {
    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        (**self).delete_cached_feed(completion)
    }

    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: Timestamp, completion: InsertionCompletion) {
        (**self).insert(feed, timestamp, completion)
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        (**self).retrieve(completion)
    }
}

use crate::error::StoreError;
use crate::feed::{LocalFeedItem, Timestamp};
use crate::policy::FeedCachePolicy;
use crate::store::FeedStore;
use chrono::Utc;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

pub type SaveResult = Result<(), StoreError>;
pub type LoadResult = Result<Vec<LocalFeedItem>, StoreError>;

/// Source of "now". Injected so cache expiry never depends on an ambient clock.
pub type CurrentDate = Box<dyn Fn() -> Timestamp + Send + Sync>;

/// Keeps the last good feed in a [`FeedStore`] and serves it back while it is fresh.
///
/// The loader is always handed out behind an [`Arc`]. Callbacks given to the store hold only a
/// [`Weak`] handle, so once every `Arc` is dropped, results that arrive later are discarded
/// instead of being delivered to a caller that no longer exists.
pub struct LocalFeedLoader<S: FeedStore + ?Sized> {
    store: Arc<S>,
    current_date: CurrentDate,
    policy: FeedCachePolicy,
}

impl<S: FeedStore + ?Sized + 'static> LocalFeedLoader<S> {
    pub fn new<F>(store: Arc<S>, current_date: F) -> Arc<Self>
    where
        F: Fn() -> Timestamp + Send + Sync + 'static,
    {
        Self::with_policy(store, current_date, FeedCachePolicy::default())
    }

    pub fn with_policy<F>(store: Arc<S>, current_date: F, policy: FeedCachePolicy) -> Arc<Self>
    where
        F: Fn() -> Timestamp + Send + Sync + 'static,
    {
        Arc::new(Self {
            store,
            current_date: Box::new(current_date),
            policy,
        })
    }

    /// Loader reading the system clock.
    pub fn with_system_clock(store: Arc<S>) -> Arc<Self> {
        Self::new(store, Utc::now)
    }

    pub fn policy(&self) -> FeedCachePolicy {
        self.policy
    }

    /// Replaces the cached feed: deletes whatever is cached, then inserts `feed` stamped with the
    /// current date. The insert is only issued once the delete has succeeded.
    ///
    /// `completion` receives the delete error if deletion failed, otherwise the insert result. If
    /// insertion fails after a successful delete, the store is left empty.
    pub fn save<F>(self: &Arc<Self>, feed: Vec<LocalFeedItem>, completion: F)
    where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let loader = Arc::downgrade(self);

        debug!(items = feed.len(), "deleting cached feed before save");
        self.store.delete_cached_feed(Box::new(move |result| {
            let Some(this) = upgrade(&loader, "delete") else {
                return;
            };

            match result {
                Ok(()) => this.cache(feed, completion),
                Err(error) => {
                    warn!(%error, "cache deletion failed, skipping insert");
                    completion(Err(error));
                }
            }
        }));
    }

    fn cache<F>(self: &Arc<Self>, feed: Vec<LocalFeedItem>, completion: F)
    where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let loader = Arc::downgrade(self);
        let timestamp = (self.current_date)();

        debug!(items = feed.len(), %timestamp, "inserting feed into cache");
        self.store.insert(
            feed,
            timestamp,
            Box::new(move |result| {
                if upgrade(&loader, "insert").is_none() {
                    return;
                }

                if let Err(error) = &result {
                    warn!(%error, "cache insertion failed");
                }
                completion(result);
            }),
        );
    }

    /// Reads the cached feed. An empty store and an expired feed both complete with an empty
    /// list; only a store failure is an error. Loading never modifies the store.
    pub fn load<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce(LoadResult) + Send + 'static,
    {
        let loader = Arc::downgrade(self);

        self.store.retrieve(Box::new(move |result| {
            let Some(this) = upgrade(&loader, "retrieve") else {
                return;
            };

            match result {
                Err(error) => {
                    warn!(%error, "cache retrieval failed");
                    completion(Err(error));
                }
                Ok(None) => {
                    debug!("cache is empty");
                    completion(Ok(Vec::new()));
                }
                Ok(Some(cached)) => {
                    let now = (this.current_date)();

                    if this.policy.validate(&cached.timestamp, &now) {
                        debug!(items = cached.feed.len(), timestamp = %cached.timestamp, "cache hit");
                        completion(Ok(cached.feed));
                    } else {
                        debug!(timestamp = %cached.timestamp, %now, "cached feed expired");
                        completion(Ok(Vec::new()));
                    }
                }
            }
        }));
    }
}

fn upgrade<S: FeedStore + ?Sized>(
    loader: &Weak<LocalFeedLoader<S>>,
    operation: &'static str,
) -> Option<Arc<LocalFeedLoader<S>>> {
    let loader = loader.upgrade();
    if loader.is_none() {
        debug!(operation, "loader dropped before store completed, discarding result");
    }
    loader
}

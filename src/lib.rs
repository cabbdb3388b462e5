//! Local cache for a single image feed.
//!
//! [`LocalFeedLoader`] keeps the last good feed in a [`FeedStore`]: saving replaces the cached feed
//! wholesale (delete, then insert), and loading serves it back only while [`FeedCachePolicy`]
//! considers it fresh. Store operations report through completions that may fire on any thread;
//! a completion that arrives after its loader was dropped is discarded.
//!
//! [`RemoteFeedLoader`] fetches the feed from its source through an [`HttpClient`] and maps it to
//! the items the cache stores.

pub mod config;
pub mod error;
pub mod feed;
pub mod loader;
pub mod policy;
pub mod remote;
pub mod store;

pub use config::{CacheConfig, StoreFormat};
pub use error::{BoxError, ConfigError, HttpClientError, RemoteFeedError, StoreError};
pub use feed::{CachedFeed, LocalFeedItem, Timestamp};
pub use loader::{LoadResult, LocalFeedLoader, SaveResult};
pub use policy::FeedCachePolicy;
pub use remote::{HttpClient, HttpResponse, RemoteFeedItem, RemoteFeedLoader};
pub use store::file::{BincodeFileFeedStore, FileFeedStore, JsonFileFeedStore};
pub use store::memory::InMemoryFeedStore;
pub use store::FeedStore;

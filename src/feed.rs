use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Point in time attached to a cached feed.
pub type Timestamp = DateTime<Utc>;

/// A feed image as the cache stores it and as [`crate::LocalFeedLoader::load`] hands it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFeedItem {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    url: Url,
}

impl LocalFeedItem {
    pub fn new(id: Uuid, description: Option<String>, location: Option<String>, url: Url) -> Self {
        Self {
            id,
            description,
            location,
            url,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// The single feed held by a store, with the instant the loader saved it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFeed {
    pub feed: Vec<LocalFeedItem>,
    pub timestamp: Timestamp,
}

impl CachedFeed {
    pub fn new(feed: Vec<LocalFeedItem>, timestamp: Timestamp) -> Self {
        Self { feed, timestamp }
    }
}

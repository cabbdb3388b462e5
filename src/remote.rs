pub mod client;
pub mod mapper;

pub use client::{HttpClient, HttpCompletion, HttpResponse, HttpResult};
pub use mapper::RemoteFeedItem;

use crate::error::RemoteFeedError;
use crate::feed::LocalFeedItem;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

pub type RemoteLoadResult = Result<Vec<LocalFeedItem>, RemoteFeedError>;

/// Fetches the feed from its source of record.
///
/// Items come back already mapped to [`LocalFeedItem`], ready to hand to
/// [`crate::LocalFeedLoader::save`]. Like the cache loader, results that arrive after the last
/// [`Arc`] to this loader is gone are dropped.
pub struct RemoteFeedLoader<C: HttpClient> {
    url: Url,
    client: Arc<C>,
}

impl<C: HttpClient + 'static> RemoteFeedLoader<C> {
    pub fn new(url: Url, client: Arc<C>) -> Arc<Self> {
        Arc::new(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Issues one request per call. A transport failure is [`RemoteFeedError::Connectivity`]; a
    /// response that is not a 200 with a decodable body is [`RemoteFeedError::InvalidData`].
    pub fn load<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce(RemoteLoadResult) + Send + 'static,
    {
        let loader = Arc::downgrade(self);

        debug!(url = %self.url, "requesting feed");
        self.client.get(
            &self.url,
            Box::new(move |result| {
                if loader.upgrade().is_none() {
                    debug!("remote loader dropped before response, discarding result");
                    return;
                }

                completion(match result {
                    Ok(response) => {
                        mapper::map(&response.body, response.status).map(mapper::to_local)
                    }
                    Err(error) => {
                        warn!(%error, "feed request failed");
                        Err(RemoteFeedError::Connectivity)
                    }
                });
            }),
        );
    }
}

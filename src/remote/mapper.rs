use crate::error::RemoteFeedError;
use crate::feed::LocalFeedItem;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

const OK_200: u16 = 200;

/// A feed image as the feed source serves it. The image locator arrives as `image`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFeedItem {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image: Url,
}

#[derive(Deserialize)]
struct Root {
    items: Vec<RemoteFeedItem>,
}

/// Decodes a feed response body. Anything but a 200 with a `{"items": [...]}` payload is invalid.
pub fn map(data: &[u8], status: u16) -> Result<Vec<RemoteFeedItem>, RemoteFeedError> {
    if status != OK_200 {
        return Err(RemoteFeedError::InvalidData);
    }

    serde_json::from_slice::<Root>(data)
        .map(|root| root.items)
        .map_err(|_| RemoteFeedError::InvalidData)
}

impl From<RemoteFeedItem> for LocalFeedItem {
    fn from(item: RemoteFeedItem) -> Self {
        LocalFeedItem::new(item.id, item.description, item.location, item.image)
    }
}

pub fn to_local(items: Vec<RemoteFeedItem>) -> Vec<LocalFeedItem> {
    items.into_iter().map(LocalFeedItem::from).collect()
}

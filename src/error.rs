use thiserror::Error;

/// Underlying failure reported by a storage or transport backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of one of the three store operations. The variant names the stage that failed; the
/// backend's own error is kept as the source.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to delete cached feed")]
    Deletion(#[source] BoxError),

    #[error("failed to insert feed into cache")]
    Insertion(#[source] BoxError),

    #[error("failed to retrieve cached feed")]
    Retrieval(#[source] BoxError),
}

impl StoreError {
    pub fn deletion(error: impl Into<BoxError>) -> Self {
        StoreError::Deletion(error.into())
    }

    pub fn insertion(error: impl Into<BoxError>) -> Self {
        StoreError::Insertion(error.into())
    }

    pub fn retrieval(error: impl Into<BoxError>) -> Self {
        StoreError::Retrieval(error.into())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RemoteFeedError {
    /// The client never produced a response.
    #[error("could not reach the feed source")]
    Connectivity,

    /// A response arrived but was not a 200 with a well-formed payload.
    #[error("feed source returned invalid data")]
    InvalidData,
}

/// Transport-level failure surfaced by an [`crate::remote::HttpClient`].
#[derive(Debug, Error)]
#[error("http request failed")]
pub struct HttpClientError(#[source] pub BoxError);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),

    #[error("max_cache_age_days must be greater than zero")]
    ZeroMaxAge,
}

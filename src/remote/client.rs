use crate::error::HttpClientError;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub type HttpResult = Result<HttpResponse, HttpClientError>;
pub type HttpCompletion = Box<dyn FnOnce(HttpResult) + Send>;

/// Transport used by [`crate::RemoteFeedLoader`].
///
/// The completion may be invoked on any thread. Callers are responsible for dispatching to the
/// context they need.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &Url, completion: HttpCompletion);
}

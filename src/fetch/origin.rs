use async_trait::async_trait;
use bytes::Bytes;

use crate::error::thumbnail::FetchError;

/// Port for retrieving source image bytes.
///
/// Implementations perform exactly one retrieval per call. Retrying is the
/// job coordinator's decision, driven by [`FetchError::is_transient`].
#[async_trait]
pub trait OriginFetcher: Send + Sync {
    /// Downloads the body at `url`.
    ///
    /// `url` must be an absolute `http`/`https` URL.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

use crate::mapping::UrlMapping;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the mapping for `original_url`, creating it on first use.
    ///
    /// The URL is expected to be validated by the caller.
    async fn shorten(&self, original_url: &str) -> Result<UrlMapping>;

    /// Resolves a short code to its original URL.
    /// Returns `None` if no mapping uses the code.
    async fn resolve(&self, code: &str) -> Result<Option<String>>;
}

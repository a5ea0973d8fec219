use crate::error::StorageError;
use crate::mapping::{NewUrlMapping, UrlMapping};
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// Lookups are safe to run concurrently with inserts and may be served at a
/// weaker isolation level than writes.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the mapping for a given short code.
    /// Returns `None` if the code does not exist. `code` is not validated.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>>;

    /// Retrieves the mapping for a given original URL.
    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlMapping>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new mapping and returns it with its assigned id.
    ///
    /// Uniqueness of both the short code and the original URL is enforced
    /// here. Violations return [`StorageError::DuplicateShortCode`] or
    /// [`StorageError::DuplicateOriginalUrl`] and leave the store unchanged.
    async fn insert(&self, mapping: NewUrlMapping) -> Result<UrlMapping>;
}

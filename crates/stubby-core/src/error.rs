use thiserror::Error;

/// Errors reported by a storage backend.
///
/// Uniqueness violations are reported per key so callers can tell a code
/// collision apart from a concurrent insert of the same URL.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    DuplicateShortCode(String),
    #[error("original url already exists: {0}")]
    DuplicateOriginalUrl(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Returns `true` for failures that may succeed if the whole operation is retried later.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("no unique short code found after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors() {
        assert!(StorageError::Unavailable("down".into()).is_transient());
        assert!(StorageError::Timeout("slow".into()).is_transient());
        assert!(!StorageError::Query("bad sql".into()).is_transient());
        assert!(!StorageError::DuplicateShortCode("abc123".into()).is_transient());
    }

    #[test]
    fn storage_error_is_propagated_unchanged() {
        let err: ShortenerError = StorageError::Unavailable("connection refused".into()).into();
        assert!(matches!(err, ShortenerError::Storage(StorageError::Unavailable(_))));
        assert_eq!(
            err.to_string(),
            "storage backend unavailable: connection refused"
        );
    }
}

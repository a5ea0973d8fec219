use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use stubby_core::repository::{ReadRepository, Repository, Result};
use stubby_core::{MappingId, NewUrlMapping, StorageError, UrlMapping};
use tracing::trace;

/// In-memory implementation of the Repository trait using DashMap.
///
/// Mappings live in a code index; a second index maps each original URL
/// to its code. DashMap's sharded locks let lookups and inserts on
/// different buckets proceed without blocking each other.
#[derive(Debug)]
pub struct InMemoryRepository {
    by_code: DashMap<String, UrlMapping>,
    by_url: DashMap<String, String>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_code: DashMap::with_capacity(capacity),
            by_url: DashMap::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>> {
        Ok(self.by_code.get(code).map(|entry| entry.value().clone()))
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlMapping>> {
        // The url guard must be released before touching the code index.
        let Some(code) = self.by_url.get(original_url).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };

        self.find_by_code(&code).await
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, mapping: NewUrlMapping) -> Result<UrlMapping> {
        // Lock order is url index, then code index. Only insert holds both.
        let url_slot = match self.by_url.entry(mapping.original_url.clone()) {
            Entry::Occupied(_) => {
                return Err(StorageError::DuplicateOriginalUrl(mapping.original_url));
            }
            Entry::Vacant(slot) => slot,
        };

        let code_slot = match self.by_code.entry(mapping.short_code.as_str().to_owned()) {
            Entry::Occupied(_) => {
                return Err(StorageError::DuplicateShortCode(
                    mapping.short_code.to_string(),
                ));
            }
            Entry::Vacant(slot) => slot,
        };

        let id = MappingId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mapping = mapping.into_mapping(id);

        // Publish the code first so a reader that finds the url can always follow it.
        code_slot.insert(mapping.clone());
        url_slot.insert(mapping.short_code.as_str().to_owned());

        trace!(id = %mapping.id, code = %mapping.short_code, "inserted mapping");
        Ok(mapping)
    }
}

use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Store-assigned identity of a mapping. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingId(u64);

impl MappingId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for MappingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted association between a short code and an original URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    pub id: MappingId,
    pub short_code: ShortCode,
    pub original_url: String,
    pub created_at: Timestamp,
    /// Stored for future use; nothing checks it yet.
    pub expires_at: Option<Timestamp>,
}

/// A mapping that has not been persisted yet. The store assigns the id on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlMapping {
    pub short_code: ShortCode,
    pub original_url: String,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl NewUrlMapping {
    /// Creates a mapping stamped with the current time and no expiry.
    pub fn now(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        Self {
            short_code,
            original_url: original_url.into(),
            created_at: Timestamp::now(),
            expires_at: None,
        }
    }

    /// Attaches the store-assigned id.
    pub fn into_mapping(self, id: MappingId) -> UrlMapping {
        UrlMapping {
            id,
            short_code: self.short_code,
            original_url: self.original_url,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

use crate::error::{AppError, Result};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

/// Longest URL accepted, in bytes. Matches the `original_url` column width.
pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

impl ShortenRequest {
    /// Returns the trimmed URL if it is an absolute http(s) URL with a host.
    ///
    /// The trimmed input, not the parsed form, is what gets stored, so the
    /// dedup key is exactly what the client sent.
    pub fn validated_url(&self) -> Result<&str> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidUrl("URL is required".to_string()));
        }

        if trimmed.len() > MAX_URL_LENGTH {
            return Err(AppError::InvalidUrl(format!(
                "URL must be at most {MAX_URL_LENGTH} bytes, got {}",
                trimmed.len()
            )));
        }

        // The stored url is replayed verbatim in the Location header.
        if trimmed.chars().any(char::is_control) {
            return Err(AppError::InvalidUrl(
                "URL must not contain control characters".to_string(),
            ));
        }

        let parsed = Url::parse(trimmed)
            .map_err(|e| AppError::InvalidUrl(format!("invalid URL format: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(AppError::InvalidUrl(format!("URL must have a host: {trimmed}")));
        }

        Ok(trimmed)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

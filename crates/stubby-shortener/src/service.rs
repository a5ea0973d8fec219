use async_trait::async_trait;
use std::sync::Arc;
use stubby_core::{
    NewUrlMapping, Repository, ShortCode, Shortener, ShortenerError, StorageError, UrlMapping,
};
use stubby_generator::Generator;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Collision retries allowed after the first candidate code.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Number of fresh candidates tried after the first one collides.
    #[builder(default = DEFAULT_MAX_RETRIES)]
    max_retries: u32,
}

impl ShortenerSettings {
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - dedup by original URL
/// - collision detection and bounded retry on generated codes
/// - recovery from concurrent inserts of the same URL
///
/// No lock is held across repository calls. The repository's unique
/// constraints on code and URL are what keep concurrent writers correct;
/// the pre-insert code lookup only avoids a doomed insert.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, ShortenerSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// Called when the url index rejected our insert: another writer shortened
    /// the same url first, so its mapping is the answer.
    async fn fetch_race_winner(&self, original_url: &str) -> Result<UrlMapping> {
        match self.repository.find_by_url(original_url).await? {
            Some(winner) => {
                debug!(code = %winner.short_code, "url shortened concurrently, returning winner");
                Ok(winner)
            }
            None => {
                warn!(original_url, "url reported as duplicate but not found");
                Err(StorageError::DuplicateOriginalUrl(original_url.to_owned()).into())
            }
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, original_url: &str) -> Result<UrlMapping> {
        if let Some(existing) = self.repository.find_by_url(original_url).await? {
            debug!(code = %existing.short_code, "url already shortened");
            return Ok(existing);
        }

        let attempts = self.settings.max_retries.saturating_add(1);

        for attempt in 1..=attempts {
            let code: ShortCode = self.generator.generate().into();

            if self.repository.find_by_code(code.as_str()).await?.is_some() {
                debug!(%code, attempt, "generated short code already in use");
                continue;
            }

            match self
                .repository
                .insert(NewUrlMapping::now(code, original_url))
                .await
            {
                Ok(mapping) => {
                    debug!(id = %mapping.id, code = %mapping.short_code, attempt, "created mapping");
                    return Ok(mapping);
                }
                Err(StorageError::DuplicateShortCode(code)) => {
                    debug!(%code, attempt, "short code taken by a concurrent insert");
                }
                Err(StorageError::DuplicateOriginalUrl(_)) => {
                    return self.fetch_race_winner(original_url).await;
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(attempts, "no unique short code found");
        Err(ShortenerError::ExhaustedRetries { attempts })
    }

    async fn resolve(&self, code: &str) -> Result<Option<String>> {
        trace!(code, "resolving short code");

        // Nothing malformed was ever issued, so it cannot be stored.
        let code = match ShortCode::new(code) {
            Ok(code) => code,
            Err(err) => {
                trace!(code, error = %err, "malformed short code");
                return Ok(None);
            }
        };

        match self.repository.find_by_code(code.as_str()).await? {
            Some(mapping) => Ok(Some(mapping.original_url)),
            None => {
                trace!(%code, "short code not found");
                Ok(None)
            }
        }
    }
}

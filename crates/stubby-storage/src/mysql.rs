use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use stubby_core::repository::{ReadRepository, Repository, Result};
use stubby_core::{MappingId, NewUrlMapping, ShortCode, StorageError, UrlMapping};
use tracing::debug;

/// Schema for the `short_urls` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/short_urls.sql");

const SHORT_CODE_KEY: &str = "uk_short_urls_short_code";
const ORIGINAL_URL_KEY: &str = "uk_short_urls_original_url";

/// MySQL implementation of the repository contract.
///
/// Both `short_code` and `original_url` carry unique indexes, so the
/// database is the final arbiter when concurrent writers race. The url
/// index is built over a stored SHA-256 of the url since full urls exceed
/// InnoDB's key length. Timestamps are stored as Unix microseconds.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_urls` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_timestamp(column: &str, micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{micros}': {e}"))
    })
}

/// Drops sub-microsecond precision so the returned mapping equals what a later read yields.
fn truncate_to_micros(ts: Timestamp) -> Result<Timestamp> {
    parse_timestamp("created_at", ts.as_microsecond())
}

fn row_to_mapping(row: MySqlRow) -> Result<UrlMapping> {
    let id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let expires_at: Option<i64> = row.try_get("expires_at").map_err(map_sqlx_error)?;

    Ok(UrlMapping {
        id: MappingId::new(id),
        short_code: ShortCode::new_unchecked(short_code),
        original_url,
        created_at: parse_timestamp("created_at", created_at)?,
        expires_at: expires_at
            .map(|value| parse_timestamp("expires_at", value))
            .transpose()?,
    })
}

/// Maps a unique violation to the index it hit, or `None` if `err` is something else.
fn unique_violation(err: &sqlx::Error, mapping: &NewUrlMapping) -> Option<StorageError> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    // MySQL reports the key only in the message: "Duplicate entry '..' for key 'short_urls.<key>'".
    let message = db_err.message();
    if message.contains(ORIGINAL_URL_KEY) {
        Some(StorageError::DuplicateOriginalUrl(mapping.original_url.clone()))
    } else if message.contains(SHORT_CODE_KEY) {
        Some(StorageError::DuplicateShortCode(mapping.short_code.to_string()))
    } else {
        None
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>> {
        // `short_code` is an ascii column; comparing it to other text is a
        // collation error, not a miss.
        if !code.is_ascii() {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            SELECT id, short_code, original_url, created_at, expires_at
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_mapping).transpose()
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT id, short_code, original_url, created_at, expires_at
            FROM short_urls
            WHERE original_url_sha256 = UNHEX(SHA2(?, 256))
              AND original_url = ?
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_mapping).transpose()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, mapping: NewUrlMapping) -> Result<UrlMapping> {
        let created_at = truncate_to_micros(mapping.created_at)?;
        let expires_at = mapping.expires_at.map(|ts| ts.as_microsecond());

        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, original_url, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(mapping.short_code.as_str())
        .bind(mapping.original_url.as_str())
        .bind(created_at.as_microsecond())
        .bind(expires_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = MappingId::new(done.last_insert_id());
                debug!(%id, code = %mapping.short_code, "inserted mapping");
                Ok(NewUrlMapping {
                    created_at,
                    ..mapping
                }
                .into_mapping(id))
            }
            Err(err) => match unique_violation(&err, &mapping) {
                Some(violation) => Err(violation),
                None => Err(map_sqlx_error(err)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_drops_nanoseconds() {
        let ts = Timestamp::new(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_to_micros(ts).unwrap();
        assert_eq!(truncated, Timestamp::new(1_700_000_000, 123_456_000).unwrap());
    }

    #[test]
    fn pool_errors_map_to_transient_failures() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StorageError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StorageError::InvalidData(_)
        ));
    }
}

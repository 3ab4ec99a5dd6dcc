//! Database operations for the append-only `scrape_logs` audit table.

use chrono::{DateTime, Utc};
use dealscrape_core::{AuditSink, ProductSource, ScrapeAuditRecord};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `scrape_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScrapeLogRow {
    pub id: i64,
    pub public_id: Uuid,
    pub url: String,
    pub success: bool,
    /// Lowercase source name; `NULL` for aborted scrapes.
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ScrapeLogRow {
    /// The stored source, if it names a known profile.
    #[must_use]
    pub fn product_source(&self) -> Option<ProductSource> {
        self.source.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Appends one audit record. The record's own timestamp becomes `created_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_scrape_log(
    pool: &PgPool,
    record: &ScrapeAuditRecord,
) -> Result<ScrapeLogRow, DbError> {
    let row = sqlx::query_as::<_, ScrapeLogRow>(
        "INSERT INTO scrape_logs (public_id, url, success, source, created_at) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, public_id, url, success, source, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&record.url)
    .bind(record.success)
    .bind(record.source.map(ProductSource::as_str))
    .bind(record.timestamp)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Most recent audit rows, newest first.
///
/// `limit` is clamped to `1..=1000`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_scrape_logs(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ScrapeLogRow>, DbError> {
    let rows = sqlx::query_as::<_, ScrapeLogRow>(
        "SELECT id, public_id, url, success, source, created_at \
         FROM scrape_logs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// [`AuditSink`] that appends to `scrape_logs` on a background task.
///
/// `record` returns immediately. Insert failures are logged and dropped so
/// they never reach the scrape caller.
#[derive(Debug, Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AuditSink for PgAuditSink {
    fn record(&self, record: ScrapeAuditRecord) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!(url = %record.url, "no async runtime; dropping scrape audit record");
            return;
        };
        let pool = self.pool.clone();
        handle.spawn(async move {
            if let Err(e) = insert_scrape_log(&pool, &record).await {
                tracing::error!(url = %record.url, error = %e, "failed to persist scrape audit record");
            }
        });
    }
}

// SQLite usage store: one row per entity, document body as a versioned wincode BLOB.
//
// Inspecting BLOB data: run `cargo run --example dump_usage -- [DB_PATH] [LIMIT]` to print
// stored documents as JSON.

mod blob;
mod store;

pub use store::UsageStore;

use crate::models::UsageDocument;
use anyhow::Context;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct UsageRepo {
    pool: SqlitePool,
}

impl UsageRepo {
    /// Connect to SQLite at `path`, create parent dir and DB if missing, enable WAL + pragmas.
    pub async fn connect(path: &str, max_pool_size: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    /// Create tables if they don't exist.
    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (key TEXT PRIMARY KEY, value INTEGER NOT NULL)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_statistics (
                entity TEXT PRIMARY KEY,
                updated_at INTEGER NOT NULL,
                data BLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO schema_version (key, value) VALUES ('usage_document', $1)",
        )
        .bind(blob::DOCUMENT_VERSION as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self), fields(repo = "usage", operation = "find_page"))]
    pub async fn find_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<Vec<UsageDocument>> {
        let rows = sqlx::query(
            "SELECT entity, data FROM usage_statistics
             WHERE $1 IS NULL OR entity > $1
             ORDER BY entity ASC LIMIT $2",
        )
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_document_row(&row)?);
        }
        Ok(out)
    }

    pub async fn get(&self, entity: &str) -> anyhow::Result<Option<UsageDocument>> {
        let row = sqlx::query("SELECT entity, data FROM usage_statistics WHERE entity = $1")
            .bind(entity)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| Self::parse_document_row(&row)).transpose()
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM usage_statistics")
            .fetch_one(&self.pool)
            .await?;
        Ok(n as u64)
    }

    #[instrument(skip(self, doc), fields(repo = "usage", operation = "save", entity = %doc.entity))]
    pub async fn save(&self, doc: &UsageDocument) -> anyhow::Result<()> {
        anyhow::ensure!(!doc.entity.is_empty(), "usage document entity must be non-empty");
        let data = blob::with_version_prefix(
            blob::DOCUMENT_VERSION,
            wincode::serialize(doc).map_err(|e| anyhow::anyhow!("wincode: {}", e))?,
        );
        let updated_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs() as i64;

        sqlx::query(
            r#"
            INSERT INTO usage_statistics (entity, updated_at, data) VALUES ($1, $2, $3)
            ON CONFLICT(entity) DO UPDATE SET updated_at = excluded.updated_at, data = excluded.data
            "#,
        )
        .bind(&doc.entity)
        .bind(updated_at)
        .bind(&data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Reclaim space after pruning shrinks documents.
    #[instrument(skip(self), fields(repo = "usage", operation = "vacuum"))]
    pub async fn vacuum(&self) -> anyhow::Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    fn parse_document_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<UsageDocument> {
        let entity: String = row.try_get("entity")?;
        let data: Vec<u8> = row.try_get("data")?;

        let payload = blob::versioned_payload(&data, blob::DOCUMENT_VERSION).with_context(|| {
            format!(
                "usage document {} has unsupported blob version {:?}",
                entity,
                blob::blob_version(&data)
            )
        })?;
        let mut doc: UsageDocument = wincode::deserialize(payload)
            .map_err(|e| anyhow::anyhow!("wincode deserialize usage document {}: {}", entity, e))?;
        doc.entity = entity;
        Ok(doc)
    }
}

impl UsageStore for UsageRepo {
    async fn find_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<Vec<UsageDocument>> {
        UsageRepo::find_page(self, after, limit).await
    }

    async fn save(&self, doc: &UsageDocument) -> anyhow::Result<()> {
        UsageRepo::save(self, doc).await
    }
}

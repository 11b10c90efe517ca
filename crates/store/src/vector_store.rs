//! pgvector-backed storage for manual chunks.
//!
//! One table, full-replace ingestion: every run clears `manual_embeddings`
//! before inserting. Each insert runs in its own transaction so one failed
//! chunk never poisons the rest of a run.

use async_trait::async_trait;
use pgvector::Vector;
use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::info;

use troubledesk_core::config::PostgresConfig;
use troubledesk_core::Chunk;

use crate::error::StoreError;

/// Fixed vector column dimensionality. Must match the embedding service's
/// configured output dimensionality.
pub const EMBEDDING_DIM: usize = 768;

const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS manual_embeddings (
    id SERIAL PRIMARY KEY,
    content TEXT NOT NULL,
    embedding VECTOR(768),
    page_start INTEGER,
    page_end INTEGER,
    section TEXT,
    created_at TIMESTAMPTZ DEFAULT NOW()
)";

/// Create a PostgreSQL connection pool. Unlike optional integrations, an
/// unreachable destination is fatal for this pipeline.
pub async fn init_pg_pool(config: &PostgresConfig) -> Result<PgPool, StoreError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| StoreError::NotConfigured("DATABASE_URL not set".to_string()))?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;
    info!("PostgreSQL connected");
    Ok(pool)
}

// ── Types ──────────────────────────────────────────

/// A nearest-neighbor match for a query embedding.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub content: String,
    pub section: String,
    pub page_start: i32,
    pub page_end: i32,
    /// Cosine distance to the query vector (smaller is closer).
    pub distance: f64,
}

// ── Store seam ─────────────────────────────────────

/// Destination for embedded chunks. The ingestion pipeline only needs these
/// three operations; tests substitute an in-memory implementation.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Idempotent create-if-absent of the destination table.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Delete all previously stored chunks (full-replace ingestion).
    async fn clear(&self) -> Result<(), StoreError>;

    /// Insert one chunk with its vector, in an individual transaction.
    async fn insert(&self, chunk: &Chunk, embedding: &[f32]) -> Result<(), StoreError>;
}

/// `ChunkStore` over PostgreSQL + pgvector.
pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkStore for PgVectorStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM manual_embeddings")
            .execute(&self.pool)
            .await?;
        info!(deleted = result.rows_affected(), "cleared previous embeddings");
        Ok(())
    }

    async fn insert(&self, chunk: &Chunk, embedding: &[f32]) -> Result<(), StoreError> {
        let vector = Vector::from(embedding.to_vec());
        // Rollback on error happens when the uncommitted transaction drops.
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO manual_embeddings (content, embedding, page_start, page_end, section) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&chunk.content)
        .bind(&vector)
        .bind(chunk.page_start as i32)
        .bind(chunk.page_end as i32)
        .bind(&chunk.section)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }
}

// ── Retrieval ──────────────────────────────────────

/// Search chunks by cosine distance, closest first.
pub async fn search(
    pool: &PgPool,
    query_embedding: Vec<f32>,
    limit: i64,
) -> Result<Vec<SearchResult>, StoreError> {
    let embedding = Vector::from(query_embedding);
    let rows = sqlx::query(
        "SELECT content, section, page_start, page_end, \
         embedding <=> $1::vector AS distance \
         FROM manual_embeddings \
         ORDER BY embedding <=> $1::vector \
         LIMIT $2",
    )
    .bind(&embedding)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let results = rows
        .iter()
        .map(|row| SearchResult {
            content: row.get("content"),
            section: row.get("section"),
            page_start: row.get("page_start"),
            page_end: row.get("page_end"),
            distance: row.get("distance"),
        })
        .collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_expected_columns() {
        assert!(SCHEMA_SQL.contains("IF NOT EXISTS"));
        assert!(SCHEMA_SQL.contains("VECTOR(768)"));
        for col in ["content", "page_start", "page_end", "section", "created_at"] {
            assert!(SCHEMA_SQL.contains(col), "schema missing column {col}");
        }
    }

    #[test]
    fn search_result_serializes() {
        let res = SearchResult {
            content: "Reset the alarm via parameter 900.".to_string(),
            section: "ALARMS".to_string(),
            page_start: 91,
            page_end: 92,
            distance: 0.12,
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("\"section\":\"ALARMS\""));
        assert!(json.contains("\"distance\":0.12"));
    }
}

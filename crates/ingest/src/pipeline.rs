//! Quota-gated, fault-tolerant embed-and-persist loop.
//!
//! Strictly sequential: one chunk at a time, embed then persist, with a fixed
//! pause after every attempt as backpressure against the embedding service.
//! A failed chunk is logged and skipped; it never aborts the run. The retry
//! mechanism is a later full run, which re-clears and re-extracts.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use troubledesk_core::config::ChunkingConfig;
use troubledesk_core::{Chunk, PageText};
use troubledesk_llm::{Embedder, EmbeddingError};
use troubledesk_store::{ChunkStore, StoreError};

use crate::document::extract_chunks;
use crate::quota::{QuotaError, QuotaTracker};

/// Failures that abort the whole run. Per-chunk embed/persist errors are
/// handled inside the loop and only show up as skip counts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("quota ledger error: {0}")]
    Quota(#[from] QuotaError),
}

#[derive(Debug, Error)]
enum ChunkError {
    #[error("embedding failed: {0}")]
    Embed(#[from] EmbeddingError),
    #[error("persistence failed: {0}")]
    Persist(#[from] StoreError),
}

/// Outcome of one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Sequences quota check → chunk extraction → per-chunk embed → persist →
/// quota update, with per-item error isolation and inter-request pacing.
pub struct IngestionPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ChunkStore>,
    quota: QuotaTracker,
    chunking: ChunkingConfig,
    request_delay: Duration,
}

impl IngestionPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn ChunkStore>,
        quota: QuotaTracker,
        chunking: ChunkingConfig,
        request_delay: Duration,
    ) -> Self {
        Self {
            embedder,
            store,
            quota,
            chunking,
            request_delay,
        }
    }

    /// Run one full-replace ingestion over `pages`.
    pub async fn run(&self, pages: &[PageText]) -> Result<IngestReport, PipelineError> {
        let mut state = self.quota.load();
        let remaining = self.quota.remaining(&state);
        info!(used = state.used, remaining, "daily embedding quota");
        if remaining <= 0 {
            info!("daily quota reached, ending run with no work done");
            return Ok(IngestReport::default());
        }

        // Schema/clear failures here mean the destination is unusable for the
        // whole run, so they propagate.
        self.store.ensure_schema().await?;
        self.store.clear().await?;

        let mut chunks = extract_chunks(pages, &self.chunking);
        info!(chunks = chunks.len(), "relevant chunks extracted");

        if chunks.len() as i64 > remaining {
            warn!(
                extracted = chunks.len(),
                allowed = remaining,
                "quota allows fewer embeddings than chunks, truncating"
            );
            chunks.truncate(remaining as usize);
        }

        let mut report = IngestReport::default();
        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            match self.embed_and_store(chunk).await {
                Ok(()) => {
                    // Charge quota only for calls that actually completed.
                    self.quota.record_use(&mut state)?;
                    report.inserted += 1;
                    info!(
                        chunk = i + 1,
                        total,
                        page_start = chunk.page_start,
                        page_end = chunk.page_end,
                        section = %chunk.section,
                        "chunk embedded and stored"
                    );
                }
                Err(e) => {
                    report.skipped += 1;
                    warn!(chunk = i + 1, total, error = %e, "chunk skipped");
                }
            }
            tokio::time::sleep(self.request_delay).await;
        }

        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            quota_used = state.used,
            "ingestion run finished"
        );
        Ok(report)
    }

    async fn embed_and_store(&self, chunk: &Chunk) -> Result<(), ChunkError> {
        let embedding = self.embedder.embed(&chunk.content).await?;
        self.store.insert(chunk, &embedding).await?;
        Ok(())
    }
}

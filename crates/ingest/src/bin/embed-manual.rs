//! embed-manual — chunk a manual PDF and persist Gemini embeddings to pgvector.
//!
//! Full-replace ingestion: clears the destination table, re-extracts chunks
//! from the configured page range, and embeds them under the daily quota.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use troubledesk_core::config::{load_dotenv, Config};
use troubledesk_ingest::document::extract_pages;
use troubledesk_ingest::{IngestionPipeline, QuotaTracker};
use troubledesk_llm::GeminiEmbedder;
use troubledesk_store::{init_pg_pool, PgVectorStore, EMBEDDING_DIM};

/// Manual ingestion: PDF → chunks → Gemini embeddings → pgvector.
#[derive(Parser, Debug)]
#[command(name = "embed-manual", version, about)]
struct Cli {
    /// Path to the manual PDF (overrides MANUAL_PDF_PATH).
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// First page to ingest, 0-indexed (overrides MANUAL_START_PAGE).
    #[arg(long)]
    start_page: Option<usize>,

    /// One past the last page to ingest (overrides MANUAL_END_PAGE).
    #[arg(long)]
    end_page: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(pdf) = cli.pdf {
        config.manual.pdf_path = pdf;
    }
    if let Some(start) = cli.start_page {
        config.manual.start_page = start;
    }
    if let Some(end) = cli.end_page {
        config.manual.end_page = end;
    }
    config.log_summary();

    // Missing credentials are fatal before any work starts.
    let api_key = config
        .gemini
        .api_key
        .clone()
        .context("GEMINI_API_KEY not set")?;
    if !config.postgres.is_configured() {
        bail!("DATABASE_URL not set");
    }
    if config.gemini.dimensions != EMBEDDING_DIM {
        bail!(
            "EMBEDDING_DIMENSIONS={} does not match the vector({}) column",
            config.gemini.dimensions,
            EMBEDDING_DIM
        );
    }
    if config.manual.start_page >= config.manual.end_page {
        bail!(
            "invalid page range {}..{}",
            config.manual.start_page,
            config.manual.end_page
        );
    }

    let pool = init_pg_pool(&config.postgres).await?;

    let bytes = tokio::fs::read(&config.manual.pdf_path)
        .await
        .with_context(|| format!("failed to read {}", config.manual.pdf_path.display()))?;
    let pages = extract_pages(&bytes, config.manual.start_page, config.manual.end_page)?;
    info!(pages = pages.len(), "manual pages extracted");

    let embedder = Arc::new(GeminiEmbedder::new(
        api_key,
        config.gemini.embedding_model.clone(),
        config.gemini.dimensions,
    ));
    let store = Arc::new(PgVectorStore::new(pool));
    let quota = QuotaTracker::new(&config.quota);

    let pipeline = IngestionPipeline::new(
        embedder,
        store,
        quota,
        config.chunking.clone(),
        Duration::from_millis(config.quota.request_delay_ms),
    );

    let report = pipeline.run(&pages).await?;
    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "embed-manual finished"
    );
    Ok(())
}

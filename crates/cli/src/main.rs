//! troubledesk — query the embedded manual and generate a solution card.
//!
//! Retrieval side of the pipeline: embed the user's problem description,
//! pull the nearest stored chunks from pgvector, and ask the generative
//! model for a structured answer grounded in those excerpts.

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use troubledesk_core::config::{load_dotenv, Config};
use troubledesk_llm::solution::ManualExcerpt;
use troubledesk_llm::{GeminiEmbedder, GeminiProvider, Embedder, SolutionCardGenerator};
use troubledesk_store::{init_pg_pool, vector_store};

/// CNC manual troubleshooting assistant.
#[derive(Parser, Debug)]
#[command(name = "troubledesk", version, about)]
struct Cli {
    /// Problem description to search the manual for.
    query: String,

    /// Number of nearest chunks to retrieve.
    #[arg(long, default_value_t = 3)]
    limit: i64,

    /// Only print the retrieved excerpts, skip answer generation.
    #[arg(long)]
    no_card: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let api_key = config
        .gemini
        .api_key
        .clone()
        .context("GEMINI_API_KEY not set")?;
    if !config.postgres.is_configured() {
        bail!("DATABASE_URL not set");
    }

    let pool = init_pg_pool(&config.postgres).await?;

    let embedder = GeminiEmbedder::new(
        api_key.clone(),
        config.gemini.embedding_model.clone(),
        config.gemini.dimensions,
    );

    info!("embedding query");
    let query_embedding = embedder.embed(&cli.query).await?;

    info!("searching vector store");
    let results = vector_store::search(&pool, query_embedding, cli.limit).await?;
    if results.is_empty() {
        bail!("no stored chunks found — run embed-manual first");
    }

    println!("\nTop matches:\n");
    for (i, r) in results.iter().enumerate() {
        println!("Result {}", i + 1);
        println!("Section: {}", r.section);
        println!("Pages: {}-{}", r.page_start, r.page_end);
        println!("Distance: {:.4}", r.distance);
        let preview: String = r.content.chars().take(500).collect();
        println!("{preview}");
        println!("{}", "-".repeat(60));
    }

    if cli.no_card {
        return Ok(());
    }

    let excerpts: Vec<ManualExcerpt> = results
        .iter()
        .map(|r| ManualExcerpt {
            section: r.section.clone(),
            page_start: r.page_start as usize,
            page_end: r.page_end as usize,
            content: r.content.clone(),
        })
        .collect();

    let generator = SolutionCardGenerator::new(
        Box::new(GeminiProvider::new(
            api_key,
            config.gemini.generation_model.clone(),
        )),
        config.gemini.temperature,
        config.gemini.max_tokens,
    );

    println!("\nGenerating solution card...\n");
    let card = generator.generate(&cli.query, &excerpts).await?;

    println!("==============================");
    println!("       SOLUTION CARD");
    println!("==============================\n");
    println!("{card}");

    Ok(())
}

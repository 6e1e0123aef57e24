//! PDF ingestion binary
//!
//! Run with: cargo run -p pdf-ingest --bin pdf-ingest
//!
//! Settings come from `pdf-ingest.toml` (or the file named by
//! `PDF_INGEST_CONFIG`) and the environment.

use std::path::PathBuf;

use pdf_ingest::{
    config::IngestConfig,
    providers::{embedder_from_config, vector_store_from_config},
    IngestPipeline,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG_ENV: &str = "PDF_INGEST_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "pdf-ingest.toml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = IngestConfig::load(Some(config_path.as_path()))?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Input: {}", config.input.path.display());
    tracing::info!(
        "  - Collection: {} ({})",
        config.vector_store.collection_name,
        config.vector_store.path.display()
    );
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let embedder = embedder_from_config(&config.embeddings)?;
    let mut store = vector_store_from_config(&config.vector_store);
    let pipeline = IngestPipeline::from_config(&config);

    let report = pipeline.run(&config.input.path, embedder.as_ref(), &mut store)?;

    match &report.persisted_to {
        Some(path) => tracing::info!(
            "Stored {} chunks from {} of {} pages ({} dimensions) in {}",
            report.chunks,
            report.pages,
            report.total_pages,
            report.dimensions,
            path.display()
        ),
        None => tracing::warn!(
            "No chunks stored for {} ({} pages, none with text)",
            config.input.path.display(),
            report.total_pages
        ),
    }

    Ok(())
}

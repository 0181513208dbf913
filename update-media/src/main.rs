//! Batch media update: fetches both folders and overwrites the site's media
//! JSON file. Any failure aborts the run with a non-zero exit so a broken sync
//! never leaves a fresh-looking success marker behind.

use anyhow::{Context, Result};
use drive_media::{config::Config, drive::MediaFetcher};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "media.json";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_owned());
    tracing::info!("starting media update");

    let config = Config::from_env()?;
    let fetcher = MediaFetcher::new();
    let collection = fetcher.fetch_collection(&config).await?;

    let pretty = serde_json::to_string_pretty(&collection)?;
    std::fs::write(&output, pretty).with_context(|| format!("writing {output}"))?;

    tracing::info!(
        "wrote {} :: {} images, {} videos :: last sync {}",
        output,
        collection.counts.gallery,
        collection.counts.videos,
        collection.last_sync
    );

    Ok(())
}

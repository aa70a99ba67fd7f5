//! Wire configuration into a ready pipeline

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sibyl_config::Config;
use sibyl_db::Database;
use sibyl_llm::{create_chat_provider, create_embedding_provider};
use sibyl_pipeline::SqlPipeline;
use sibyl_store::ContextStore;

pub async fn load_config(path: &Path) -> Result<Config> {
    Config::load(path)
        .await
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

/// Construct every service the pipeline needs and assemble it
pub async fn build_pipeline(config: &Config) -> Result<SqlPipeline> {
    let embedder = create_embedding_provider(&config.embedding)?;
    let store = ContextStore::open(&config.store.path, embedder)
        .with_context(|| format!("failed to open context index at {}", config.store.path.display()))?;
    let chat = create_chat_provider(&config.llm)?;
    let database = Database::connect(&config.database)
        .await
        .context("failed to connect to the configured database")?;

    Ok(SqlPipeline::new(
        Arc::new(store),
        chat,
        Arc::new(database),
        config.retrieval.clone(),
        config.llm.temperature(),
        config.llm.max_tokens(),
    ))
}

//! Retriever
//!
//! Embeds the question once, then runs three independent top-k searches.
//! No cross-collection re-ranking: each prompt section keeps its own
//! collection's ordering. Stored example pairs are JSON
//! `{"question", "sql"}` blobs; anything unparseable is skipped with a
//! warning rather than poisoning the whole bundle.

use serde::Deserialize;
use sibyl_config::RetrievalConfig;
use sibyl_core::{CollectionKind, ContextBundle, ScoredExample, SibylResult};
use sibyl_store::ContextStore;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct StoredExample {
    question: String,
    sql: String,
}

/// Gather per-question context from all three collections
pub async fn retrieve(
    store: &ContextStore,
    question: &str,
    config: &RetrievalConfig,
) -> SibylResult<ContextBundle> {
    let query = store.embedder().embed(question).await?;

    let ddl = store.search_embedded(&query, CollectionKind::Ddl, config.n_results_ddl)?;
    let docs = store.search_embedded(
        &query,
        CollectionKind::Documentation,
        config.n_results_documentation,
    )?;
    let raw_examples =
        store.search_embedded(&query, CollectionKind::SqlExamples, config.n_results_sql)?;

    let mut examples = Vec::with_capacity(raw_examples.len());
    for item in raw_examples {
        match serde_json::from_str::<StoredExample>(&item.record.content) {
            Ok(pair) => examples.push(ScoredExample {
                question: pair.question,
                sql: pair.sql,
                score: item.score,
            }),
            Err(e) => {
                warn!(id = %item.record.id, error = %e, "Skipping malformed example pair");
            }
        }
    }

    let bundle = ContextBundle { ddl, docs, examples };
    debug!(
        ddl = bundle.ddl.len(),
        docs = bundle.docs.len(),
        examples = bundle.examples.len(),
        "Retrieved context"
    );
    Ok(bundle)
}

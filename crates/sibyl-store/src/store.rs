//! The context store: insert, search, audit and removal
//!
//! Owns all durable `ContextRecord` state. The retriever only reads;
//! the training path only appends. Records are immutable once inserted
//! except for collection-level deletion.

use std::sync::Arc;

use rusqlite::params;
use sibyl_core::{
    CollectionKind, ContextRecord, EmbeddingProvider, ScoredRecord, SibylError, SibylResult,
};
use tracing::{debug, info};

use crate::connection::StorePool;
use crate::error::StoreError;
use crate::similarity::{cosine_similarity, decode_vector, encode_vector};

/// SQLite-backed context index with brute-force cosine search
pub struct ContextStore {
    pool: StorePool,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl ContextStore {
    /// Open (or create) the index at the given path
    pub fn open(
        path: impl AsRef<std::path::Path>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> SibylResult<Self> {
        let pool = StorePool::open(path).map_err(SibylError::from)?;
        Ok(Self { pool, embedder })
    }

    /// In-memory index for tests
    pub fn memory(embedder: Arc<dyn EmbeddingProvider>) -> SibylResult<Self> {
        let pool = StorePool::memory().map_err(SibylError::from)?;
        Ok(Self { pool, embedder })
    }

    /// The embedding provider backing this index
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Embed `text` and append it to `collection`, returning the new id.
    ///
    /// Rejects malformed provider output (wrong dimensionality, non-finite
    /// components) and inserts from a different embedding model than the
    /// one the collection was built with.
    pub async fn insert(
        &self,
        text: &str,
        collection: CollectionKind,
        metadata: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> SibylResult<String> {
        let vector = self.embedder.embed(text).await?;
        self.validate_vector(&vector)?;
        self.guard_model_fingerprint(collection)?;

        let id = uuid::Uuid::new_v4().to_string();
        let metadata_json = metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| SibylError::Store(e.to_string()))?;
        let blob = encode_vector(&vector);
        let model = self.embedder.model_name().to_string();
        let dims = vector.len() as i64;

        self.pool
            .with_connection(|conn| {
                conn.execute(
                    "INSERT INTO context_records
                     (id, collection, content, metadata, embedding, embedding_model, dims)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![id, collection.as_str(), text, metadata_json, blob, model, dims],
                )?;
                Ok(())
            })
            .map_err(SibylError::from)?;

        debug!(%collection, %id, chars = text.len(), "Inserted context record");
        Ok(id)
    }

    /// Embed the question and return its top-k nearest records.
    ///
    /// An empty collection yields an empty vec; `k == 0` is a caller error.
    pub async fn search(
        &self,
        question: &str,
        collection: CollectionKind,
        k: usize,
    ) -> SibylResult<Vec<ScoredRecord>> {
        if k == 0 {
            return Err(SibylError::InvalidArgument(
                "search requires k > 0".to_string(),
            ));
        }
        let query = self.embedder.embed(question).await?;
        self.search_embedded(&query, collection, k)
    }

    /// Top-k nearest records for an already-computed query embedding.
    ///
    /// Lets the retriever embed the question once and search all three
    /// collections with the same vector.
    pub fn search_embedded(
        &self,
        query: &[f32],
        collection: CollectionKind,
        k: usize,
    ) -> SibylResult<Vec<ScoredRecord>> {
        if k == 0 {
            return Err(SibylError::InvalidArgument(
                "search requires k > 0".to_string(),
            ));
        }

        let mut scored = self
            .pool
            .with_connection(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, collection, content, metadata, embedding_model, created_at, embedding
                     FROM context_records WHERE collection = ?1 ORDER BY rowid",
                )?;
                let rows = stmt.query_map([collection.as_str()], |row| {
                    let blob: Vec<u8> = row.get(6)?;
                    Ok((row_to_record(row)?, blob))
                })?;

                let mut scored = Vec::new();
                for row in rows {
                    let (record, blob) = row?;
                    let vector = decode_vector(&blob);
                    let score = cosine_similarity(query, &vector);
                    scored.push(ScoredRecord { record, score });
                }
                Ok(scored)
            })
            .map_err(SibylError::from)?;

        // Stable sort: equal scores keep insertion (rowid) order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    /// Delete every record in `collection`. Idempotent.
    pub fn remove_collection(&self, collection: CollectionKind) -> SibylResult<()> {
        let removed = self
            .pool
            .with_connection(|conn| {
                Ok(conn.execute(
                    "DELETE FROM context_records WHERE collection = ?1",
                    [collection.as_str()],
                )?)
            })
            .map_err(SibylError::from)?;
        info!(%collection, removed, "Removed collection");
        Ok(())
    }

    /// List records for audit; never returns vectors
    pub fn list_all(&self, collection: Option<CollectionKind>) -> SibylResult<Vec<ContextRecord>> {
        self.pool
            .with_connection(|conn| {
                // Vector-free projection: the listing API never exposes
                // embeddings, so the blob is not even fetched
                let sql_all =
                    "SELECT id, collection, content, metadata, embedding_model, created_at
                     FROM context_records ORDER BY rowid";
                let sql_one =
                    "SELECT id, collection, content, metadata, embedding_model, created_at
                     FROM context_records WHERE collection = ?1 ORDER BY rowid";

                let mut records = Vec::new();
                match collection {
                    Some(kind) => {
                        let mut stmt = conn.prepare(sql_one)?;
                        let rows = stmt.query_map([kind.as_str()], row_to_record)?;
                        for row in rows {
                            records.push(row?);
                        }
                    }
                    None => {
                        let mut stmt = conn.prepare(sql_all)?;
                        let rows = stmt.query_map([], row_to_record)?;
                        for row in rows {
                            records.push(row?);
                        }
                    }
                }
                Ok(records)
            })
            .map_err(SibylError::from)
    }

    /// Number of records, optionally scoped to one collection
    pub fn count(&self, collection: Option<CollectionKind>) -> SibylResult<usize> {
        self.pool
            .with_connection(|conn| {
                let count: i64 = match collection {
                    Some(kind) => conn.query_row(
                        "SELECT COUNT(*) FROM context_records WHERE collection = ?1",
                        [kind.as_str()],
                        |row| row.get(0),
                    )?,
                    None => conn.query_row("SELECT COUNT(*) FROM context_records", [], |row| {
                        row.get(0)
                    })?,
                };
                Ok(count as usize)
            })
            .map_err(SibylError::from)
    }

    fn validate_vector(&self, vector: &[f32]) -> SibylResult<()> {
        if vector.is_empty() {
            return Err(SibylError::Embedding(
                "provider returned an empty vector".to_string(),
            ));
        }
        let expected = self.embedder.dimensions();
        if vector.len() != expected {
            return Err(SibylError::Embedding(format!(
                "provider returned {} dimensions, expected {expected}",
                vector.len()
            )));
        }
        if vector.iter().any(|c| !c.is_finite()) {
            return Err(SibylError::Embedding(
                "provider returned non-finite components".to_string(),
            ));
        }
        Ok(())
    }

    /// A collection is bound to the embedding model of its first record;
    /// mixing models within one collection is rejected.
    fn guard_model_fingerprint(&self, collection: CollectionKind) -> SibylResult<()> {
        let existing: Option<String> = self
            .pool
            .with_connection(|conn| {
                let model = conn
                    .query_row(
                        "SELECT embedding_model FROM context_records
                         WHERE collection = ?1 LIMIT 1",
                        [collection.as_str()],
                        |row| row.get(0),
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(StoreError::from(other)),
                    })?;
                Ok(model)
            })
            .map_err(SibylError::from)?;

        if let Some(model) = existing {
            if model != self.embedder.model_name() {
                return Err(SibylError::Embedding(format!(
                    "collection '{collection}' was embedded with '{model}', \
                     current provider is '{}'; reset the collection before re-training",
                    self.embedder.model_name()
                )));
            }
        }
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContextRecord> {
    let collection_name: String = row.get(1)?;
    let collection = CollectionKind::parse(&collection_name).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown collection '{collection_name}'").into(),
        )
    })?;
    let metadata_json: Option<String> = row.get(3)?;
    let metadata = metadata_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
    let created_at_raw: String = row.get(5)?;
    let created_at = chrono::NaiveDateTime::parse_from_str(&created_at_raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|_| chrono::Utc::now());

    Ok(ContextRecord {
        id: row.get(0)?,
        collection,
        content: row.get(2)?,
        metadata,
        embedding_model: row.get(4)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic test embedder: maps known phrases to fixed unit
    /// vectors, everything else to a fallback direction.
    struct StubEmbedder {
        model: &'static str,
    }

    impl StubEmbedder {
        fn new() -> Self {
            Self { model: "stub-embed-v1" }
        }

        fn vector_for(text: &str) -> Vec<f32> {
            match text {
                t if t.contains("order") || t.contains("订单") => vec![1.0, 0.0, 0.0, 0.0],
                t if t.contains("salary") || t.contains("薪资") => vec![0.0, 1.0, 0.0, 0.0],
                t if t.contains("customer") => vec![0.0, 0.0, 1.0, 0.0],
                _ => vec![0.0, 0.0, 0.0, 1.0],
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> SibylResult<Vec<f32>> {
            Ok(Self::vector_for(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> SibylResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn model_name(&self) -> &str {
            self.model
        }
    }

    fn store() -> ContextStore {
        ContextStore::memory(Arc::new(StubEmbedder::new())).unwrap()
    }

    #[tokio::test]
    async fn insert_and_search_ranks_by_similarity() {
        let store = store();
        store
            .insert("CREATE TABLE orders (id INTEGER)", CollectionKind::Ddl, None)
            .await
            .unwrap();
        store
            .insert("CREATE TABLE employees (salary REAL)", CollectionKind::Ddl, None)
            .await
            .unwrap();

        let results = store
            .search("how many orders are there", CollectionKind::Ddl, 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].record.content.contains("orders"));
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn search_respects_k_bound() {
        let store = store();
        for i in 0..5 {
            store
                .insert(
                    &format!("orders document {i}"),
                    CollectionKind::Documentation,
                    None,
                )
                .await
                .unwrap();
        }
        let results = store
            .search("orders", CollectionKind::Documentation, 3)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn equal_scores_keep_insertion_order() {
        let store = store();
        let first = store
            .insert("orders alpha", CollectionKind::Documentation, None)
            .await
            .unwrap();
        let second = store
            .insert("orders beta", CollectionKind::Documentation, None)
            .await
            .unwrap();

        let results = store
            .search("orders", CollectionKind::Documentation, 2)
            .await
            .unwrap();
        assert_eq!(results[0].record.id, first);
        assert_eq!(results[1].record.id, second);
    }

    #[tokio::test]
    async fn empty_collection_returns_empty_not_error() {
        let store = store();
        let results = store
            .search("anything", CollectionKind::SqlExamples, 10)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn zero_k_is_invalid_argument() {
        let store = store();
        let err = store
            .search("anything", CollectionKind::Ddl, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SibylError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn remove_collection_is_isolated_and_idempotent() {
        let store = store();
        store
            .insert("CREATE TABLE t (id INTEGER)", CollectionKind::Ddl, None)
            .await
            .unwrap();
        store
            .insert("orders are completed or pending", CollectionKind::Documentation, None)
            .await
            .unwrap();
        store
            .insert(
                "Q: how many orders?\nSQL: SELECT COUNT(*) FROM orders",
                CollectionKind::SqlExamples,
                None,
            )
            .await
            .unwrap();

        store.remove_collection(CollectionKind::Ddl).unwrap();
        assert_eq!(store.count(Some(CollectionKind::Ddl)).unwrap(), 0);
        assert_eq!(store.count(Some(CollectionKind::Documentation)).unwrap(), 1);
        assert_eq!(store.count(Some(CollectionKind::SqlExamples)).unwrap(), 1);

        // Removing again is a no-op, not an error
        store.remove_collection(CollectionKind::Ddl).unwrap();
    }

    #[tokio::test]
    async fn list_all_returns_metadata_without_vectors() {
        let store = store();
        let mut meta = serde_json::Map::new();
        meta.insert("table".to_string(), serde_json::json!("orders"));
        store
            .insert("CREATE TABLE orders (id INTEGER)", CollectionKind::Ddl, Some(meta))
            .await
            .unwrap();

        let records = store.list_all(None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].collection, CollectionKind::Ddl);
        assert_eq!(
            records[0].metadata.as_ref().unwrap().get("table").unwrap(),
            "orders"
        );
        assert_eq!(records[0].embedding_model, "stub-embed-v1");
    }

    #[tokio::test]
    async fn mixed_embedding_models_rejected() {
        let embedder_a = Arc::new(StubEmbedder { model: "model-a" });
        let store = ContextStore::memory(embedder_a).unwrap();
        store
            .insert("orders doc", CollectionKind::Documentation, None)
            .await
            .unwrap();

        // Same pool, different model fingerprint
        let store_b = ContextStore {
            pool: store.pool.clone(),
            embedder: Arc::new(StubEmbedder { model: "model-b" }),
        };
        let err = store_b
            .insert("another doc", CollectionKind::Documentation, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SibylError::Embedding(_)));

        // A different collection is still open for the new model
        store_b
            .insert("CREATE TABLE t (id INTEGER)", CollectionKind::Ddl, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.db");

        {
            let store =
                ContextStore::open(&path, Arc::new(StubEmbedder::new())).unwrap();
            store
                .insert("orders doc", CollectionKind::Documentation, None)
                .await
                .unwrap();
        }

        let reopened = ContextStore::open(&path, Arc::new(StubEmbedder::new())).unwrap();
        assert_eq!(reopened.count(None).unwrap(), 1);
    }
}

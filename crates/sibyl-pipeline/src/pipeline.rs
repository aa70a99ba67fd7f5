//! Pipeline orchestrator
//!
//! Owns the wired-together services and exposes the two public surfaces:
//! `ask` for one question-to-result turn and the `train_*` family for
//! maintaining the context index. Stages run strictly sequentially; a
//! failure at any stage surfaces immediately and leaves the store
//! untouched.

use std::sync::Arc;

use sibyl_config::RetrievalConfig;
use sibyl_core::{
    AskOutcome, ChatProvider, CollectionKind, GenerationRequest, SibylError, SibylResult,
};
use sibyl_db::Database;
use sibyl_store::ContextStore;
use tracing::{info, instrument};

use crate::prompt::assemble_prompt;
use crate::retrieve::retrieve;
use crate::sanitize::sanitize_response;

/// Per-collection record counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingStats {
    pub ddl: usize,
    pub documentation: usize,
    pub sql_examples: usize,
}

/// The assembled question-to-SQL engine
pub struct SqlPipeline {
    store: Arc<ContextStore>,
    chat: Arc<dyn ChatProvider>,
    database: Arc<Database>,
    retrieval: RetrievalConfig,
    temperature: f32,
    max_tokens: u32,
}

impl SqlPipeline {
    pub fn new(
        store: Arc<ContextStore>,
        chat: Arc<dyn ChatProvider>,
        database: Arc<Database>,
        retrieval: RetrievalConfig,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            store,
            chat,
            database,
            retrieval,
            temperature,
            max_tokens,
        }
    }

    /// Answer one natural-language question.
    ///
    /// Retrieval, generation, sanitization and execution run in order;
    /// a sanitized completion with no SQL left in it short-circuits to
    /// `AskOutcome::NoSql` without touching the database.
    #[instrument(skip(self), fields(model = self.chat.model()))]
    pub async fn ask(&self, question: &str) -> SibylResult<AskOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SibylError::InvalidArgument(
                "question must not be empty".to_string(),
            ));
        }

        let bundle = retrieve(&self.store, question, &self.retrieval).await?;
        let prompt = assemble_prompt(&bundle, question, self.retrieval.max_prompt_chars);

        let raw = self
            .chat
            .submit(GenerationRequest {
                prompt,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
            .await?;

        let sql = sanitize_response(&raw);
        if sql.is_empty() {
            info!("Backend produced no SQL after sanitization");
            return Ok(AskOutcome::NoSql { raw });
        }

        info!(%sql, "Executing generated SQL");
        let result = self.database.execute(&sql).await.map_err(SibylError::from)?;
        info!(rows = result.row_count, "Query answered");
        Ok(AskOutcome::Answered(result))
    }

    /// Index one CREATE statement
    pub async fn train_ddl(&self, ddl: &str) -> SibylResult<String> {
        self.store.insert(ddl, CollectionKind::Ddl, None).await
    }

    /// Index one business-rule / documentation snippet
    pub async fn train_documentation(&self, text: &str) -> SibylResult<String> {
        self.store
            .insert(text, CollectionKind::Documentation, None)
            .await
    }

    /// Index one worked question → SQL pair.
    ///
    /// The pair is embedded by its question text alone so retrieval
    /// matches question-to-question, and stored as a JSON blob the
    /// retriever unpacks.
    pub async fn train_example(&self, question: &str, sql: &str) -> SibylResult<String> {
        let content = serde_json::json!({
            "question": question,
            "sql": sql,
        })
        .to_string();
        self.store
            .insert(&content, CollectionKind::SqlExamples, None)
            .await
    }

    /// Bootstrap the DDL corpus from the live database catalog, plus one
    /// dialect hint in the documentation corpus. Returns the number of
    /// CREATE statements indexed.
    pub async fn train_from_catalog(&self) -> SibylResult<usize> {
        let statements = self
            .database
            .schema_ddl()
            .await
            .map_err(SibylError::from)?;

        let mut source = serde_json::Map::new();
        source.insert("source".to_string(), serde_json::json!("catalog"));

        for ddl in &statements {
            self.store
                .insert(ddl, CollectionKind::Ddl, Some(source.clone()))
                .await?;
        }

        let hint = format!("All SQL must use the {} dialect.", self.database.dialect());
        self.store
            .insert(&hint, CollectionKind::Documentation, Some(source))
            .await?;

        info!(statements = statements.len(), "Indexed database catalog");
        Ok(statements.len())
    }

    /// Drop one collection, or all three when `None`
    pub fn reset(&self, collection: Option<CollectionKind>) -> SibylResult<()> {
        match collection {
            Some(kind) => self.store.remove_collection(kind),
            None => {
                for kind in CollectionKind::ALL {
                    self.store.remove_collection(kind)?;
                }
                Ok(())
            }
        }
    }

    /// Per-collection record counts
    pub fn training_stats(&self) -> SibylResult<TrainingStats> {
        Ok(TrainingStats {
            ddl: self.store.count(Some(CollectionKind::Ddl))?,
            documentation: self.store.count(Some(CollectionKind::Documentation))?,
            sql_examples: self.store.count(Some(CollectionKind::SqlExamples))?,
        })
    }
}

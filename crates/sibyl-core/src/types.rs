//! Data types flowing through the pipeline
//!
//! The durable type is [`ContextRecord`], owned by the context store.
//! Everything else ([`ContextBundle`], [`GenerationRequest`],
//! [`QueryResult`]) is ephemeral, created and discarded within one
//! question turn.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three context corpora, each a separately versioned collection
/// sharing one embedding space.
///
/// Kept as a closed enum: the corpora have distinct retrieval semantics
/// (schema lookup vs. prose rules vs. few-shot analogy) and are sized and
/// truncated into the prompt independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// `CREATE TABLE` statements describing the schema
    Ddl,
    /// Prose business documentation
    Documentation,
    /// Verified question → SQL example pairs
    SqlExamples,
}

impl CollectionKind {
    /// All collections in their fixed rendering order
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Ddl,
        CollectionKind::Documentation,
        CollectionKind::SqlExamples,
    ];

    /// Stable storage name for this collection
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Ddl => "ddl",
            CollectionKind::Documentation => "documentation",
            CollectionKind::SqlExamples => "sql_examples",
        }
    }

    /// Parse a storage name back into a collection
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ddl" => Some(CollectionKind::Ddl),
            "documentation" => Some(CollectionKind::Documentation),
            "sql_examples" => Some(CollectionKind::SqlExamples),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One indexed context item. Immutable once inserted except for deletion.
///
/// The embedding vector lives beside the record inside the store and is
/// never exposed through listing APIs; `embedding_model` fingerprints the
/// model that produced it so mixed-model collections are rejected at
/// insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRecord {
    /// Unique stable identifier (UUID v4)
    pub id: String,
    /// Which corpus this record belongs to
    pub collection: CollectionKind,
    /// The raw text that was embedded
    pub content: String,
    /// Optional caller-supplied metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    /// Embedding model fingerprint recorded at insert time
    pub embedding_model: String,
    /// Insert timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A record paired with its similarity score for one query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: ContextRecord,
    /// Cosine similarity against the query embedding, higher is closer
    pub score: f32,
}

/// A retrieved question → SQL example pair with its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredExample {
    pub question: String,
    pub sql: String,
    pub score: f32,
}

/// Per-question retrieval result: top-k from each collection, ordered by
/// descending score within each section. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ContextBundle {
    pub ddl: Vec<ScoredRecord>,
    pub docs: Vec<ScoredRecord>,
    pub examples: Vec<ScoredExample>,
}

impl ContextBundle {
    /// True when no collection produced any context
    pub fn is_empty(&self) -> bool {
        self.ddl.is_empty() && self.docs.is_empty() && self.examples.is_empty()
    }

    /// Total number of retrieved items across all sections
    pub fn len(&self) -> usize {
        self.ddl.len() + self.docs.len() + self.examples.len()
    }
}

/// One rendered prompt plus generation parameters. Constructed once per
/// question, consumed once by the backend. The model is fixed at provider
/// construction, not per call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The fully rendered prompt, instructions through question
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// A single cell value from an executed query.
///
/// Closed over what SQLite and MySQL can hand back through the adapter;
/// anything the driver cannot decode more precisely arrives as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(v) => write!(f, "{v}"),
            SqlValue::Real(v) => write!(f, "{v}"),
            SqlValue::Text(v) => f.write_str(v),
            SqlValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// Tabular result of executing generated SQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The SQL that was executed
    pub sql: String,
    /// Column names in select order
    pub columns: Vec<String>,
    /// Row values, one vec per row, aligned with `columns`
    pub rows: Vec<Vec<SqlValue>>,
    /// Number of rows returned
    pub row_count: usize,
}

/// Terminal state of one `ask` turn.
///
/// `NoSql` is a normal outcome, not an error: the model produced no SQL
/// after sanitization. A query that executed and returned zero rows is
/// `Answered` with an empty `rows`.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// SQL was generated and executed
    Answered(QueryResult),
    /// Sanitization left nothing executable; carries the raw completion
    /// for diagnostics
    NoSql {
        /// The backend's unsanitized output
        raw: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for kind in CollectionKind::ALL {
            assert_eq!(CollectionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(CollectionKind::parse("unknown"), None);
    }

    #[test]
    fn bundle_emptiness() {
        let bundle = ContextBundle::default();
        assert!(bundle.is_empty());
        assert_eq!(bundle.len(), 0);
    }

    #[test]
    fn sql_value_display() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::Integer(42).to_string(), "42");
        assert_eq!(SqlValue::Text("已完成".to_string()).to_string(), "已完成");
        assert_eq!(SqlValue::Blob(vec![0u8; 3]).to_string(), "<3 bytes>");
    }
}

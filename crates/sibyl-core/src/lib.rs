//! Core abstractions for Sibyl's question-to-SQL pipeline
//!
//! This crate defines the shared vocabulary of the workspace:
//! - Data types that flow through the pipeline ([`types`])
//! - The error taxonomy every crate maps into ([`error`])
//! - Traits for the external collaborators, embedding and text
//!   generation providers ([`traits`])
//!
//! Infrastructure crates (store, llm, db) depend on this crate for trait
//! definitions; the pipeline orchestrates through the traits and never
//! depends on a concrete provider.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{SibylError, SibylResult};
pub use traits::{ChatProvider, EmbeddingProvider};
pub use types::{
    AskOutcome, CollectionKind, ContextBundle, ContextRecord, GenerationRequest, QueryResult,
    ScoredExample, ScoredRecord, SqlValue,
};

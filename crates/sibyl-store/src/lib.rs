//! Durable context index for Sibyl
//!
//! Three collections (ddl, documentation, sql_examples) of
//! (text, vector, metadata) records with nearest-neighbor search, backed
//! by a single SQLite file. Vectors are stored as little-endian f32
//! blobs and scored with brute-force cosine similarity over the whole
//! collection.
//!
//! Writes happen only on the training path; the query path is read-only.
//! Each insert is additive (no in-place record mutation), so concurrent
//! inserts cannot corrupt a collection, and a search racing an insert may
//! or may not observe the new record.

pub mod connection;
pub mod error;
pub mod schema;
pub mod similarity;
pub mod store;

pub use connection::StorePool;
pub use error::{StoreError, StoreResult};
pub use store::ContextStore;

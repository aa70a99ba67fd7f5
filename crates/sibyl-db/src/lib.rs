//! Execution adapter for generated SQL
//!
//! A thin, dialect-closed wrapper over a rusqlite connection (SQLite)
//! or an sqlx pool (MySQL). The adapter runs the
//! sanitized SQL exactly as given and decodes whatever comes back into
//! dialect-neutral [`sibyl_core::QueryResult`] values; it never rewrites,
//! validates or explains queries.

mod database;
mod error;

pub use database::Database;
pub use error::{DbError, DbResult};

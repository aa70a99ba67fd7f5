//! Error taxonomy for the question-to-SQL pipeline
//!
//! Every failure the pipeline can surface maps into [`SibylError`]. The
//! variants mirror the pipeline's trust boundaries: embedding provider,
//! generation backend, context store, execution adapter, configuration.
//!
//! Two rules hold everywhere:
//! - No variant is retried automatically; retry policy belongs to callers.
//! - An empty sanitized completion is *not* an error; it is the
//!   `AskOutcome::NoSql` terminal state, distinct from a query that ran
//!   and returned zero rows.

use thiserror::Error;

/// Result type for pipeline operations
pub type SibylResult<T> = Result<T, SibylError>;

/// Pipeline error taxonomy
#[derive(Error, Debug)]
pub enum SibylError {
    /// Embedding provider unreachable or returned malformed output
    /// (wrong dimensionality, non-finite components)
    #[error("Embedding provider error: {0}")]
    Embedding(String),

    /// Generation backend unreachable or rejected the request
    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Generation backend exceeded the configured deadline
    #[error("Generation backend timed out after {timeout_secs}s")]
    BackendTimeout {
        /// The deadline that was exceeded
        timeout_secs: u64,
    },

    /// Caller programming error (e.g. `k <= 0` on a search)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The database rejected the generated SQL; carries the offending
    /// statement verbatim for diagnostics
    #[error("SQL execution failed: {message}\n  while running: {sql}")]
    Execution {
        /// Database-reported error, unmodified
        message: String,
        /// The exact SQL string that failed
        sql: String,
    },

    /// Context store failure (connection, schema, serialization)
    #[error("Context store error: {0}")]
    Store(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SibylError {
    /// Build an execution error that carries the failing SQL
    pub fn execution(message: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            sql: sql.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_display_includes_sql() {
        let err = SibylError::execution("no such table: nonexistent_table", "SELECT * FROM nonexistent_table");
        let rendered = err.to_string();
        assert!(rendered.contains("SELECT * FROM nonexistent_table"));
        assert!(rendered.contains("no such table"));
    }

    #[test]
    fn timeout_error_reports_deadline() {
        let err = SibylError::BackendTimeout { timeout_secs: 30 };
        assert!(err.to_string().contains("30s"));
    }
}

//! Execution adapter errors

use sibyl_core::SibylError;
use thiserror::Error;

/// Result type for adapter operations
pub type DbResult<T> = Result<T, DbError>;

/// Execution adapter errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Could not reach or open the configured database
    #[error("failed to connect to {dialect} database: {message}")]
    Connect {
        /// "sqlite" or "mysql"
        dialect: &'static str,
        /// Driver-reported failure
        message: String,
    },

    /// A statement failed; carries the SQL verbatim
    #[error("{message}")]
    Execute {
        /// Database-reported error, unmodified
        message: String,
        /// The exact SQL string that failed
        sql: String,
    },
}

impl DbError {
    pub(crate) fn execute(err: impl std::fmt::Display, sql: &str) -> Self {
        DbError::Execute {
            message: err.to_string(),
            sql: sql.to_string(),
        }
    }
}

impl From<DbError> for SibylError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connect { .. } => SibylError::Config(err.to_string()),
            DbError::Execute { message, sql } => SibylError::Execution { message, sql },
        }
    }
}

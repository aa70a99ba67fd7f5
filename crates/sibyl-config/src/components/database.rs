//! User database connection configuration
//!
//! A closed tagged variant: the database kind is resolved once at
//! connection-setup time, never re-dispatched per query.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Where generated SQL gets executed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// Local file-backed SQLite database
    Sqlite {
        /// Path to the database file
        #[serde(default = "default_sqlite_path")]
        path: String,
    },
    /// Networked MySQL server
    Mysql {
        #[serde(default = "default_mysql_host")]
        host: String,
        #[serde(default = "default_mysql_port")]
        port: u16,
        #[serde(default = "default_mysql_user")]
        user: String,
        #[serde(default)]
        password: String,
        database: String,
    },
}

fn default_sqlite_path() -> String {
    defaults::DEFAULT_SQLITE_PATH.to_string()
}

fn default_mysql_host() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> u16 {
    defaults::DEFAULT_MYSQL_PORT
}

fn default_mysql_user() -> String {
    "root".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

impl DatabaseConfig {
    /// SQL dialect hint for the documentation corpus ("sqlite" / "mysql")
    pub fn dialect(&self) -> &'static str {
        match self {
            DatabaseConfig::Sqlite { .. } => "sqlite",
            DatabaseConfig::Mysql { .. } => "mysql",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_defaults() {
        let config: DatabaseConfig = toml::from_str(r#"kind = "sqlite""#).unwrap();
        assert_eq!(
            config,
            DatabaseConfig::Sqlite {
                path: "demo.db".to_string()
            }
        );
    }

    #[test]
    fn mysql_requires_database_name() {
        assert!(toml::from_str::<DatabaseConfig>(r#"kind = "mysql""#).is_err());
        let config: DatabaseConfig =
            toml::from_str("kind = \"mysql\"\ndatabase = \"sales\"").unwrap();
        match config {
            DatabaseConfig::Mysql { port, user, .. } => {
                assert_eq!(port, 3306);
                assert_eq!(user, "root");
            }
            other => panic!("expected mysql, got {other:?}"),
        }
    }
}

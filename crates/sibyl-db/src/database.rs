//! Dialect-closed database handle
//!
//! The dialect is resolved once at connection time; every later call
//! matches on the already-open handle. SQLite runs through rusqlite
//! (the same binding the context index links), MySQL through sqlx.
//! Generated SQL is executed verbatim, so a failing statement surfaces
//! the database's own error message together with the exact SQL that
//! caused it.

use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::types::ValueRef as SqliteValueRef;
use rusqlite::{Connection, OpenFlags};
use sibyl_config::DatabaseConfig;
use sibyl_core::{QueryResult, SqlValue};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// An open handle to the user's database
#[derive(Debug)]
pub enum Database {
    Sqlite(Arc<Mutex<Connection>>),
    Mysql(MySqlPool),
}

impl Database {
    /// Connect according to the configured kind.
    ///
    /// An absent SQLite file is a connect error, not silently created;
    /// pointing the assistant at a typo'd path should fail loudly.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::Sqlite { path } => {
                let conn = Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
                )
                .map_err(|e| DbError::Connect {
                    dialect: "sqlite",
                    message: e.to_string(),
                })?;
                info!(path = %path, "Connected to sqlite database");
                Ok(Database::Sqlite(Arc::new(Mutex::new(conn))))
            }
            DatabaseConfig::Mysql {
                host,
                port,
                user,
                password,
                database,
            } => {
                let options = MySqlConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .password(password)
                    .database(database);
                let pool = MySqlPoolOptions::new()
                    .max_connections(4)
                    .connect_with(options)
                    .await
                    .map_err(|e| DbError::Connect {
                        dialect: "mysql",
                        message: e.to_string(),
                    })?;
                info!(host = %host, port = %port, database = %database, "Connected to mysql database");
                Ok(Database::Mysql(pool))
            }
        }
    }

    /// In-memory SQLite handle for tests
    pub async fn sqlite_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DbError::Connect {
            dialect: "sqlite",
            message: e.to_string(),
        })?;
        Ok(Database::Sqlite(Arc::new(Mutex::new(conn))))
    }

    /// SQL dialect hint ("sqlite" / "mysql")
    pub fn dialect(&self) -> &'static str {
        match self {
            Database::Sqlite(_) => "sqlite",
            Database::Mysql(_) => "mysql",
        }
    }

    /// Run one statement and decode the full result set.
    ///
    /// Zero rows is a normal result. SQLite reports column names even
    /// for an empty result set; MySQL only once a row came back.
    pub async fn execute(&self, sql: &str) -> DbResult<QueryResult> {
        debug!(dialect = self.dialect(), sql, "Executing statement");
        let (columns, rows) = match self {
            Database::Sqlite(conn) => sqlite_execute(&conn.lock(), sql)?,
            Database::Mysql(pool) => {
                let fetched = sqlx::query(sql)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| DbError::execute(e, sql))?;
                let columns = fetched
                    .first()
                    .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
                    .unwrap_or_default();
                let mut rows = Vec::with_capacity(fetched.len());
                for row in &fetched {
                    rows.push(mysql_row_values(row, sql)?);
                }
                (columns, rows)
            }
        };

        let row_count = rows.len();
        Ok(QueryResult {
            sql: sql.to_string(),
            columns,
            rows,
            row_count,
        })
    }

    /// Extract CREATE statements from the catalog, for bootstrapping the
    /// DDL corpus from an existing database.
    pub async fn schema_ddl(&self) -> DbResult<Vec<String>> {
        match self {
            Database::Sqlite(conn) => {
                let sql = "SELECT sql FROM sqlite_master \
                           WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' \
                           ORDER BY rowid";
                let conn = conn.lock();
                let mut stmt = conn.prepare(sql).map_err(|e| DbError::execute(e, sql))?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .map_err(|e| DbError::execute(e, sql))?;
                rows.collect::<Result<Vec<_>, _>>()
                    .map_err(|e| DbError::execute(e, sql))
            }
            Database::Mysql(pool) => {
                let show_tables = "SHOW TABLES";
                let tables = sqlx::query(show_tables)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| DbError::execute(e, show_tables))?;

                let mut statements = Vec::with_capacity(tables.len());
                for row in &tables {
                    let table: String = row
                        .try_get(0)
                        .map_err(|e| DbError::execute(e, show_tables))?;
                    let show_create = format!("SHOW CREATE TABLE `{table}`");
                    let create_row = sqlx::query(&show_create)
                        .fetch_one(pool)
                        .await
                        .map_err(|e| DbError::execute(e, &show_create))?;
                    // Column 0 is the table name, column 1 the statement
                    let ddl: String = create_row
                        .try_get(1)
                        .map_err(|e| DbError::execute(e, &show_create))?;
                    statements.push(ddl);
                }
                Ok(statements)
            }
        }
    }
}

fn sqlite_execute(conn: &Connection, sql: &str) -> DbResult<(Vec<String>, Vec<Vec<SqlValue>>)> {
    let mut stmt = conn.prepare(sql).map_err(|e| DbError::execute(e, sql))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let mut rows = Vec::new();
    let mut raw_rows = stmt.query([]).map_err(|e| DbError::execute(e, sql))?;
    while let Some(row) = raw_rows.next().map_err(|e| DbError::execute(e, sql))? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            let value = match row.get_ref(i).map_err(|e| DbError::execute(e, sql))? {
                SqliteValueRef::Null => SqlValue::Null,
                SqliteValueRef::Integer(v) => SqlValue::Integer(v),
                SqliteValueRef::Real(v) => SqlValue::Real(v),
                SqliteValueRef::Text(bytes) => {
                    SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
                }
                SqliteValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
            };
            values.push(value);
        }
        rows.push(values);
    }
    Ok((columns, rows))
}

fn mysql_row_values(row: &MySqlRow, sql: &str) -> DbResult<Vec<SqlValue>> {
    let mut values = Vec::with_capacity(row.columns().len());
    for i in 0..row.columns().len() {
        let raw = row.try_get_raw(i).map_err(|e| DbError::execute(e, sql))?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                    SqlValue::Integer(
                        row.try_get::<i64, _>(i).map_err(|e| DbError::execute(e, sql))?,
                    )
                }
                name if name.ends_with("UNSIGNED") => {
                    let unsigned = row
                        .try_get::<u64, _>(i)
                        .map_err(|e| DbError::execute(e, sql))?;
                    // Values above i64::MAX survive as text
                    match i64::try_from(unsigned) {
                        Ok(v) => SqlValue::Integer(v),
                        Err(_) => SqlValue::Text(unsigned.to_string()),
                    }
                }
                "FLOAT" => SqlValue::Real(f64::from(
                    row.try_get::<f32, _>(i).map_err(|e| DbError::execute(e, sql))?,
                )),
                "DOUBLE" => SqlValue::Real(
                    row.try_get::<f64, _>(i).map_err(|e| DbError::execute(e, sql))?,
                ),
                "DATE" => SqlValue::Text(
                    row.try_get::<chrono::NaiveDate, _>(i)
                        .map_err(|e| DbError::execute(e, sql))?
                        .to_string(),
                ),
                "TIME" => SqlValue::Text(
                    row.try_get::<chrono::NaiveTime, _>(i)
                        .map_err(|e| DbError::execute(e, sql))?
                        .to_string(),
                ),
                "DATETIME" => SqlValue::Text(
                    row.try_get::<chrono::NaiveDateTime, _>(i)
                        .map_err(|e| DbError::execute(e, sql))?
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                ),
                "TIMESTAMP" => SqlValue::Text(
                    row.try_get::<chrono::DateTime<chrono::Utc>, _>(i)
                        .map_err(|e| DbError::execute(e, sql))?
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                ),
                "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
                    SqlValue::Blob(
                        row.try_get::<Vec<u8>, _>(i)
                            .map_err(|e| DbError::execute(e, sql))?,
                    )
                }
                // CHAR/VARCHAR/TEXT/ENUM plus text-encoded types the
                // driver has no native mapping for (DECIMAL, JSON, BIT)
                _ => SqlValue::Text(
                    row.try_get_unchecked::<String, _>(i)
                        .map_err(|e| DbError::execute(e, sql))?,
                ),
            }
        };
        values.push(value);
    }
    Ok(values)
}

//! microdb - a minimal persistent SQL engine
//!
//! Parses a tiny SQL dialect (CREATE TABLE, INSERT, SELECT with a single
//! equality predicate, UPDATE, DELETE, DROP TABLE, SHOW TABLES,
//! DESCRIBE/DESC), validates statements against a schema registry, and
//! executes them against per-table row collections persisted as flat JSON
//! documents.
//!
//! ## Architecture
//! - SQL layer: hand-written lexer + recursive-descent parser + executor
//! - Storage layer: `Store` seam with JSON-file and in-memory backends
//! - Concurrency: per-table mutexes serialize each load-mutate-save pass
//!
//! ## Example
//! ```
//! use microdb::{MemoryStore, QueryExecutor};
//!
//! let db = QueryExecutor::new(MemoryStore::new());
//! db.execute("CREATE TABLE users (id NUMBER, name TEXT)")?;
//! db.execute("INSERT INTO users (id, name) VALUES (1, 'Ann')")?;
//! let result = db.execute("SELECT name FROM users WHERE id = 1")?;
//! assert_eq!(result.rows().unwrap().len(), 1);
//! # Ok::<(), microdb::DbError>(())
//! ```

pub mod config;
pub mod sql;
pub mod storage;
pub mod types;

mod error;

pub use config::DbConfig;
pub use error::{DbError, Result};
pub use sql::{QueryExecutor, QueryResult, Statement};
pub use storage::{JsonFileStore, MemoryStore, Store};
pub use types::{coerce, ColumnDef, Registry, Row, TableDef, Value};

/// Open a file-backed engine rooted at the configured data directory.
pub fn open(config: &DbConfig) -> Result<QueryExecutor<JsonFileStore>> {
    Ok(QueryExecutor::new(JsonFileStore::open(config)?))
}

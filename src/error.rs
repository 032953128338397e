//! Error types for the microdb engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unknown SQL command: {0}")]
    UnknownCommand(String),

    #[error("Table {0} does not exist")]
    TableNotFound(String),

    #[error("Table {0} already exists")]
    TableExists(String),

    #[error("INSERT into {table} lists {columns} column(s) but {values} value(s)")]
    ArityMismatch {
        table: String,
        columns: usize,
        values: usize,
    },
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

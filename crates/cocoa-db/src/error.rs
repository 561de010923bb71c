//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the database.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("failed to open database: {0}")]
    Open(String),

    /// Failed to execute a statement.
    #[error("statement failed: {0}")]
    Query(String),

    /// A transaction could not be committed or rolled back cleanly.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Failed to deserialize a row.
    #[error("deserialization error: {0}")]
    Deserialize(String),

    /// No rows returned when one was expected.
    #[error("no rows returned")]
    NotFound,
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::Deserialize(e.to_string())
    }
}

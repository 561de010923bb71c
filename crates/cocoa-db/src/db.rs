//! Database connection and query execution.

use crate::{DbError, QueryResult, Row, Value};
use serde::de::DeserializeOwned;

/// SQLite database connection.
///
/// Provides type-safe query execution with automatic result deserialization
/// and explicit transaction scoping.
pub struct Db {
    #[cfg(target_arch = "wasm32")]
    conn: spin_sdk::sqlite::Connection,
    #[cfg(not(target_arch = "wasm32"))]
    _phantom: std::marker::PhantomData<()>,
}

impl Db {
    /// Open the default SQLite database.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, DbError> {
        let conn = spin_sdk::sqlite::Connection::open_default()
            .map_err(|e| DbError::Open(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open a named SQLite database.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, DbError> {
        let conn =
            spin_sdk::sqlite::Connection::open(name).map_err(|e| DbError::Open(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Use this for INSERT, UPDATE, DELETE, CREATE TABLE, etc.
    #[cfg(target_arch = "wasm32")]
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<(), DbError> {
        let spin_params = to_spin_params(params);
        self.conn
            .execute(sql, spin_params.as_slice())
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    /// Execute a SQL query and return raw results.
    #[cfg(target_arch = "wasm32")]
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let spin_params = to_spin_params(params);
        let result = self
            .conn
            .execute(sql, spin_params.as_slice())
            .map_err(|e| DbError::Query(e.to_string()))?;

        let columns: Vec<String> = result.columns.iter().map(|c| c.to_string()).collect();

        let rows: Vec<Row> = result
            .rows
            .iter()
            .map(|row| {
                let values: Vec<Value> = row
                    .values
                    .iter()
                    .map(|v| match v {
                        spin_sdk::sqlite::Value::Null => Value::Null,
                        spin_sdk::sqlite::Value::Integer(i) => Value::Integer(*i),
                        spin_sdk::sqlite::Value::Real(f) => Value::Real(*f),
                        spin_sdk::sqlite::Value::Text(s) => Value::Text(s.clone()),
                        spin_sdk::sqlite::Value::Blob(b) => Value::Blob(b.clone()),
                    })
                    .collect();
                Row::new(columns.clone(), values)
            })
            .collect();

        Ok(QueryResult::new(columns, rows))
    }

    /// Execute a SQL query and deserialize results into a vector.
    pub fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError> {
        let result = self.query(sql, params)?;
        result.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns an error if no rows are returned.
    pub fn query_one<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<T, DbError> {
        let result = self.query(sql, params)?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    ///
    /// Returns `None` if no rows are returned.
    pub fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params)?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Get the rowid assigned by the most recent INSERT on this connection.
    pub fn last_insert_rowid(&self) -> Result<i64, DbError> {
        let result = self.query("SELECT last_insert_rowid() AS id", &[])?;
        result
            .first()
            .and_then(|row| row.get("id"))
            .and_then(Value::as_integer)
            .ok_or(DbError::NotFound)
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` returns `Ok`; rolls back every statement issued by
    /// `f` when it returns `Err`. The original error is preserved; a
    /// rollback failure is logged but not surfaced over it.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&Self) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        self.execute("BEGIN IMMEDIATE", &[])?;
        match f(self) {
            Ok(value) => {
                self.execute("COMMIT", &[])
                    .map_err(|e| DbError::Transaction(e.to_string()))?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.execute("ROLLBACK", &[]) {
                    tracing::error!(error = %rollback, "rollback failed after aborted transaction");
                }
                Err(e)
            }
        }
    }

    // Non-WASM stubs for development/testing
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, DbError> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(_name: &str) -> Result<Self, DbError> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn execute(&self, _sql: &str, _params: &[Value]) -> Result<(), DbError> {
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn query(&self, _sql: &str, _params: &[Value]) -> Result<QueryResult, DbError> {
        Ok(QueryResult::new(vec![], vec![]))
    }
}

#[cfg(target_arch = "wasm32")]
fn to_spin_params(params: &[Value]) -> Vec<spin_sdk::sqlite::Value> {
    params
        .iter()
        .map(|v| match v {
            Value::Null => spin_sdk::sqlite::Value::Null,
            Value::Integer(i) => spin_sdk::sqlite::Value::Integer(*i),
            Value::Real(f) => spin_sdk::sqlite::Value::Real(*f),
            Value::Text(s) => spin_sdk::sqlite::Value::Text(s.clone()),
            Value::Blob(b) => spin_sdk::sqlite::Value::Blob(b.clone()),
        })
        .collect()
}

//! Type-safe SQLite database layer for CocoaCraft.
//!
//! Provides a simple, ergonomic API for working with Spin's SQLite database
//! with type-safe query results and explicit transactions.
//!
//! # Example
//!
//! ```rust,ignore
//! use cocoa_db::{Db, params};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Product {
//!     id: i64,
//!     name: String,
//!     price_cents: i64,
//! }
//!
//! // In a server function
//! let db = Db::open_default()?;
//!
//! // Insert data
//! db.execute(
//!     "INSERT INTO products (name, price_cents) VALUES (?, ?)",
//!     params!["Dark Truffle Box", 2499],
//! )?;
//!
//! // Query with typed results
//! let products: Vec<Product> = db.query_as(
//!     "SELECT id, name, price_cents FROM products WHERE price_cents < ?",
//!     params![10000],
//! )?;
//!
//! // All-or-nothing writes
//! db.transaction(|db| {
//!     db.execute("INSERT INTO orders (total_cents) VALUES (?)", params![2499])?;
//!     let order_id = db.last_insert_rowid()?;
//!     db.execute(
//!         "INSERT INTO order_items (order_id) VALUES (?)",
//!         params![order_id],
//!     )
//! })?;
//! ```

mod db;
mod error;
mod types;

pub use db::Db;
pub use error::DbError;
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, Db, DbError, QueryResult, Row, Value};
}

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use cocoa_db::params;
///
/// let params = params!["milk", 599, true];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}

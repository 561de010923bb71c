//! Type-safe Key-Value store layer for CocoaCraft.
//!
//! Provides a simple, ergonomic API for storing data in Spin's Key-Value
//! Store with automatic JSON serialization. The storefront keeps carts and
//! auth sessions here.
//!
//! # Example
//!
//! ```rust,ignore
//! use cocoa_cache::Cache;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<CartItem>,
//! }
//!
//! // In a server function
//! let cache = Cache::open_default()?;
//!
//! cache.set("cart:sess_abc", &cart)?;
//! let cart: Option<Cart> = cache.get("cart:sess_abc")?;
//! cache.delete("cart:sess_abc")?;
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Session, SessionId};
}

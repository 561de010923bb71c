//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Live pricing catalog could not be fetched.
    ///
    /// Recovered locally by substituting the built-in fallback catalog;
    /// surfaced only when a caller explicitly asks for a live refresh.
    #[error("pricing catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("arithmetic overflow in money calculation")]
    Overflow,

    /// A submitted configuration references something the catalog doesn't
    /// carry. Maps to a 4xx response; never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A durable write failed and was rolled back. Maps to a 5xx response.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(feature = "storage")]
impl From<cocoa_db::DbError> for CommerceError {
    fn from(e: cocoa_db::DbError) -> Self {
        CommerceError::Persistence(e.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<cocoa_data::FetchError> for CommerceError {
    fn from(e: cocoa_data::FetchError) -> Self {
        CommerceError::CatalogUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

//! Request handlers, one module per resource.

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod products;

//! HTTP storefront component for CocoaCraft.
//!
//! Serves the catalog endpoints, the ready-made product listing, login,
//! and bearer-protected custom-order submission. Request dispatch is
//! host-independent (`ApiRequest` in, `ApiResponse` out) so the whole
//! surface runs in native tests; only the thin Spin wiring in
//! [`component`] is `wasm32`-gated.

pub mod api;
pub mod handlers;
pub mod router;
pub mod store;

#[cfg(target_arch = "wasm32")]
mod component;

pub use api::{ApiMethod, ApiRequest, ApiResponse};
pub use router::Storefront;
pub use store::{SqliteProductStore, SqliteUserStore};

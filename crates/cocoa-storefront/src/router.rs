//! Request dispatch.

use crate::api::{ApiMethod, ApiRequest, ApiResponse};
use crate::handlers;
use cocoa_auth::{Authenticator, SessionStore, UserStore};
use cocoa_commerce::catalog::{CatalogCategory, CatalogItemStore, ProductStore};
use cocoa_commerce::checkout::{OrderAssembler, OrderStore};

/// The storefront: every store injected, nothing global.
///
/// Production wires SQL- and KV-backed stores in the `wasm32` component;
/// tests wire the in-memory ones and drive [`dispatch`](Self::dispatch)
/// directly.
pub struct Storefront<P, O, U, S> {
    products: P,
    assembler: OrderAssembler<O>,
    auth: Authenticator<U, S>,
}

impl<P, O, U, S> Storefront<P, O, U, S>
where
    P: ProductStore,
    O: OrderStore + CatalogItemStore,
    U: UserStore,
    S: SessionStore,
{
    /// Assemble a storefront from its stores.
    pub fn new(products: P, assembler: OrderAssembler<O>, auth: Authenticator<U, S>) -> Self {
        Self {
            products,
            assembler,
            auth,
        }
    }

    /// Route a request to its handler.
    pub fn dispatch(&self, req: &ApiRequest) -> ApiResponse {
        let items = self.assembler.store();
        let response = match (req.method, req.path.as_str()) {
            (ApiMethod::Get, "/catalog/base-materials") => {
                handlers::catalog::list_items(items, CatalogCategory::BaseChocolate)
            }
            (ApiMethod::Get, "/catalog/add-ons") => {
                handlers::catalog::list_items(items, CatalogCategory::AddOn)
            }
            (ApiMethod::Get, "/catalog/shapes") => {
                handlers::catalog::list_items(items, CatalogCategory::Shape)
            }
            (ApiMethod::Get, "/catalog/packaging") => {
                handlers::catalog::list_items(items, CatalogCategory::Packaging)
            }
            (ApiMethod::Get, "/catalog/pricing") => handlers::catalog::aggregate_pricing(items),
            (ApiMethod::Get, "/products") => handlers::products::list(&self.products),
            (ApiMethod::Get, path) => match path.strip_prefix("/products/") {
                Some(slug) if !slug.is_empty() && !slug.contains('/') => {
                    handlers::products::by_slug(&self.products, slug)
                }
                _ => ApiResponse::not_found("no such route"),
            },
            (ApiMethod::Post, "/auth/login") => handlers::auth::login(&self.auth, req),
            (ApiMethod::Post, "/orders/custom") => {
                handlers::orders::submit(&self.assembler, &self.auth, req)
            }
            _ => ApiResponse::not_found("no such route"),
        };

        tracing::info!(
            method = ?req.method,
            path = %req.path,
            status = response.status,
            "request handled"
        );
        response
    }
}

//! Ready-made product endpoints.

use crate::api::ApiResponse;
use cocoa_commerce::catalog::{Product, ProductStore};
use serde::Serialize;

/// Wire shape of a product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductDto {
    id: String,
    sku: String,
    name: String,
    slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    price: f64,
    status: &'static str,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.into_inner(),
            sku: product.sku,
            name: product.name,
            slug: product.slug,
            description: product.description,
            price: product.price.to_decimal(),
            status: product.status.as_str(),
        }
    }
}

/// `GET /products`
pub fn list<S: ProductStore>(store: &S) -> ApiResponse {
    match store.list_active() {
        Ok(products) => {
            let dtos: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
            ApiResponse::ok(&dtos)
        }
        Err(e) => {
            tracing::error!(error = %e, "product listing failed");
            ApiResponse::error(500, "products unavailable")
        }
    }
}

/// `GET /products/:slug`
pub fn by_slug<S: ProductStore>(store: &S, slug: &str) -> ApiResponse {
    match store.find_by_slug(slug) {
        Ok(Some(product)) => ApiResponse::ok(&ProductDto::from(product)),
        Ok(None) => ApiResponse::not_found(format!("no product '{}'", slug)),
        Err(e) => {
            tracing::error!(error = %e, slug, "product lookup failed");
            ApiResponse::error(500, "products unavailable")
        }
    }
}

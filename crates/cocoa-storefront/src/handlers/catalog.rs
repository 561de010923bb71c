//! Catalog endpoints.

use crate::api::ApiResponse;
use cocoa_commerce::catalog::{
    CatalogCategory, CatalogItem, CatalogItemStore, MESSAGE_BASE_PRICE_CENTS,
    MESSAGE_CHAR_PRICE_CENTS,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Wire shape of one catalog item. Prices go out as decimal amounts.
#[derive(Debug, Serialize)]
struct ItemDto {
    id: i64,
    key: String,
    price: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    features: Vec<String>,
}

impl From<CatalogItem> for ItemDto {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            key: item.key,
            price: item.price.to_decimal(),
            features: item.features,
        }
    }
}

/// Wire shape of the aggregate pricing endpoint, the one the client-side
/// catalog service consumes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingAggregateDto {
    base_materials: BTreeMap<String, f64>,
    add_ons: BTreeMap<String, f64>,
    shapes: BTreeMap<String, f64>,
    packaging: BTreeMap<String, f64>,
    message_base_price: f64,
    message_char_price: f64,
    currency: String,
}

/// `GET /catalog/{base-materials,add-ons,shapes,packaging}`
pub fn list_items<S: CatalogItemStore>(store: &S, category: CatalogCategory) -> ApiResponse {
    match store.list_active_items(category) {
        Ok(items) => {
            let dtos: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();
            ApiResponse::ok(&dtos)
        }
        Err(e) => {
            tracing::error!(error = %e, %category, "catalog listing failed");
            ApiResponse::error(500, "catalog unavailable")
        }
    }
}

/// `GET /catalog/pricing`
pub fn aggregate_pricing<S: CatalogItemStore>(store: &S) -> ApiResponse {
    match build_aggregate(store) {
        Ok(dto) => ApiResponse::ok(&dto),
        Err(e) => {
            tracing::error!(error = %e, "aggregate pricing failed");
            ApiResponse::error(500, "catalog unavailable")
        }
    }
}

fn build_aggregate<S: CatalogItemStore>(
    store: &S,
) -> Result<PricingAggregateDto, cocoa_commerce::CommerceError> {
    let base = store.list_active_items(CatalogCategory::BaseChocolate)?;
    let add_ons = store.list_active_items(CatalogCategory::AddOn)?;
    let shapes = store.list_active_items(CatalogCategory::Shape)?;
    let packaging = store.list_active_items(CatalogCategory::Packaging)?;

    let currency = [&base, &add_ons, &shapes, &packaging]
        .into_iter()
        .flat_map(|items| items.first())
        .map(|item| item.price.currency)
        .next()
        .unwrap_or_default();

    let to_map = |items: Vec<CatalogItem>| -> BTreeMap<String, f64> {
        items
            .into_iter()
            .map(|i| (i.key, i.price.to_decimal()))
            .collect()
    };

    Ok(PricingAggregateDto {
        base_materials: to_map(base),
        add_ons: to_map(add_ons),
        shapes: to_map(shapes),
        packaging: to_map(packaging),
        message_base_price: MESSAGE_BASE_PRICE_CENTS as f64 / 100.0,
        message_char_price: MESSAGE_CHAR_PRICE_CENTS as f64 / 100.0,
        currency: currency.code().to_string(),
    })
}

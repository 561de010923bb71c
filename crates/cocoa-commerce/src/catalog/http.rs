//! HTTP catalog source (feature `remote`).

use crate::catalog::{CatalogSource, PriceList, PricingCatalog};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use cocoa_data::{FetchClient, RetryPolicy};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Wire shape of `GET /catalog/pricing`. Prices arrive as decimal amounts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingDto {
    base_materials: BTreeMap<String, f64>,
    add_ons: BTreeMap<String, f64>,
    shapes: BTreeMap<String, f64>,
    packaging: BTreeMap<String, f64>,
    message_base_price: f64,
    message_char_price: f64,
    #[serde(default)]
    currency: Option<String>,
}

/// Catalog source backed by the catalog service's aggregate pricing
/// endpoint.
///
/// Fetches are retried under the configured policy before the caller
/// falls back to the built-in catalog.
pub struct HttpCatalogSource {
    client: FetchClient,
    retry: RetryPolicy,
}

impl HttpCatalogSource {
    /// Create a source pointing at the catalog service.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: FetchClient::new().with_base_url(base_url),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn fetch_dto(&self) -> Result<PricingDto, CommerceError> {
        let dto: PricingDto = self
            .retry
            .run(|| {
                self.client
                    .get("/catalog/pricing")
                    .send()?
                    .error_for_status()?
                    .json::<PricingDto>()
            })
            .map_err(CommerceError::from)?;
        Ok(dto)
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch(&self) -> Result<PricingCatalog, CommerceError> {
        let dto = self.fetch_dto()?;
        let currency = dto
            .currency
            .as_deref()
            .and_then(Currency::from_code)
            .unwrap_or_default();

        let to_list = |prices: BTreeMap<String, f64>| {
            let mut list = PriceList::new();
            for (key, amount) in prices {
                list.insert(key, Money::from_decimal(amount, currency));
            }
            list
        };

        Ok(PricingCatalog {
            base_materials: to_list(dto.base_materials),
            shapes: to_list(dto.shapes),
            add_ons: to_list(dto.add_ons),
            packaging: to_list(dto.packaging),
            message_base_price: Money::from_decimal(dto.message_base_price, currency),
            message_char_price: Money::from_decimal(dto.message_char_price, currency),
            currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_dto_parses_aggregate_payload() {
        let json = r#"{
            "baseMaterials": {"milk": 5.99, "dark": 6.99},
            "addOns": {"nuts": 1.99},
            "shapes": {"square": 0, "heart": 2.5},
            "packaging": {"gift": 3.99},
            "messageBasePrice": 1.99,
            "messageCharPrice": 0.15,
            "currency": "USD"
        }"#;

        let dto: PricingDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.base_materials.len(), 2);
        assert_eq!(dto.shapes["heart"], 2.5);
        assert_eq!(dto.message_char_price, 0.15);
    }

    #[test]
    fn test_pricing_dto_currency_is_optional() {
        let json = r#"{
            "baseMaterials": {},
            "addOns": {},
            "shapes": {},
            "packaging": {},
            "messageBasePrice": 1.99,
            "messageCharPrice": 0.15
        }"#;

        let dto: PricingDto = serde_json::from_str(json).unwrap();
        assert!(dto.currency.is_none());
    }
}

//! The pricing catalog: unit prices for every selectable component.
//!
//! The catalog is a value type, replaced wholesale on refresh and never
//! partially mutated. Lookups are total: a key the catalog doesn't carry
//! prices as zero with a logged warning, so price computation can never
//! fail mid-configuration.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat fee for a personalized message, in cents.
///
/// The single authoritative default, shared by the built-in fallback
/// catalog and the server-side order recompute.
pub const MESSAGE_BASE_PRICE_CENTS: i64 = 199;

/// Per-character fee for a personalized message, in cents.
pub const MESSAGE_CHAR_PRICE_CENTS: i64 = 15;

/// A price list for one component category, keyed by component key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PriceList(BTreeMap<String, Money>);

impl PriceList {
    /// Create an empty price list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a price for a key.
    pub fn insert(&mut self, key: impl Into<String>, price: Money) {
        self.0.insert(key.into(), price);
    }

    /// Number of priced keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the price for a key.
    ///
    /// Tries an exact match first, then a case-insensitive match (upstream
    /// catalog keys and configuration values don't always agree on case).
    /// An unknown key prices as zero and logs a warning; this lookup never
    /// fails, so the configurator always has a number to show.
    pub fn price_for(&self, key: &str, currency: Currency) -> Money {
        if let Some(price) = self.0.get(key) {
            return *price;
        }
        if let Some((_, price)) = self
            .0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            return *price;
        }
        tracing::warn!(key, "no catalog price for key, pricing as zero");
        Money::zero(currency)
    }

    /// Iterate over key/price pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Money)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Money); N]> for PriceList {
    fn from(entries: [(K, Money); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }
}

/// The full pricing catalog for the custom chocolate builder.
///
/// One price list per component category, plus the two message-pricing
/// coefficients. Fetched once at startup and cached for the process
/// lifetime; see [`CatalogService`](crate::catalog::CatalogService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCatalog {
    /// Base chocolate prices, keyed by chocolate kind.
    pub base_materials: PriceList,
    /// Shape surcharges, keyed by shape.
    pub shapes: PriceList,
    /// Add-on prices, keyed by add-on.
    pub add_ons: PriceList,
    /// Packaging surcharges, keyed by packaging kind.
    pub packaging: PriceList,
    /// Flat fee applied once per non-empty message.
    pub message_base_price: Money,
    /// Fee applied per message character.
    pub message_char_price: Money,
    /// Currency all prices in this catalog are denominated in.
    pub currency: Currency,
}

impl PricingCatalog {
    /// The built-in fallback catalog.
    ///
    /// Substituted when the live catalog can't be fetched, and replaced
    /// transparently once a refresh succeeds.
    pub fn fallback() -> Self {
        let usd = |cents| Money::new(cents, Currency::USD);
        Self {
            base_materials: PriceList::from([
                ("milk", usd(599)),
                ("dark", usd(699)),
                ("white", usd(649)),
            ]),
            shapes: PriceList::from([
                ("square", usd(0)),
                ("round", usd(150)),
                ("heart", usd(250)),
            ]),
            add_ons: PriceList::from([
                ("nuts", usd(199)),
                ("caramel", usd(149)),
                ("berries", usd(249)),
            ]),
            packaging: PriceList::from([
                ("standard", usd(0)),
                ("gift", usd(399)),
                ("premium", usd(599)),
                ("eco", usd(199)),
            ]),
            message_base_price: usd(MESSAGE_BASE_PRICE_CENTS),
            message_char_price: usd(MESSAGE_CHAR_PRICE_CENTS),
            currency: Currency::USD,
        }
    }

    /// Price of a base chocolate.
    pub fn base_price(&self, key: &str) -> Money {
        self.base_materials.price_for(key, self.currency)
    }

    /// Surcharge for a shape.
    pub fn shape_surcharge(&self, key: &str) -> Money {
        self.shapes.price_for(key, self.currency)
    }

    /// Price of an add-on.
    pub fn add_on_price(&self, key: &str) -> Money {
        self.add_ons.price_for(key, self.currency)
    }

    /// Surcharge for a packaging option.
    pub fn packaging_surcharge(&self, key: &str) -> Money {
        self.packaging.price_for(key, self.currency)
    }

    /// Fee for a personalized message.
    ///
    /// Zero for an empty message; otherwise the flat fee plus the
    /// per-character fee times the message length in characters (not
    /// bytes).
    pub fn message_fee(&self, message: &str) -> Money {
        if message.is_empty() {
            return Money::zero(self.currency);
        }
        let chars = message.chars().count() as i64;
        self.message_base_price + self.message_char_price.multiply(chars)
    }
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

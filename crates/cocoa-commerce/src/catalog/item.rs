//! Catalog item rows, as served by the catalog endpoints and resolved
//! during order assembly.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The component category a catalog item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogCategory {
    /// Base chocolate (milk, dark, white).
    BaseChocolate,
    /// Mix-in add-ons (nuts, caramel, berries).
    AddOn,
    /// Bar shape.
    Shape,
    /// Packaging option.
    Packaging,
}

impl CatalogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogCategory::BaseChocolate => "base_chocolate",
            CatalogCategory::AddOn => "add_on",
            CatalogCategory::Shape => "shape",
            CatalogCategory::Packaging => "packaging",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "base_chocolate" => Some(CatalogCategory::BaseChocolate),
            "add_on" => Some(CatalogCategory::AddOn),
            "shape" => Some(CatalogCategory::Shape),
            "packaging" => Some(CatalogCategory::Packaging),
            _ => None,
        }
    }
}

impl std::fmt::Display for CatalogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listing seam for catalog item rows.
///
/// The storefront's catalog endpoints serve these lists; the same backing
/// rows feed order assembly.
pub trait CatalogItemStore {
    /// List all active items in a category.
    fn list_active_items(
        &self,
        category: CatalogCategory,
    ) -> Result<Vec<CatalogItem>, crate::error::CommerceError>;
}

/// One selectable component, as stored in the `catalog_items` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Database row id.
    pub id: i64,
    /// The category this item belongs to.
    pub category: CatalogCategory,
    /// Lookup key (e.g., "dark", "heart", "gift").
    pub key: String,
    /// Unit price.
    pub price: Money,
    /// Whether the item is currently orderable.
    pub active: bool,
    /// Marketing feature bullets; only populated for packaging rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl CatalogItem {
    /// Create an active item with no features.
    pub fn new(
        id: i64,
        category: CatalogCategory,
        key: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            category,
            key: key.into(),
            price,
            active: true,
            features: Vec::new(),
        }
    }

    /// Attach feature bullets (packaging rows).
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    /// Mark the item inactive.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_category_round_trip() {
        for category in [
            CatalogCategory::BaseChocolate,
            CatalogCategory::AddOn,
            CatalogCategory::Shape,
            CatalogCategory::Packaging,
        ] {
            assert_eq!(CatalogCategory::from_str(category.as_str()), Some(category));
        }
        assert_eq!(CatalogCategory::from_str("truffle"), None);
    }

    #[test]
    fn test_item_builders() {
        let item = CatalogItem::new(
            3,
            CatalogCategory::Packaging,
            "gift",
            Money::new(399, Currency::USD),
        )
        .with_features(vec!["Ribbon".to_string(), "Gift note".to_string()]);

        assert!(item.active);
        assert_eq!(item.features.len(), 2);
        assert!(!item.clone().deactivated().active);
    }
}

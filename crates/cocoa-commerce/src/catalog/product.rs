//! Ready-made product types.
//!
//! The storefront also sells a catalog of pre-designed chocolates next to
//! the custom builder. These are simple priced rows; only active products
//! are listed.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    /// Product is in draft mode, not visible to customers.
    Draft,
    /// Product is active and visible.
    #[default]
    Active,
    /// Product is archived, not visible but data preserved.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ProductStatus::Draft),
            "active" => Some(ProductStatus::Active),
            "archived" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

/// A ready-made product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Stock keeping unit (unique).
    pub sku: String,
    /// Product name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Full description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Money,
    /// Product visibility status.
    pub status: ProductStatus,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Product {
    /// Create a new active product.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: ProductId::generate(),
            sku: sku.into(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            price,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the product appears in listings.
    pub fn is_listed(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

/// Lookup seam for ready-made products.
///
/// The storefront backs this with the products table; tests inject
/// [`MemoryProductStore`].
pub trait ProductStore {
    /// List all active products.
    fn list_active(&self) -> Result<Vec<Product>, CommerceError>;

    /// Find a product by slug, regardless of status.
    fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CommerceError>;
}

/// In-memory product store for tests and native development.
#[derive(Default)]
pub struct MemoryProductStore {
    products: Vec<Product>,
}

impl MemoryProductStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over the given products.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl ProductStore for MemoryProductStore {
    fn list_active(&self) -> Result<Vec<Product>, CommerceError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.is_listed())
            .cloned()
            .collect())
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CommerceError> {
        Ok(self.products.iter().find(|p| p.slug == slug).cloned())
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

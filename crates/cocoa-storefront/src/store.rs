//! SQL-backed stores for the storefront.
//!
//! These wrap the shared SQLite connection behind the domain seams
//! (`ProductStore`, `UserStore`); the order store lives in
//! `cocoa-commerce` behind its `storage` feature.

use cocoa_auth::{AuthError, User, UserStore};
use cocoa_commerce::catalog::{Product, ProductStatus, ProductStore};
use cocoa_commerce::ids::ProductId;
use cocoa_commerce::money::{Currency, Money};
use cocoa_commerce::CommerceError;
use cocoa_db::{params, Db};
use serde::Deserialize;

/// Raw `products` row.
#[derive(Debug, Deserialize)]
struct ProductRow {
    id: i64,
    sku: String,
    name: String,
    slug: String,
    description: Option<String>,
    price_cents: i64,
    currency: String,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, CommerceError> {
        let status = ProductStatus::from_str(&self.status).ok_or_else(|| {
            CommerceError::Persistence(format!("unknown product status '{}'", self.status))
        })?;
        let currency = Currency::from_code(&self.currency).ok_or_else(|| {
            CommerceError::Persistence(format!("unknown currency '{}'", self.currency))
        })?;

        Ok(Product {
            id: ProductId::new(self.id.to_string()),
            sku: self.sku,
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: Money::new(self.price_cents, currency),
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// [`ProductStore`] over the products table.
pub struct SqliteProductStore {
    db: Db,
}

impl SqliteProductStore {
    /// Open over the default database.
    pub fn open_default() -> Result<Self, CommerceError> {
        Ok(Self {
            db: Db::open_default().map_err(|e| CommerceError::Persistence(e.to_string()))?,
        })
    }

    /// Wrap an existing connection.
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, sku, name, slug, description, price_cents, currency, status, created_at, updated_at";

impl ProductStore for SqliteProductStore {
    fn list_active(&self) -> Result<Vec<Product>, CommerceError> {
        let rows: Vec<ProductRow> = self
            .db
            .query_as(
                &format!(
                    "SELECT {} FROM products WHERE status = 'active' ORDER BY name",
                    PRODUCT_COLUMNS
                ),
                params![],
            )
            .map_err(|e| CommerceError::Persistence(e.to_string()))?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CommerceError> {
        let row: Option<ProductRow> = self
            .db
            .query_optional(
                &format!("SELECT {} FROM products WHERE slug = ?", PRODUCT_COLUMNS),
                params![slug],
            )
            .map_err(|e| CommerceError::Persistence(e.to_string()))?;

        row.map(ProductRow::into_product).transpose()
    }
}

/// Raw `users` row.
#[derive(Debug, Deserialize)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    role: String,
    created_at: i64,
    updated_at: i64,
}

/// [`UserStore`] over the users table.
pub struct SqliteUserStore {
    db: Db,
}

impl SqliteUserStore {
    /// Open over the default database.
    pub fn open_default() -> Result<Self, AuthError> {
        Ok(Self {
            db: Db::open_default().map_err(|e| AuthError::Internal(e.to_string()))?,
        })
    }

    /// Wrap an existing connection.
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl UserStore for SqliteUserStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = self
            .db
            .query_optional(
                "SELECT id, email, password_hash, role, created_at, updated_at \
                 FROM users WHERE email = ?",
                params![email],
            )
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        row.map(|row| {
            let role = row
                .role
                .parse()
                .map_err(|_| AuthError::Internal(format!("unknown role '{}'", row.role)))?;
            Ok(User {
                id: row.id,
                email: row.email,
                password_hash: row.password_hash,
                role,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }
}

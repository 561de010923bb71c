//! SQL-backed order store (feature `storage`).

use crate::catalog::{CatalogCategory, CatalogItem};
use crate::checkout::{AssembledOrder, OrderReceipt, OrderStatus, OrderStore};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use cocoa_db::{params, Db};
use serde::Deserialize;

/// Raw `catalog_items` row.
#[derive(Debug, Deserialize)]
struct CatalogItemRow {
    id: i64,
    category: String,
    key: String,
    price_cents: i64,
    currency: String,
    active: i64,
    features: Option<String>,
}

impl CatalogItemRow {
    fn into_item(self) -> Result<CatalogItem, CommerceError> {
        let category = CatalogCategory::from_str(&self.category).ok_or_else(|| {
            CommerceError::Persistence(format!("unknown catalog category '{}'", self.category))
        })?;
        let currency = Currency::from_code(&self.currency).ok_or_else(|| {
            CommerceError::Persistence(format!("unknown currency '{}'", self.currency))
        })?;
        let features = match self.features.as_deref() {
            Some(json) if !json.is_empty() => serde_json::from_str(json)?,
            _ => Vec::new(),
        };

        Ok(CatalogItem {
            id: self.id,
            category,
            key: self.key,
            price: Money::new(self.price_cents, currency),
            active: self.active != 0,
            features,
        })
    }
}

/// [`OrderStore`] over the storefront's SQLite database.
///
/// The persist sequence runs inside one `BEGIN IMMEDIATE` transaction;
/// any failed statement rolls the whole unit back.
pub struct SqliteOrderStore {
    db: Db,
}

impl SqliteOrderStore {
    /// Open over the default database.
    pub fn open_default() -> Result<Self, CommerceError> {
        Ok(Self {
            db: Db::open_default()?,
        })
    }

    /// Wrap an existing connection.
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl crate::catalog::CatalogItemStore for SqliteOrderStore {
    fn list_active_items(
        &self,
        category: CatalogCategory,
    ) -> Result<Vec<CatalogItem>, CommerceError> {
        let rows: Vec<CatalogItemRow> = self.db.query_as(
            "SELECT id, category, key, price_cents, currency, active, features \
             FROM catalog_items WHERE category = ? AND active = 1 ORDER BY id",
            params![category.as_str()],
        )?;

        rows.into_iter().map(CatalogItemRow::into_item).collect()
    }
}

impl OrderStore for SqliteOrderStore {
    fn find_active_item(
        &self,
        category: CatalogCategory,
        key: &str,
    ) -> Result<Option<CatalogItem>, CommerceError> {
        let row: Option<CatalogItemRow> = self.db.query_optional(
            "SELECT id, category, key, price_cents, currency, active, features \
             FROM catalog_items \
             WHERE category = ? AND key = ? COLLATE NOCASE AND active = 1",
            params![category.as_str(), key],
        )?;

        row.map(CatalogItemRow::into_item).transpose()
    }

    fn persist_order(&self, order: &AssembledOrder) -> Result<OrderReceipt, CommerceError> {
        let (order_id, config_id) = self
            .db
            .transaction(|db| {
                db.execute(
                    "INSERT INTO orders (customer_id, status, total_cents, currency, created_at) \
                     VALUES (?, ?, ?, ?, strftime('%s', 'now'))",
                    params![
                        order.customer_id,
                        OrderStatus::Pending.as_str(),
                        order.total.amount_cents,
                        order.total.currency.code()
                    ],
                )?;
                let order_id = db.last_insert_rowid()?;

                db.execute(
                    "INSERT INTO order_items (order_id, name, quantity, total_cents) \
                     VALUES (?, 'Custom chocolate', 1, ?)",
                    params![order_id, order.total.amount_cents],
                )?;

                db.execute(
                    "INSERT INTO custom_configurations \
                     (order_id, base_item_id, shape_item_id, packaging_item_id, message, message_style) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                    params![
                        order_id,
                        order.base.id,
                        order.shape.id,
                        order.packaging.id,
                        order.message.as_str(),
                        order.message_style.clone()
                    ],
                )?;
                let config_id = db.last_insert_rowid()?;

                for add_on in &order.add_ons {
                    db.execute(
                        "INSERT INTO configuration_add_ons (config_id, item_id) VALUES (?, ?)",
                        params![config_id, add_on.id],
                    )?;
                }

                Ok((order_id, config_id))
            })
            .map_err(|e| {
                tracing::error!(error = %e, "order transaction rolled back");
                CommerceError::Persistence(e.to_string())
            })?;

        Ok(OrderReceipt {
            order_id,
            custom_config_id: config_id,
            total_price: order.total,
        })
    }
}

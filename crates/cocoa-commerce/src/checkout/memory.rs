//! In-memory order store for tests and native development.
//!
//! Mirrors the SQL store's write sequence (order row, configuration row,
//! add-on rows) with explicit fail points between the steps, so the
//! assembler's rollback behavior can be exercised without a database.

use crate::catalog::{CatalogCategory, CatalogItem};
use crate::checkout::{AssembledOrder, Order, OrderReceipt, OrderStatus, OrderStore};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use std::sync::Mutex;

/// Where in the persist sequence the next write should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistFailPoint {
    /// Fail before anything is written.
    BeforeOrderRow,
    /// Fail after the order row, before the configuration row.
    BeforeConfigRow,
    /// Fail after the configuration row, before the add-on rows.
    BeforeAddOnRows,
}

/// A custom-configuration row.
#[derive(Debug, Clone, PartialEq)]
struct ConfigRow {
    id: i64,
    order_id: i64,
    message: String,
    message_style: Option<String>,
}

#[derive(Default)]
struct State {
    items: Vec<CatalogItem>,
    orders: Vec<Order>,
    configs: Vec<ConfigRow>,
    add_on_rows: Vec<(i64, i64)>,
    next_order_id: i64,
    next_config_id: i64,
    fail_point: Option<PersistFailPoint>,
}

/// In-memory [`OrderStore`].
#[derive(Default)]
pub struct MemoryOrderStore {
    state: Mutex<State>,
}

impl MemoryOrderStore {
    /// Create an empty store with no catalog items.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a store over the given catalog items.
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            state: Mutex::new(State {
                items,
                next_order_id: 1,
                next_config_id: 1,
                ..State::default()
            }),
        }
    }

    /// Create a store seeded with the same components as the built-in
    /// fallback catalog.
    pub fn seeded() -> Self {
        let usd = |cents| Money::new(cents, Currency::USD);
        let mut items = Vec::new();
        let mut id = 0;
        let mut push = |category, key: &str, price| {
            id += 1;
            items.push(CatalogItem::new(id, category, key, price));
        };

        push(CatalogCategory::BaseChocolate, "milk", usd(599));
        push(CatalogCategory::BaseChocolate, "dark", usd(699));
        push(CatalogCategory::BaseChocolate, "white", usd(649));
        push(CatalogCategory::Shape, "square", usd(0));
        push(CatalogCategory::Shape, "round", usd(150));
        push(CatalogCategory::Shape, "heart", usd(250));
        push(CatalogCategory::AddOn, "nuts", usd(199));
        push(CatalogCategory::AddOn, "caramel", usd(149));
        push(CatalogCategory::AddOn, "berries", usd(249));
        push(CatalogCategory::Packaging, "standard", usd(0));
        push(CatalogCategory::Packaging, "gift", usd(399));
        push(CatalogCategory::Packaging, "premium", usd(599));
        push(CatalogCategory::Packaging, "eco", usd(199));

        Self::with_items(items)
    }

    /// Arm a fail point for the next persist call.
    pub fn fail_next_persist(&self, point: PersistFailPoint) {
        self.lock().fail_point = Some(point);
    }

    /// Mark a catalog item inactive.
    pub fn deactivate(&self, category: CatalogCategory, key: &str) {
        let mut state = self.lock();
        for item in &mut state.items {
            if item.category == category && item.key.eq_ignore_ascii_case(key) {
                item.active = false;
            }
        }
    }

    /// Number of persisted orders.
    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    /// Number of persisted configuration rows.
    pub fn config_count(&self) -> usize {
        self.lock().configs.len()
    }

    /// Look up a persisted order by id.
    pub fn find_order(&self, order_id: i64) -> Option<Order> {
        self.lock().orders.iter().find(|o| o.id == order_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl crate::catalog::CatalogItemStore for MemoryOrderStore {
    fn list_active_items(
        &self,
        category: CatalogCategory,
    ) -> Result<Vec<CatalogItem>, CommerceError> {
        let state = self.lock();
        Ok(state
            .items
            .iter()
            .filter(|item| item.category == category && item.active)
            .cloned()
            .collect())
    }
}

impl OrderStore for MemoryOrderStore {
    fn find_active_item(
        &self,
        category: CatalogCategory,
        key: &str,
    ) -> Result<Option<CatalogItem>, CommerceError> {
        let state = self.lock();
        Ok(state
            .items
            .iter()
            .find(|item| {
                item.category == category && item.active && item.key.eq_ignore_ascii_case(key)
            })
            .cloned())
    }

    fn persist_order(&self, order: &AssembledOrder) -> Result<OrderReceipt, CommerceError> {
        let mut state = self.lock();
        let fail_point = state.fail_point.take();

        if fail_point == Some(PersistFailPoint::BeforeOrderRow) {
            return Err(CommerceError::Persistence(
                "simulated failure before order row".to_string(),
            ));
        }

        let order_id = state.next_order_id;
        state.orders.push(Order {
            id: order_id,
            customer_id: order.customer_id,
            status: OrderStatus::Pending,
            total: order.total,
            created_at: current_timestamp(),
        });

        if fail_point == Some(PersistFailPoint::BeforeConfigRow) {
            state.orders.pop();
            return Err(CommerceError::Persistence(
                "simulated failure before configuration row".to_string(),
            ));
        }

        let config_id = state.next_config_id;
        state.configs.push(ConfigRow {
            id: config_id,
            order_id,
            message: order.message.clone(),
            message_style: order.message_style.clone(),
        });

        if fail_point == Some(PersistFailPoint::BeforeAddOnRows) {
            state.configs.pop();
            state.orders.pop();
            return Err(CommerceError::Persistence(
                "simulated failure before add-on rows".to_string(),
            ));
        }

        for add_on in &order.add_ons {
            state.add_on_rows.push((config_id, add_on.id));
        }

        state.next_order_id += 1;
        state.next_config_id += 1;

        Ok(OrderReceipt {
            order_id,
            custom_config_id: config_id,
            total_price: order.total,
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_active_item_ignores_case() {
        let store = MemoryOrderStore::seeded();
        let item = store
            .find_active_item(CatalogCategory::BaseChocolate, "DARK")
            .unwrap();
        assert_eq!(item.unwrap().price.amount_cents, 699);
    }

    #[test]
    fn test_find_active_item_skips_inactive() {
        let store = MemoryOrderStore::seeded();
        store.deactivate(CatalogCategory::AddOn, "nuts");
        let item = store
            .find_active_item(CatalogCategory::AddOn, "nuts")
            .unwrap();
        assert!(item.is_none());
    }

    #[test]
    fn test_fail_point_is_one_shot() {
        let store = MemoryOrderStore::seeded();
        store.fail_next_persist(PersistFailPoint::BeforeOrderRow);

        let base = store
            .find_active_item(CatalogCategory::BaseChocolate, "milk")
            .unwrap()
            .unwrap();
        let shape = store
            .find_active_item(CatalogCategory::Shape, "square")
            .unwrap()
            .unwrap();
        let packaging = store
            .find_active_item(CatalogCategory::Packaging, "standard")
            .unwrap()
            .unwrap();
        let total = base.price;
        let assembled = AssembledOrder {
            customer_id: 1,
            base,
            shape,
            packaging,
            add_ons: vec![],
            message: String::new(),
            message_style: None,
            total,
        };

        assert!(store.persist_order(&assembled).is_err());
        // The next persist goes through
        assert!(store.persist_order(&assembled).is_ok());
        assert_eq!(store.order_count(), 1);
    }
}

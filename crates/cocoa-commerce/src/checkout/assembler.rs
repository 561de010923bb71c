//! Server-side order assembly.
//!
//! Validates a submitted configuration against the catalog, recomputes the
//! price from the server's own rows, and persists the order and its
//! dependent rows as one atomic unit. A client-submitted total is never
//! read; the request doesn't even carry one.

use crate::catalog::{
    CatalogCategory, CatalogItem, MESSAGE_BASE_PRICE_CENTS, MESSAGE_CHAR_PRICE_CENTS,
};
use crate::checkout::{AssembledOrder, CustomOrderRequest, OrderReceipt};
use crate::configurator::MESSAGE_MAX_CHARS;
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Persistence seam for order assembly.
///
/// Production uses the SQL-backed store; tests inject
/// [`MemoryOrderStore`], whose fail points exercise the rollback path.
pub trait OrderStore {
    /// Find an active catalog item by category and key.
    ///
    /// Key matching is case-insensitive; inactive rows never resolve.
    fn find_active_item(
        &self,
        category: CatalogCategory,
        key: &str,
    ) -> Result<Option<CatalogItem>, CommerceError>;

    /// Persist an assembled order and all its dependent rows.
    ///
    /// The order row, order-item row, custom-configuration row, and
    /// add-on association rows are one atomic unit: on any failure,
    /// nothing is visible afterwards.
    fn persist_order(&self, order: &AssembledOrder) -> Result<OrderReceipt, CommerceError>;
}

/// Validates, prices, and persists custom-order submissions.
pub struct OrderAssembler<S> {
    store: S,
    message_base_price: Money,
    message_char_price: Money,
}

impl<S: OrderStore> OrderAssembler<S> {
    /// Create an assembler with the authoritative message pricing.
    pub fn new(store: S) -> Self {
        Self {
            store,
            message_base_price: Money::new(MESSAGE_BASE_PRICE_CENTS, Currency::USD),
            message_char_price: Money::new(MESSAGE_CHAR_PRICE_CENTS, Currency::USD),
        }
    }

    /// Override the message pricing coefficients.
    pub fn with_message_pricing(mut self, base: Money, per_char: Money) -> Self {
        self.message_base_price = base;
        self.message_char_price = per_char;
        self
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, price, and persist a submitted configuration.
    ///
    /// Fails with [`CommerceError::Validation`] before any write when a
    /// referenced key has no active catalog row, and with
    /// [`CommerceError::Persistence`] when the atomic write fails (after
    /// a full rollback).
    pub fn submit(
        &self,
        request: &CustomOrderRequest,
        customer_id: i64,
    ) -> Result<OrderReceipt, CommerceError> {
        let base = self.resolve(CatalogCategory::BaseChocolate, &request.base_material)?;
        let shape = self.resolve(CatalogCategory::Shape, &request.shape)?;
        let packaging = self.resolve(CatalogCategory::Packaging, &request.packaging)?;

        let mut add_ons = Vec::new();
        for key in &request.add_ons {
            // "none" is the explicit empty choice, not a catalog row
            if key.eq_ignore_ascii_case("none") {
                continue;
            }
            add_ons.push(self.resolve(CatalogCategory::AddOn, key)?);
        }

        let message = truncate_chars(request.message.as_deref().unwrap_or(""), MESSAGE_MAX_CHARS);
        let total = self.compute_total(&base, &shape, &packaging, &add_ons, &message)?;

        let assembled = AssembledOrder {
            customer_id,
            base,
            shape,
            packaging,
            add_ons,
            message,
            message_style: request.message_style.clone(),
            total,
        };

        let receipt = self.store.persist_order(&assembled)?;
        tracing::info!(
            order_id = receipt.order_id,
            custom_config_id = receipt.custom_config_id,
            total_cents = receipt.total_price.amount_cents,
            "custom order persisted"
        );
        Ok(receipt)
    }

    fn resolve(
        &self,
        category: CatalogCategory,
        key: &str,
    ) -> Result<CatalogItem, CommerceError> {
        self.store
            .find_active_item(category, key)?
            .ok_or_else(|| {
                CommerceError::Validation(format!(
                    "no active {} catalog item for key '{}'",
                    category, key
                ))
            })
    }

    fn compute_total(
        &self,
        base: &CatalogItem,
        shape: &CatalogItem,
        packaging: &CatalogItem,
        add_ons: &[CatalogItem],
        message: &str,
    ) -> Result<Money, CommerceError> {
        let mut total = base.price;
        for part in [&shape.price, &packaging.price]
            .into_iter()
            .chain(add_ons.iter().map(|a| &a.price))
        {
            total = total.checked_add(part).ok_or(CommerceError::Overflow)?;
        }

        if !message.is_empty() {
            let chars = message.chars().count() as i64;
            let fee = self
                .message_char_price
                .checked_mul(chars)
                .and_then(|per_chars| self.message_base_price.checked_add(&per_chars))
                .ok_or(CommerceError::Overflow)?;
            total = total.checked_add(&fee).ok_or(CommerceError::Overflow)?;
        }

        Ok(total)
    }
}

/// Truncate a string at a character boundary.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => s[..byte_index].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::MemoryOrderStore;
    use crate::checkout::PersistFailPoint;

    fn request() -> CustomOrderRequest {
        CustomOrderRequest {
            base_material: "dark".to_string(),
            add_ons: vec!["nuts".to_string()],
            shape: "heart".to_string(),
            packaging: "gift".to_string(),
            message: Some("Hi!".to_string()),
            message_style: Some("script".to_string()),
        }
    }

    fn assembler() -> OrderAssembler<MemoryOrderStore> {
        OrderAssembler::new(MemoryOrderStore::seeded())
    }

    #[test]
    fn test_submit_recomputes_price_server_side() {
        let assembler = assembler();
        let receipt = assembler.submit(&request(), 1).unwrap();

        // dark 699 + heart 250 + nuts 199 + gift 399 + message 199 + 3*15
        assert_eq!(receipt.total_price.amount_cents, 699 + 250 + 199 + 399 + 244);
        assert_eq!(assembler.store().order_count(), 1);
    }

    #[test]
    fn test_submit_resolves_keys_case_insensitively() {
        let assembler = assembler();
        let mut req = request();
        req.base_material = "Dark".to_string();
        req.shape = "HEART".to_string();

        assert!(assembler.submit(&req, 1).is_ok());
    }

    #[test]
    fn test_submit_unknown_base_is_validation_error() {
        let assembler = assembler();
        let mut req = request();
        req.base_material = "ruby".to_string();

        let result = assembler.submit(&req, 1);
        assert!(matches!(result, Err(CommerceError::Validation(_))));
        // Nothing persisted
        assert_eq!(assembler.store().order_count(), 0);
    }

    #[test]
    fn test_submit_inactive_item_is_validation_error() {
        let store = MemoryOrderStore::seeded();
        store.deactivate(CatalogCategory::Packaging, "gift");
        let assembler = OrderAssembler::new(store);

        let result = assembler.submit(&request(), 1);
        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_submit_none_add_on_is_skipped_not_resolved() {
        let assembler = assembler();
        let mut req = request();
        req.add_ons = vec!["none".to_string()];
        req.message = None;

        let receipt = assembler.submit(&req, 1).unwrap();
        // dark 699 + heart 250 + gift 399, no add-ons, no message
        assert_eq!(receipt.total_price.amount_cents, 699 + 250 + 399);
    }

    #[test]
    fn test_submit_empty_message_has_no_fee() {
        let assembler = assembler();
        let mut req = request();
        req.message = Some(String::new());

        let receipt = assembler.submit(&req, 1).unwrap();
        assert_eq!(receipt.total_price.amount_cents, 699 + 250 + 199 + 399);
    }

    #[test]
    fn test_persist_failure_rolls_back_everything() {
        let store = MemoryOrderStore::seeded();
        store.fail_next_persist(PersistFailPoint::BeforeAddOnRows);
        let assembler = OrderAssembler::new(store);

        let result = assembler.submit(&request(), 1);
        assert!(matches!(result, Err(CommerceError::Persistence(_))));
        // The order row inserted before the fail point is gone
        assert_eq!(assembler.store().order_count(), 0);
        assert_eq!(assembler.store().config_count(), 0);
    }

    #[test]
    fn test_persist_failure_before_config_rolls_back_order_row() {
        let store = MemoryOrderStore::seeded();
        store.fail_next_persist(PersistFailPoint::BeforeConfigRow);
        let assembler = OrderAssembler::new(store);

        assert!(assembler.submit(&request(), 1).is_err());
        assert_eq!(assembler.store().order_count(), 0);
    }

    #[test]
    fn test_submission_is_not_idempotent() {
        // No idempotency key: the same submission twice creates two orders
        let assembler = assembler();
        let first = assembler.submit(&request(), 1).unwrap();
        let second = assembler.submit(&request(), 1).unwrap();
        assert_ne!(first.order_id, second.order_id);
        assert_eq!(assembler.store().order_count(), 2);
    }

    #[test]
    fn test_overlong_message_truncated_before_pricing() {
        let assembler = assembler();
        let mut req = request();
        req.message = Some("x".repeat(MESSAGE_MAX_CHARS + 50));

        let receipt = assembler.submit(&req, 1).unwrap();
        let expected_fee = MESSAGE_BASE_PRICE_CENTS + (MESSAGE_MAX_CHARS as i64) * MESSAGE_CHAR_PRICE_CENTS;
        assert_eq!(
            receipt.total_price.amount_cents,
            699 + 250 + 199 + 399 + expected_fee
        );
    }
}

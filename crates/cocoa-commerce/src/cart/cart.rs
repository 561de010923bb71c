//! Cart and line item types.

use crate::catalog::{PricingCatalog, Product};
use crate::configurator::{calculate, ProductConfiguration};
use crate::error::CommerceError;
use crate::ids::{CartId, LineItemId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// What a line item refers to: a ready-made product or a custom build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CartItemKind {
    /// A catalog product reference.
    Product {
        /// The referenced product.
        product_id: ProductId,
        /// SKU at time of adding.
        sku: String,
    },
    /// A custom chocolate, priced by the calculator at add time.
    Custom {
        /// The full configuration, kept so checkout can submit it.
        configuration: ProductConfiguration,
    },
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Unique line item identifier.
    pub id: LineItemId,
    /// Display name at time of adding.
    pub name: String,
    /// Quantity.
    pub quantity: i64,
    /// Unit price at time of adding.
    pub unit_price: Money,
    /// Total price for this line (unit price times quantity).
    pub total_price: Money,
    /// What this line refers to.
    pub kind: CartItemKind,
}

impl LineItem {
    fn new(
        name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        kind: CartItemKind,
    ) -> Result<Self, CommerceError> {
        let mut item = Self {
            id: LineItemId::generate(),
            name: name.into(),
            quantity,
            unit_price,
            total_price: unit_price,
            kind,
        };
        item.update_total()?;
        Ok(item)
    }

    fn update_total(&mut self) -> Result<(), CommerceError> {
        self.total_price = self
            .unit_price
            .checked_mul(self.quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }
}

/// A shopping cart.
///
/// Carts live client-side, keyed by session; the server only ever sees
/// the orders checked out from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Session ID the cart belongs to.
    pub session_id: String,
    /// Items in the cart.
    pub items: Vec<LineItem>,
    /// Cart currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create a new cart for a session.
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            session_id: session_id.into(),
            items: Vec::new(),
            currency: Currency::USD,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a ready-made product to the cart.
    ///
    /// Adding the same product again merges into the existing line.
    /// Returns an error if the quantity is not positive, the merged
    /// quantity exceeds [`MAX_QUANTITY_PER_ITEM`], the product's currency
    /// doesn't match the cart, or the total would overflow.
    pub fn add_product(
        &mut self,
        product: &Product,
        quantity: i64,
    ) -> Result<LineItemId, CommerceError> {
        self.check_currency(product.price)?;
        let kind = CartItemKind::Product {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
        };
        self.add_line(product.name.clone(), quantity, product.price, kind)
    }

    /// Add a custom chocolate to the cart, priced against the given
    /// catalog at add time.
    ///
    /// An identical configuration already in the cart merges into the
    /// existing line.
    pub fn add_custom(
        &mut self,
        configuration: ProductConfiguration,
        quantity: i64,
        catalog: &PricingCatalog,
    ) -> Result<LineItemId, CommerceError> {
        let breakdown = calculate(&configuration, catalog);
        self.check_currency(breakdown.subtotal)?;
        let kind = CartItemKind::Custom { configuration };
        self.add_line("Custom chocolate", quantity, breakdown.subtotal, kind)
    }

    fn check_currency(&self, price: Money) -> Result<(), CommerceError> {
        if price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }
        Ok(())
    }

    fn add_line(
        &mut self,
        name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        kind: CartItemKind,
    ) -> Result<LineItemId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.kind == kind) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            existing.update_total()?;
            self.updated_at = current_timestamp();
            return Ok(existing.id.clone());
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let item = LineItem::new(name, quantity, unit_price, kind)?;
        let id = item.id.clone();
        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Update item quantity.
    ///
    /// If quantity is <= 0, removes the item. Returns whether a line was
    /// touched.
    pub fn update_quantity(
        &mut self,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(line_item_id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        if let Some(item) = self.items.iter_mut().find(|i| &i.id == line_item_id) {
            item.quantity = quantity;
            item.update_total()?;
            self.updated_at = current_timestamp();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, line_item_id: &LineItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != line_item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = current_timestamp();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Overflow-safe sum of all line totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.items
            .iter()
            .try_fold(Money::zero(self.currency), |acc, item| {
                acc.checked_add(&item.total_price)
                    .ok_or(CommerceError::Overflow)
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
    use crate::configurator::AddOn;

    fn bar() -> Product {
        Product::new(
            "CHOC-BAR-01",
            "Signature Milk Bar",
            "signature-milk-bar",
            Money::new(599, Currency::USD),
        )
    }

    #[test]
    fn test_add_product() {
        let mut cart = Cart::new("sess_abc");
        cart.add_product(&bar(), 2).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.subtotal().unwrap().amount_cents, 1198);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new("sess_abc");
        let product = bar();
        let first = cart.add_product(&product, 1).unwrap();
        let second = cart.add_product(&product, 2).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_custom_priced_at_add_time() {
        let catalog = PricingCatalog::fallback();
        let mut cart = Cart::new("sess_abc");
        let config = ProductConfiguration::new().toggle_add_on(AddOn::Nuts);

        cart.add_custom(config.clone(), 1, &catalog).unwrap();

        // milk 599 + nuts 199
        assert_eq!(cart.subtotal().unwrap().amount_cents, 798);

        // The configuration is preserved for checkout
        match &cart.items[0].kind {
            CartItemKind::Custom { configuration } => assert_eq!(configuration, &config),
            other => panic!("expected custom item, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_custom_configs_merge() {
        let catalog = PricingCatalog::fallback();
        let mut cart = Cart::new("sess_abc");
        let config = ProductConfiguration::new().toggle_add_on(AddOn::Caramel);

        cart.add_custom(config.clone(), 1, &catalog).unwrap();
        cart.add_custom(config, 1, &catalog).unwrap();
        let different = ProductConfiguration::new().toggle_add_on(AddOn::Berries);
        cart.add_custom(different, 1, &catalog).unwrap();

        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut cart = Cart::new("sess_abc");
        let result = cart.add_product(&bar(), 0);
        assert!(matches!(result, Err(CommerceError::InvalidQuantity(0))));
    }

    #[test]
    fn test_rejects_quantity_over_limit() {
        let mut cart = Cart::new("sess_abc");
        let result = cart.add_product(&bar(), MAX_QUANTITY_PER_ITEM + 1);
        assert!(matches!(
            result,
            Err(CommerceError::QuantityExceedsLimit(_, _))
        ));
    }

    #[test]
    fn test_merge_cannot_exceed_limit() {
        let mut cart = Cart::new("sess_abc");
        let product = bar();
        cart.add_product(&product, MAX_QUANTITY_PER_ITEM).unwrap();
        let result = cart.add_product(&product, 1);
        assert!(matches!(
            result,
            Err(CommerceError::QuantityExceedsLimit(_, _))
        ));
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let mut cart = Cart::new("sess_abc");
        let id = cart.add_product(&bar(), 1).unwrap();

        assert!(cart.update_quantity(&id, 5).unwrap());
        assert_eq!(cart.item_count(), 5);

        // Zero quantity removes the line
        assert!(cart.update_quantity(&id, 0).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_unknown_line_is_false() {
        let mut cart = Cart::new("sess_abc");
        let touched = cart
            .update_quantity(&LineItemId::new("line-missing"), 3)
            .unwrap();
        assert!(!touched);
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut cart = Cart::new("sess_abc");
        let mut product = bar();
        product.price = Money::new(599, Currency::EUR);

        let result = cart.add_product(&product, 1);
        assert!(matches!(
            result,
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new("sess_abc");
        cart.add_product(&bar(), 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.subtotal().unwrap().is_zero());
    }
}

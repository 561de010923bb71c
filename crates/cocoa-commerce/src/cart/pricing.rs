//! Cart pricing calculations.

use crate::cart::Cart;
use crate::error::CommerceError;
use crate::ids::LineItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown for a cart.
///
/// Taxes and shipping are checkout concerns and are not priced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Per-line-item pricing breakdown.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Price a cart, line by line.
    pub fn for_cart(cart: &Cart) -> Result<Self, CommerceError> {
        let line_items = cart
            .items
            .iter()
            .map(|item| LineItemPricing {
                line_item_id: item.id.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                total: item.total_price,
            })
            .collect();

        Ok(Self {
            subtotal: cart.subtotal()?,
            line_items,
        })
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Line item ID.
    pub line_item_id: LineItemId,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Total for this line (unit_price * quantity).
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::money::Currency;

    #[test]
    fn test_cart_pricing_sums_lines() {
        let mut cart = Cart::new("sess_abc");
        let bar = Product::new(
            "CHOC-BAR-01",
            "Signature Milk Bar",
            "signature-milk-bar",
            Money::new(599, Currency::USD),
        );
        let truffles = Product::new(
            "CHOC-TRUF-12",
            "Dark Truffle Box",
            "dark-truffle-box",
            Money::new(2499, Currency::USD),
        );
        cart.add_product(&bar, 2).unwrap();
        cart.add_product(&truffles, 1).unwrap();

        let pricing = CartPricing::for_cart(&cart).unwrap();
        assert_eq!(pricing.line_items.len(), 2);
        assert_eq!(pricing.subtotal.amount_cents, 2 * 599 + 2499);

        let line_sum: i64 = pricing.line_items.iter().map(|l| l.total.amount_cents).sum();
        assert_eq!(line_sum, pricing.subtotal.amount_cents);
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let cart = Cart::new("sess_abc");
        let pricing = CartPricing::for_cart(&cart).unwrap();
        assert!(pricing.subtotal.is_zero());
        assert!(pricing.line_items.is_empty());
    }
}

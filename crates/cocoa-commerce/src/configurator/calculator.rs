//! Price calculation for custom configurations.
//!
//! `calculate` is pure and total: it never fails, never touches I/O, and
//! is cheap enough to run after every single mutation of the
//! configuration. Components the catalog can't resolve contribute zero.

use crate::catalog::PricingCatalog;
use crate::configurator::ProductConfiguration;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Additive price breakdown for a configuration.
///
/// `subtotal` is always the sum of the five components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Base chocolate price.
    pub base: Money,
    /// Shape surcharge.
    pub shape_surcharge: Money,
    /// Sum of all selected add-on prices.
    pub add_ons_total: Money,
    /// Packaging surcharge.
    pub packaging_surcharge: Money,
    /// Personalized message fee.
    pub message_fee: Money,
    /// Sum of all components.
    pub subtotal: Money,
}

/// Price a configuration against a catalog.
pub fn calculate(config: &ProductConfiguration, catalog: &PricingCatalog) -> PriceBreakdown {
    let base = catalog.base_price(config.base.as_str());
    let shape_surcharge = catalog.shape_surcharge(config.shape.as_str());

    let add_ons_total = config
        .priced_add_ons()
        .map(|a| catalog.add_on_price(a.as_str()))
        .fold(Money::zero(catalog.currency), |acc, p| acc + p);

    let packaging_surcharge = catalog.packaging_surcharge(config.packaging.as_str());
    let message_fee = catalog.message_fee(&config.message);

    let subtotal = base + shape_surcharge + add_ons_total + packaging_surcharge + message_fee;

    PriceBreakdown {
        base,
        shape_surcharge,
        add_ons_total,
        packaging_surcharge,
        message_fee,
        subtotal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurator::{AddOn, BaseChocolate, Packaging, Shape};
    use crate::money::Currency;
    use crate::catalog::PriceList;

    fn scenario_catalog() -> PricingCatalog {
        let usd = |cents| Money::new(cents, Currency::USD);
        PricingCatalog {
            base_materials: PriceList::from([("dark", usd(699))]),
            shapes: PriceList::from([("heart", usd(250))]),
            add_ons: PriceList::from([("nuts", usd(199))]),
            packaging: PriceList::from([("gift", usd(399))]),
            message_base_price: usd(199),
            message_char_price: usd(15),
            currency: Currency::USD,
        }
    }

    fn scenario_config() -> ProductConfiguration {
        ProductConfiguration::new()
            .with_base(BaseChocolate::Dark)
            .with_shape(Shape::Heart)
            .toggle_add_on(AddOn::Nuts)
            .with_packaging(Packaging::Gift)
            .with_message("Hi!")
    }

    #[test]
    fn test_worked_scenario() {
        let breakdown = calculate(&scenario_config(), &scenario_catalog());
        assert_eq!(breakdown.base.amount_cents, 699);
        assert_eq!(breakdown.shape_surcharge.amount_cents, 250);
        assert_eq!(breakdown.add_ons_total.amount_cents, 199);
        assert_eq!(breakdown.packaging_surcharge.amount_cents, 399);
        // 1.99 + 0.15 * 3 characters
        assert_eq!(breakdown.message_fee.amount_cents, 244);
        assert_eq!(
            breakdown.subtotal.amount_cents,
            699 + 250 + 199 + 399 + 244
        );
    }

    #[test]
    fn test_additive_decomposition_law() {
        let catalog = PricingCatalog::fallback();
        // Sweep a variety of configurations
        let configs = [
            ProductConfiguration::new(),
            ProductConfiguration::new().with_base(BaseChocolate::Dark),
            scenario_config(),
            ProductConfiguration::new()
                .toggle_add_on(AddOn::Nuts)
                .toggle_add_on(AddOn::Caramel)
                .toggle_add_on(AddOn::Berries)
                .with_packaging(Packaging::Premium)
                .with_message("For you"),
        ];

        for config in &configs {
            let b = calculate(config, &catalog);
            let expected = b.base
                + b.shape_surcharge
                + b.add_ons_total
                + b.packaging_surcharge
                + b.message_fee;
            assert_eq!(b.subtotal, expected);
        }
    }

    #[test]
    fn test_empty_and_none_add_ons_price_identically() {
        let catalog = PricingCatalog::fallback();

        let with_none = ProductConfiguration::new();
        assert_eq!(with_none.add_ons, vec![AddOn::None]);

        // Toggling an add-on twice leaves the set empty, not {None}
        let empty = ProductConfiguration::new()
            .toggle_add_on(AddOn::Nuts)
            .toggle_add_on(AddOn::Nuts);
        assert!(empty.add_ons.is_empty());

        let a = calculate(&with_none, &catalog);
        let b = calculate(&empty, &catalog);
        assert!(a.add_ons_total.is_zero());
        assert_eq!(a.add_ons_total, b.add_ons_total);
        assert_eq!(a.subtotal, b.subtotal);
    }

    #[test]
    fn test_empty_message_has_no_fee() {
        let catalog = PricingCatalog::fallback();
        // Style chosen but text cleared: still no fee
        let config = ProductConfiguration::new()
            .with_message_style("script")
            .with_message("");
        let breakdown = calculate(&config, &catalog);
        assert!(breakdown.message_fee.is_zero());
    }

    #[test]
    fn test_unresolvable_parts_price_as_zero() {
        // A catalog with no shape prices at all: still total, shape = 0
        let mut catalog = scenario_catalog();
        catalog.shapes = PriceList::new();
        let breakdown = calculate(&scenario_config(), &catalog);
        assert!(breakdown.shape_surcharge.is_zero());
        assert_eq!(
            breakdown.subtotal,
            breakdown.base + breakdown.add_ons_total + breakdown.packaging_surcharge + breakdown.message_fee
        );
    }
}

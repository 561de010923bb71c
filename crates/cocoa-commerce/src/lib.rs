//! Chocolate commerce domain types and logic for CocoaCraft.
//!
//! This crate provides the storefront's domain layer:
//!
//! - **Catalog**: pricing catalog and its service, catalog items, products
//! - **Configurator**: the five-step custom chocolate builder and its
//!   price calculator
//! - **Cart**: shopping cart with product and custom line items
//! - **Checkout**: order types and the server-side order assembler
//!
//! # Example
//!
//! ```rust,ignore
//! use cocoa_commerce::prelude::*;
//!
//! // Price a configuration as the customer builds it
//! let catalog = PricingCatalog::fallback();
//! let mut wizard = Configurator::new();
//! wizard.set_base(BaseChocolate::Dark);
//! wizard.set_shape(Shape::Heart);
//! wizard.toggle_add_on(AddOn::Nuts);
//!
//! let breakdown = wizard.pricing(&catalog);
//! println!("Subtotal: {}", breakdown.subtotal.display());
//!
//! // Server side: validate, reprice, and persist the submission
//! let assembler = OrderAssembler::new(MemoryOrderStore::seeded());
//! let receipt = assembler.submit(&request, customer_id)?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod configurator;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        CatalogCategory, CatalogItem, CatalogItemStore, CatalogService, CatalogSource,
        MemoryProductStore,
        PriceList, PricingCatalog, Product, ProductStatus, ProductStore, StaticCatalogSource,
    };

    // Configurator
    pub use crate::configurator::{
        calculate, AddOn, BaseChocolate, ConfigStep, Configurator, Packaging, PriceBreakdown,
        ProductConfiguration, Shape, MESSAGE_MAX_CHARS,
    };

    // Cart
    pub use crate::cart::{
        Cart, CartItemKind, CartPricing, LineItem, LineItemPricing, MAX_QUANTITY_PER_ITEM,
    };

    // Checkout
    pub use crate::checkout::{
        AssembledOrder, CustomOrderRequest, MemoryOrderStore, Order, OrderAssembler,
        OrderReceipt, OrderStatus, OrderStore, PersistFailPoint,
    };
}

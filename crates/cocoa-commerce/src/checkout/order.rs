//! Order types.

use crate::catalog::CatalogItem;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order confirmed and in production.
    Confirmed,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// A persisted order row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Database row id.
    pub id: i64,
    /// The ordering customer's row id.
    pub customer_id: i64,
    /// Order status.
    pub status: OrderStatus,
    /// Server-computed total.
    pub total: Money,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

/// A custom-order submission, as posted to `/orders/custom`.
///
/// Deliberately carries no price: the server is the sole source of truth
/// for the total and recomputes it from its own catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrderRequest {
    /// Base chocolate key.
    pub base_material: String,
    /// Add-on keys; "none" entries are ignored.
    #[serde(default)]
    pub add_ons: Vec<String>,
    /// Shape key.
    pub shape: String,
    /// Packaging key.
    pub packaging: String,
    /// Personalized message.
    #[serde(default)]
    pub message: Option<String>,
    /// Message style identifier.
    #[serde(default)]
    pub message_style: Option<String>,
}

/// A configuration resolved against the server catalog, priced and ready
/// to persist as one atomic unit.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledOrder {
    /// The ordering customer's row id.
    pub customer_id: i64,
    /// Resolved base chocolate row.
    pub base: CatalogItem,
    /// Resolved shape row.
    pub shape: CatalogItem,
    /// Resolved packaging row.
    pub packaging: CatalogItem,
    /// Resolved add-on rows, zero or more.
    pub add_ons: Vec<CatalogItem>,
    /// Message text (empty when none was given).
    pub message: String,
    /// Message style identifier.
    pub message_style: Option<String>,
    /// Server-computed total.
    pub total: Money,
}

/// What a successful submission returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// The new order's row id.
    pub order_id: i64,
    /// The new custom-configuration row id.
    pub custom_config_id: i64,
    /// The server-computed total.
    pub total_price: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("melted"), None);
    }

    #[test]
    fn test_request_parses_camel_case_body() {
        let json = r#"{
            "baseMaterial": "dark",
            "addOns": ["nuts"],
            "shape": "heart",
            "packaging": "gift",
            "message": "Hi!",
            "messageStyle": "script"
        }"#;

        let request: CustomOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.base_material, "dark");
        assert_eq!(request.add_ons, vec!["nuts"]);
        assert_eq!(request.message.as_deref(), Some("Hi!"));
    }

    #[test]
    fn test_request_optional_fields_default() {
        let json = r#"{"baseMaterial": "milk", "shape": "square", "packaging": "standard"}"#;
        let request: CustomOrderRequest = serde_json::from_str(json).unwrap();
        assert!(request.add_ons.is_empty());
        assert!(request.message.is_none());
        assert!(request.message_style.is_none());
    }

    #[test]
    fn test_request_ignores_client_total() {
        // A tampering client sending a total gets it dropped, not honored
        let json = r#"{
            "baseMaterial": "milk",
            "shape": "square",
            "packaging": "standard",
            "totalPrice": 0.01
        }"#;
        let request: CustomOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.base_material, "milk");
    }
}

//! Order Models
//!
//! The order is the terminal artifact of a successful checkout. The client
//! only ever reads these; order items are a frozen snapshot of the cart at
//! purchase time.

use serde::{Deserialize, Serialize};

use crate::jsonapi::Document;

/// Order fulfillment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Payment state, independent of fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

/// Shipping state, independent of payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    Pending,
    Shipped,
    Delivered,
}

/// Ecommerce Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_status: ShippingStatus,
    pub total_amount: f64,
    pub items: Vec<OrderItem>,
}

/// Read-only snapshot of a cart item at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, alias = "product_id")]
    pub product_id: String,

    #[serde(default)]
    pub quantity: u32,

    #[serde(default, alias = "unit_price")]
    pub unit_price: f64,

    #[serde(default)]
    pub total: f64,
}

/// Order attributes as the backend sends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAttributes {
    #[serde(default = "default_order_status")]
    pub status: OrderStatus,

    #[serde(default = "default_payment_status", alias = "payment_status")]
    pub payment_status: PaymentStatus,

    #[serde(default = "default_shipping_status", alias = "shipping_status")]
    pub shipping_status: ShippingStatus,

    #[serde(default, alias = "total_amount")]
    pub total_amount: f64,
}

fn default_order_status() -> OrderStatus {
    OrderStatus::Pending
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Pending
}

fn default_shipping_status() -> ShippingStatus {
    ShippingStatus::Pending
}

impl Order {
    /// Assemble an order from its JSON:API document with side-loaded items.
    #[must_use]
    pub fn from_document(document: &Document<OrderAttributes>) -> Self {
        let attributes = &document.data.attributes;

        let items = document
            .included_of::<OrderItem>("order-items")
            .into_iter()
            .map(|(_, item)| item)
            .collect();

        Self {
            id: document.data.id.clone().unwrap_or_default(),
            status: attributes.status,
            payment_status: attributes.payment_status,
            shipping_status: attributes.shipping_status,
            total_amount: attributes.total_amount,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn fresh_order_defaults_to_pending_everywhere() -> TestResult {
        let document = serde_json::from_value(json!({
            "data": {"type": "ecommerce-orders", "id": "o1", "attributes": {"totalAmount": 212.0}}
        }))?;

        let order = Order::from_document(&document);

        assert_eq!(order.id, "o1");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.shipping_status, ShippingStatus::Pending);
        assert!(order.items.is_empty());

        Ok(())
    }

    #[test]
    fn order_items_snapshot_is_collected_from_included() -> TestResult {
        let document = serde_json::from_value(json!({
            "data": {
                "type": "ecommerce-orders",
                "id": "o1",
                "attributes": {"status": "confirmed", "total_amount": 232.0}
            },
            "included": [{
                "type": "order-items",
                "id": "oi1",
                "attributes": {"productId": "p1", "quantity": 2, "unitPrice": 100.0, "total": 232.0}
            }]
        }))?;

        let order = Order::from_document(&document);

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);

        Ok(())
    }
}

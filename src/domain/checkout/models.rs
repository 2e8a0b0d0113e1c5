//! Checkout Session Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::jsonapi::Document;

/// Client-visible checkout session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Initial state, collecting addresses and shipping method.
    Pending,
    /// Payment has begun.
    PaymentPending,
    /// The session produced an order.
    Completed,
    /// Payment or conversion failed.
    Failed,
    /// Abandoned by the customer.
    Cancelled,
}

impl SessionStatus {
    /// Whether no further status transition may be issued for this session.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Checkout Session Model
///
/// One per checkout attempt, bound to a single cart. Totals mirror the
/// cart's server-computed values; `total = subtotal + shipping + tax -
/// discount` is the backend's invariant, asserted here only in tests.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub cart_id: Option<String>,
    pub status: SessionStatus,
    pub shipping_address_id: Option<String>,
    pub billing_address_id: Option<String>,
    pub subtotal_amount: f64,
    pub shipping_amount: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    pub payment_intent_id: Option<String>,
    pub sales_order_id: Option<String>,
    pub completed_at: Option<Timestamp>,
}

/// Session attributes as the backend sends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionAttributes {
    pub status: SessionStatus,

    #[serde(default, alias = "shipping_address_id")]
    pub shipping_address_id: Option<String>,

    #[serde(default, alias = "billing_address_id")]
    pub billing_address_id: Option<String>,

    #[serde(default, alias = "subtotal_amount")]
    pub subtotal_amount: f64,

    #[serde(default, alias = "shipping_amount")]
    pub shipping_amount: f64,

    #[serde(default, alias = "tax_amount")]
    pub tax_amount: f64,

    #[serde(default, alias = "discount_amount")]
    pub discount_amount: f64,

    #[serde(default, alias = "total_amount")]
    pub total_amount: f64,

    #[serde(default, alias = "payment_method")]
    pub payment_method: Option<String>,

    #[serde(default, alias = "payment_intent_id")]
    pub payment_intent_id: Option<String>,

    #[serde(default, alias = "sales_order_id")]
    pub sales_order_id: Option<String>,

    #[serde(default, alias = "completed_at")]
    pub completed_at: Option<Timestamp>,
}

impl CheckoutSession {
    /// Assemble a session from its JSON:API document.
    #[must_use]
    pub fn from_document(document: &Document<CheckoutSessionAttributes>) -> Self {
        let attributes = &document.data.attributes;

        let cart_id = document
            .data
            .relationships
            .get("shoppingCart")
            .map(|relationship| relationship.data.id.clone());

        Self {
            id: document.data.id.clone().unwrap_or_default(),
            cart_id,
            status: attributes.status,
            shipping_address_id: attributes.shipping_address_id.clone(),
            billing_address_id: attributes.billing_address_id.clone(),
            subtotal_amount: attributes.subtotal_amount,
            shipping_amount: attributes.shipping_amount,
            tax_amount: attributes.tax_amount,
            discount_amount: attributes.discount_amount,
            total_amount: attributes.total_amount,
            payment_method: attributes.payment_method.clone(),
            payment_intent_id: attributes.payment_intent_id.clone(),
            sales_order_id: attributes.sales_order_id.clone(),
            completed_at: attributes.completed_at,
        }
    }
}

/// New checkout session bound to a cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckoutSession {
    #[serde(skip)]
    pub cart_id: String,
}

/// Partial session update. Only set fields travel.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pending_is_not_terminal_but_completed_is() {
        assert!(!SessionStatus::Pending.is_terminal());
        assert!(!SessionStatus::PaymentPending.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn session_totals_reflect_backend_invariant() -> TestResult {
        let document = serde_json::from_value(json!({
            "data": {
                "type": "checkout-sessions",
                "id": "cs1",
                "attributes": {
                    "status": "pending",
                    "subtotal_amount": 100.0,
                    "shipping_amount": 10.0,
                    "tax_amount": 16.0,
                    "discount_amount": 5.0,
                    "total_amount": 121.0
                }
            }
        }))?;

        let session = CheckoutSession::from_document(&document);

        assert_eq!(
            session.total_amount,
            session.subtotal_amount + session.shipping_amount + session.tax_amount
                - session.discount_amount
        );
        assert_eq!(session.total_amount, 121.0);

        Ok(())
    }

    #[test]
    fn session_picks_cart_id_from_relationships() -> TestResult {
        let document = serde_json::from_value(json!({
            "data": {
                "type": "checkout-sessions",
                "id": "cs1",
                "attributes": {"status": "payment_pending"},
                "relationships": {
                    "shoppingCart": {"data": {"type": "shopping-carts", "id": "c9"}}
                }
            }
        }))?;

        let session = CheckoutSession::from_document(&document);

        assert_eq!(session.cart_id.as_deref(), Some("c9"));
        assert_eq!(session.status, SessionStatus::PaymentPending);

        Ok(())
    }

    #[test]
    fn update_serializes_only_set_fields() -> TestResult {
        let update = CheckoutSessionUpdate {
            shipping_method: Some("standard".to_owned()),
            shipping_amount: Some(10.0),
            ..CheckoutSessionUpdate::default()
        };

        let value = serde_json::to_value(&update)?;

        assert_eq!(value, json!({"shippingMethod": "standard", "shippingAmount": 10.0}));

        Ok(())
    }
}

//! Cart Models

use serde::{Deserialize, Serialize};

use crate::{
    domain::addresses::models::AddressFields,
    jsonapi::Document,
};

/// Cart Model
///
/// Normalized client-side view of a shopping cart. Every amount is the
/// server's authoritative value; the client never recomputes totals.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: String,
    pub session_id: Option<String>,
    pub subtotal_amount: f64,
    pub tax_amount: f64,
    pub discount_amount: Option<f64>,
    pub total_amount: f64,
    pub coupon_code: Option<String>,
    pub items: Vec<CartItem>,
}

/// CartItem Model
#[derive(Debug, Clone)]
pub struct CartItem {
    pub id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
    pub original_price: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Cart attributes as the backend sends them.
///
/// Read paths accept either camelCase or snake_case keys; this struct is
/// the single place that tolerance lives. Amounts default to 0 when the
/// backend omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAttributes {
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,

    #[serde(default, alias = "subtotal_amount")]
    pub subtotal_amount: f64,

    #[serde(default, alias = "tax_amount")]
    pub tax_amount: f64,

    #[serde(default, alias = "discount_amount")]
    pub discount_amount: Option<f64>,

    #[serde(default, alias = "total_amount")]
    pub total_amount: f64,

    #[serde(default, alias = "coupon_code")]
    pub coupon_code: Option<String>,
}

/// Cart item attributes as the backend sends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemAttributes {
    #[serde(default, alias = "product_id")]
    pub product_id: String,

    #[serde(default, alias = "variant_id")]
    pub variant_id: Option<String>,

    #[serde(default)]
    pub quantity: u32,

    #[serde(default, alias = "unit_price")]
    pub unit_price: f64,

    #[serde(default, alias = "original_price")]
    pub original_price: f64,

    #[serde(default)]
    pub subtotal: f64,

    #[serde(default, alias = "tax_amount")]
    pub tax_amount: f64,

    #[serde(default)]
    pub total: f64,
}

impl Cart {
    /// Assemble a cart from a JSON:API document with side-loaded items.
    #[must_use]
    pub fn from_document(document: &Document<CartAttributes>) -> Self {
        let attributes = &document.data.attributes;

        let items = document
            .included_of::<CartItemAttributes>("cart-items")
            .into_iter()
            .map(|(id, attributes)| CartItem::from_attributes(id, attributes))
            .collect();

        Self {
            id: document.data.id.clone().unwrap_or_default(),
            session_id: attributes.session_id.clone(),
            subtotal_amount: attributes.subtotal_amount,
            tax_amount: attributes.tax_amount,
            discount_amount: attributes.discount_amount,
            total_amount: attributes.total_amount,
            coupon_code: attributes.coupon_code.clone(),
            items,
        }
    }
}

impl CartItem {
    /// Build an item from its resource id plus normalized attributes.
    #[must_use]
    pub fn from_attributes(id: String, attributes: CartItemAttributes) -> Self {
        Self {
            id,
            product_id: attributes.product_id,
            variant_id: attributes.variant_id,
            quantity: attributes.quantity,
            unit_price: attributes.unit_price,
            original_price: attributes.original_price,
            subtotal: attributes.subtotal,
            tax_amount: attributes.tax_amount,
            total: attributes.total,
        }
    }
}

/// New Cart Data
///
/// A `None` session id is filled in by the service from the client
/// configuration, so an anonymous cart is always correlated with the
/// session that created it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// New Cart Item Data
///
/// The cart and product references travel as JSON:API relationships, not
/// attributes.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub cart_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: u32,
    pub unit_price: Option<f64>,
}

/// Attribute payload for a new cart item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItemAttributes {
    pub quantity: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
}

/// Partial cart update. Only set fields travel.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Partial cart item update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemUpdate {
    pub quantity: u32,
}

/// Checkout payload sent with the cart-to-order conversion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub customer_name: String,
    pub customer_email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    pub shipping_address: AddressFields,

    /// Omitted when billing is the same as shipping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AddressFields>,
}

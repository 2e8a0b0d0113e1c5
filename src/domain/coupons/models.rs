//! Coupon Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// How a coupon reduces the cart total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Reduce the total by a percentage of the subtotal.
    Percentage,
    /// Flat currency reduction.
    FixedAmount,
    /// Zero out the shipping cost.
    FreeShipping,
}

/// Coupon Model
///
/// Validity rules (window, minimum order, usage limit) are enforced by the
/// backend; these fields exist so the UI can explain a rejection, not so
/// the client can re-validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,

    #[serde(alias = "discount_type")]
    pub discount_type: DiscountType,

    #[serde(default, alias = "discount_value")]
    pub discount_value: f64,

    #[serde(default, alias = "min_order_amount")]
    pub min_order_amount: Option<f64>,

    #[serde(default, alias = "max_discount")]
    pub max_discount: Option<f64>,

    #[serde(default, alias = "usage_limit")]
    pub usage_limit: Option<u32>,

    #[serde(default, alias = "usage_count")]
    pub usage_count: u32,

    #[serde(default, alias = "start_date")]
    pub start_date: Option<Timestamp>,

    #[serde(default, alias = "end_date")]
    pub end_date: Option<Timestamp>,

    #[serde(default, alias = "is_active")]
    pub is_active: bool,
}

/// Backend verdict on a coupon code.
///
/// Business rejections arrive as `{valid: false, error}` values, never as
/// transport errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidation {
    pub valid: bool,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub coupon: Option<Coupon>,

    #[serde(default, alias = "discount_amount")]
    pub discount_amount: Option<f64>,

    /// Recomputed cart total, when the backend echoes it back.
    #[serde(default, alias = "total_amount")]
    pub total_amount: Option<f64>,
}

/// Result of attaching a coupon to a cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponOutcome {
    /// The discount is now on the cart.
    Applied {
        /// Server-computed discount amount.
        discount_amount: f64,
        /// Recomputed cart total, when the backend echoes it.
        total_amount: Option<f64>,
    },

    /// The backend refused the code for a business reason.
    Rejected {
        /// Human-readable reason, e.g. `"Coupon has expired"`.
        error: String,
    },
}

//! Coupons service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    domain::coupons::{
        errors::CouponsApiError,
        models::{CouponOutcome, CouponValidation},
    },
    http::{ApiClient, ApiError},
};

/// Canonical form of a coupon code: trimmed, uppercase.
///
/// Applied once here so every request carries the same spelling the
/// backend indexes by.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// HTTP implementation of [`CouponsApi`].
#[derive(Debug, Clone)]
pub struct HttpCouponsApi {
    api: ApiClient,
}

impl HttpCouponsApi {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CouponsApi for HttpCouponsApi {
    #[tracing::instrument(name = "coupons.api.validate", skip(self), err)]
    async fn validate_coupon(
        &self,
        code: &str,
        cart_total: f64,
    ) -> Result<CouponValidation, CouponsApiError> {
        let code = normalize_code(code);
        let cart_total = cart_total.to_string();

        let result: Result<CouponValidation, ApiError> = self
            .api
            .get(
                &format!("/coupons/validate/{code}"),
                &[("cart_total", cart_total.as_str())],
            )
            .await;

        match result {
            Ok(validation) => Ok(validation),
            // An unknown code is a rejection, not a failure.
            Err(ApiError::NotFound) => Ok(CouponValidation {
                valid: false,
                error: Some("Coupon not found".to_owned()),
                coupon: None,
                discount_amount: None,
                total_amount: None,
            }),
            Err(other) => Err(other.into()),
        }
    }

    #[tracing::instrument(
        name = "coupons.api.apply",
        skip(self, code),
        fields(cart_id = %cart_id),
        err
    )]
    async fn apply_coupon(
        &self,
        cart_id: &str,
        code: &str,
    ) -> Result<CouponOutcome, CouponsApiError> {
        let code = normalize_code(code);
        let body = serde_json::json!({ "code": code });

        let result: Result<CouponValidation, ApiError> = self
            .api
            .post(&format!("/shopping-carts/{cart_id}/apply-coupon"), &body)
            .await;

        let validation = match result {
            Ok(validation) => validation,
            Err(ApiError::Status { status, body }) if status.as_u16() == 422 => {
                match serde_json::from_str::<CouponValidation>(&body) {
                    Ok(validation) => validation,
                    // Body was not a validation verdict after all.
                    Err(_) => return Err(CouponsApiError::Api(ApiError::Status { status, body })),
                }
            }
            Err(other) => return Err(other.into()),
        };

        if !validation.valid {
            return Ok(CouponOutcome::Rejected {
                error: validation
                    .error
                    .unwrap_or_else(|| "Coupon was rejected".to_owned()),
            });
        }

        let discount_amount = validation.discount_amount.unwrap_or_default();

        info!(%code, discount_amount, "applied coupon");

        Ok(CouponOutcome::Applied {
            discount_amount,
            total_amount: validation.total_amount,
        })
    }

    #[tracing::instrument(name = "coupons.api.remove", skip(self), err)]
    async fn remove_coupon(&self, cart_id: &str) -> Result<(), CouponsApiError> {
        let body = serde_json::json!({});

        let result = self
            .api
            .post_unit(&format!("/shopping-carts/{cart_id}/remove-coupon"), &body)
            .await;

        match result {
            // Safe when no coupon is applied.
            Ok(()) | Err(ApiError::NotFound) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }
}

/// Typed access to the coupon endpoints.
#[automock]
#[async_trait]
pub trait CouponsApi: Send + Sync {
    /// Check a code against a cart total without mutating the cart.
    async fn validate_coupon(
        &self,
        code: &str,
        cart_total: f64,
    ) -> Result<CouponValidation, CouponsApiError>;

    /// Attach the coupon's discount to the cart. Applying over an existing
    /// coupon replaces it; the server decides the semantics.
    async fn apply_coupon(
        &self,
        cart_id: &str,
        code: &str,
    ) -> Result<CouponOutcome, CouponsApiError>;

    /// Clear the applied discount. Safe to call when none is applied.
    async fn remove_coupon(&self, cart_id: &str) -> Result<(), CouponsApiError>;
}

//! Coupons service errors.

use thiserror::Error;

use crate::http::ApiError;

/// Errors surfaced by the coupons API service.
///
/// Business rejections (expired, inactive, below minimum, exhausted) are
/// not errors; they come back as [`crate::domain::coupons::models::CouponOutcome::Rejected`]
/// or a `valid: false` validation value.
#[derive(Debug, Error)]
pub enum CouponsApiError {
    /// The target cart does not exist.
    #[error("cart not found")]
    CartNotFound,

    /// Transport or unexpected server failure.
    #[error("coupon request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for CouponsApiError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::CartNotFound,
            other => Self::Api(other),
        }
    }
}

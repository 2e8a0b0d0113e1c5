//! Checkout session service errors.

use thiserror::Error;

use crate::http::ApiError;

/// Errors surfaced by the checkout-sessions API service.
#[derive(Debug, Error)]
pub enum CheckoutApiError {
    /// The session does not exist.
    #[error("checkout session not found")]
    NotFound,

    /// The backend rejected the session payload.
    #[error("invalid checkout session payload: {0}")]
    InvalidData(String),

    /// Transport or unexpected server failure.
    #[error("checkout session request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for CheckoutApiError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::NotFound,
            ApiError::Status { status, body } if status.as_u16() == 422 => Self::InvalidData(body),
            other => Self::Api(other),
        }
    }
}

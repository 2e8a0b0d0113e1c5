//! Carts service errors.

use thiserror::Error;

use crate::http::ApiError;

/// Errors surfaced by the carts API service.
#[derive(Debug, Error)]
pub enum CartsApiError {
    /// The cart or item does not exist.
    #[error("cart or item not found")]
    NotFound,

    /// The backend rejected the request payload.
    #[error("invalid cart payload: {0}")]
    InvalidData(String),

    /// Transport or unexpected server failure.
    #[error("cart request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for CartsApiError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::NotFound,
            ApiError::Status { status, body } if status.as_u16() == 422 => Self::InvalidData(body),
            other => Self::Api(other),
        }
    }
}

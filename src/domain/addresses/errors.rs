//! Addresses service errors.

use thiserror::Error;

use crate::http::ApiError;

/// Errors surfaced by the addresses API service.
#[derive(Debug, Error)]
pub enum AddressesApiError {
    /// The backend rejected the address payload.
    #[error("invalid address payload: {0}")]
    InvalidData(String),

    /// Transport or unexpected server failure.
    #[error("address request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for AddressesApiError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status { status, body } if status.as_u16() == 422 => Self::InvalidData(body),
            other => Self::Api(other),
        }
    }
}

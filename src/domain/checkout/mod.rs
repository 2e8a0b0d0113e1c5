//! Checkout sessions

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CheckoutApiError;
pub use service::*;

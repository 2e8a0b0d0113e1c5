//! Coupons

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CouponsApiError;
pub use service::*;

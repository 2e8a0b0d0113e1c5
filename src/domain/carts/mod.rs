//! Carts

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CartsApiError;
pub use service::*;

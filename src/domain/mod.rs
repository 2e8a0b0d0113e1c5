//! Entity models and API services.

pub mod addresses;
pub mod carts;
pub mod checkout;
pub mod coupons;
pub mod orders;

//! Storefront client SDK: cart and checkout orchestration against a
//! JSON:API commerce backend.
//!
//! The backend owns every authoritative computation (totals, discount
//! validity, inventory). This crate is the coordinating side: typed API
//! services per entity, a cart state holder with per-operation request
//! state, a coupon application state machine, and a checkout flow that
//! turns a cart into an order.

pub mod batch;
pub mod config;
pub mod domain;
pub mod flow;
pub mod http;
pub mod jsonapi;
pub mod state;

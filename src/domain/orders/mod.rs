//! Orders

pub mod models;

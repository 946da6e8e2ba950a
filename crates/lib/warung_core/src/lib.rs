//! # warung_core
//!
//! Core domain logic for Warung Makan: signed access tokens, the bearer
//! token guard, order pricing against menu stock, and the atomic order
//! commit.

pub mod auth;
pub mod config;
pub mod menus;
pub mod migrate;
pub mod models;
pub mod orders;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

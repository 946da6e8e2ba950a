//! Domain models shared across core modules and the HTTP layer.

pub mod auth;
pub mod menu;
pub mod order;

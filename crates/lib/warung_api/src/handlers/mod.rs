//! Request handlers.

pub mod auth;
pub mod health;
pub mod menus;
pub mod transactions;
pub mod users;

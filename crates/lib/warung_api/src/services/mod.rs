//! Business services behind the handlers.

pub mod auth;
pub mod users;

//! Route definitions for the Gatehouse API

mod auth;

pub use auth::auth_routes;

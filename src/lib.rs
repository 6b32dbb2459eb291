//! Gatehouse
//!
//! A stateless JWT authentication backend: signup and login issue an
//! access/refresh token pair, and every subsequent request is authenticated
//! from its bearer access token. No server-side sessions.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

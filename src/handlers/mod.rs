//! HTTP handlers for the Gatehouse API

pub mod auth;

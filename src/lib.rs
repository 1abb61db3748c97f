//! Deskline - a client library for the service-ticket API.
//!
//! The heart of the crate is [`api::ApiClient`]: an authenticated HTTP
//! client that injects the stored bearer token on every request and maps
//! a 401 response to the typed [`api::ApiError::Unauthorized`] signal.
//! The [`app`] module is the boundary that reacts to that signal by
//! clearing the session and sending the user back through login.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

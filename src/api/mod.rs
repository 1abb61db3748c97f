//! REST API client module for the service-ticket backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! ticket API: authentication, ticket creation and lookup, and the
//! supervisor/admin management endpoints.
//!
//! The API uses JWT bearer token authentication obtained through the
//! `/auth/login` endpoint; the token is injected on every request from
//! the shared session store.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

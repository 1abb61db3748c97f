//! Authentication module for managing sessions and credentials.
//!
//! This module provides:
//! - `TokenSource`: the read-only view of the bearer token the API client
//!   depends on
//! - `Session` / `SharedSession`: token-based session state persisted to disk
//! - `CredentialStore`: secure OS-level credential storage via keyring
//!
//! Sessions expire after the lifetime reported by the login endpoint.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{Session, SessionData, SharedSession};

/// Read-only access to the current bearer token.
///
/// The API client reads the token through this trait on every request and
/// never writes it; the login flow owns all writes. The read is synchronous
/// and implementations must not perform network I/O.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

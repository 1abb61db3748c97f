use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Access roles recognized by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
    Supervisor,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Administrator",
            Role::Supervisor => "Supervisor",
        }
    }

    /// Parse a role from user input (case-insensitive)
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "supervisor" => Some(Role::Supervisor),
            _ => None,
        }
    }
}

/// An application user as returned by the admin endpoints.
/// The password field is never present in responses.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    // Jackson renders the Lombok boolean as either name depending on
    // accessor generation, so accept both
    #[serde(rename = "isLocked", alias = "locked", default)]
    pub is_locked: bool,
    #[serde(rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
}

/// Successful login response carrying the bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

/// Payload for registering a new user.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Payload for the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

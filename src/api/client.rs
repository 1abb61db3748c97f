//! API client for communicating with the service-ticket REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests: every request reads the bearer token through the shared
//! `TokenSource` and injects it as an `Authorization` header; every
//! non-success response is mapped to a typed `ApiError`, with 401
//! becoming the `Unauthorized` signal the app boundary acts on.

use std::sync::Arc;

use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::TokenSource;
use crate::models::{LoginRequest, RegisterRequest, Ticket, TicketRequest, TokenResponse, User};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    message: String,
}

/// API client for the service-ticket backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
///
/// The client is immutable after construction: the base address is resolved
/// once by the caller and the token is read through `TokenSource` per call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    /// Create a new API client against the given base address.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Inject the bearer token into the given headers.
    ///
    /// Overwrite-safe: `HeaderMap::insert` replaces any previous value, so
    /// applying this twice leaves exactly one `Authorization` header. An
    /// absent or empty token leaves the headers untouched and the request
    /// proceeds unauthenticated.
    pub fn apply_auth(&self, headers: &mut header::HeaderMap) {
        let Some(token) = self.tokens.token().filter(|t| !t.is_empty()) else {
            return;
        };
        match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                headers.insert(header::AUTHORIZATION, value);
            }
            Err(e) => {
                // A token that is not a valid header value cannot have come
                // from the server; proceed unauthenticated and let the 401
                // path force a re-login.
                warn!(error = %e, "Stored token is not a valid header value, skipping");
            }
        }
    }

    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        self.apply_auth(&mut headers);
        headers
    }

    /// Check if response is successful, returning a typed error with the
    /// body if not. The error is always surfaced to the caller; nothing is
    /// retried or suppressed here.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Request failed");
            Err(ApiError::from_status(status, &body))
        }
    }

    /// GET a relative path and deserialize the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_headers())
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, path).await
    }

    /// POST a JSON body to a relative path and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, path).await
    }

    /// PATCH a relative path with query parameters, returning the plain
    /// text body the server answers with.
    pub async fn patch_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        let response = self
            .client
            .patch(self.url(path))
            .headers(self.auth_headers())
            .query(query)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.text().await?)
    }

    /// GET a relative path that may legitimately answer 204 No Content,
    /// in which case an empty list is returned.
    async fn get_json_or_empty<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_headers())
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let response = Self::check_response(response).await?;
        Self::parse_json(response, path).await
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    // ===== Authentication =====

    /// Authenticate and return the bearer token with its lifetime.
    /// The caller (login flow) owns persisting it; this client never
    /// writes the token store.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.post_json("/auth/login", &request).await;
        debug!(username, ok = response.is_ok(), "Login attempt completed");
        response
    }

    /// Register a new user, returning the server's confirmation message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, ApiError> {
        let response: RegisterResponse = self.post_json("/auth/register", request).await?;
        Ok(response.message)
    }

    // ===== Tickets =====

    /// Create a new service ticket; the server assigns the protocol number.
    pub async fn create_ticket(&self, request: &TicketRequest) -> Result<Ticket, ApiError> {
        self.post_json("/atendimentos", request).await
    }

    /// Fetch all tickets for a customer CPF.
    pub async fn tickets_by_cpf(&self, cpf: &str) -> Result<Vec<Ticket>, ApiError> {
        self.get_json(&format!("/atendimentos/cpf/{}", cpf)).await
    }

    /// Fetch a ticket by its protocol number.
    pub async fn ticket_by_protocol(&self, protocolo: &str) -> Result<Ticket, ApiError> {
        self.get_json(&format!("/atendimentos/protocolo/{}", protocolo))
            .await
    }

    // ===== Supervisor =====

    /// Fetch all tickets (requires the supervisor role).
    pub async fn all_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.get_json("/supervisor/atendimentos").await
    }

    /// Update a ticket's description (requires the supervisor role).
    pub async fn update_ticket_description(
        &self,
        ticket_id: i64,
        description: &str,
    ) -> Result<String, ApiError> {
        self.patch_text(
            &format!("/supervisor/atendimentos/{}/editar", ticket_id),
            &[("novaDescricao", description)],
        )
        .await
    }

    /// Fetch all tickets registered by an agent (requires the supervisor
    /// role). Answers 204 when the agent has no tickets.
    pub async fn tickets_by_agent(&self, agent_id: i64) -> Result<Vec<Ticket>, ApiError> {
        self.get_json_or_empty(&format!("/supervisor/atendimentos/atendente/{}", agent_id))
            .await
    }

    // ===== Admin =====

    /// Fetch all users (requires the admin role).
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/admin/users").await
    }

    /// Fetch all locked users (requires the admin role). Answers 204 when
    /// no users are locked.
    pub async fn list_blocked_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json_or_empty("/admin/users/blocked").await
    }

    /// Lock a user account (requires the admin role).
    pub async fn block_user(&self, user_id: i64) -> Result<String, ApiError> {
        self.patch_text(&format!("/admin/users/{}/block", user_id), &[])
            .await
    }
}

//! End-to-end tests for the authenticated API client against a mock
//! HTTP server: token injection, error mapping, and pass-through
//! behavior on success and failure.

use std::sync::Arc;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deskline::api::{ApiClient, ApiError};
use deskline::auth::TokenSource;
use deskline::models::{Ticket, TicketRequest};

struct StaticTokens(Option<String>);

impl TokenSource for StaticTokens {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
    ApiClient::new(
        server.uri(),
        Arc::new(StaticTokens(token.map(str::to_string))),
    )
    .expect("Failed to build client")
}

const TICKET_JSON: &str = r#"{
    "protocolo": "550e8400-e29b-41d4-a716-446655440000",
    "nomeCliente": "Maria Souza",
    "cpf": "11144477735",
    "descricao": "Internet intermitente",
    "tipo": "Suporte",
    "createdAt": "2024-11-02T14:30:00"
}"#;

#[tokio::test]
async fn request_carries_bearer_token_from_store() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/atendimentos/cpf/11144477735"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Some("tok-abc"));
    let tickets = client.tickets_by_cpf("11144477735").await.unwrap();
    assert!(tickets.is_empty());
}

#[tokio::test]
async fn request_without_token_has_no_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/atendimentos/cpf/11144477735"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .expect(2)
        .mount(&server)
        .await;

    // No token at all, and an empty string in the store - both must
    // leave the request unauthenticated.
    for token in [None, Some("")] {
        let client = client(&server, token);
        client.tickets_by_cpf("11144477735").await.unwrap();
    }

    for request in server.received_requests().await.unwrap() {
        assert!(
            !request.headers.contains_key("authorization"),
            "Authorization header must not be set without a token"
        );
    }
}

#[tokio::test]
async fn successful_response_passes_through_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/atendimentos/protocolo/550e8400-e29b-41d4-a716-446655440000"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(TICKET_JSON, "application/json"))
        .mount(&server)
        .await;

    let client = client(&server, Some("tok-abc"));
    let ticket: Ticket = client
        .ticket_by_protocol("550e8400-e29b-41d4-a716-446655440000")
        .await
        .unwrap();

    assert_eq!(ticket.protocolo, "550e8400-e29b-41d4-a716-446655440000");
    assert_eq!(ticket.customer_name, "Maria Souza");
    assert_eq!(ticket.cpf, "11144477735");
    assert_eq!(ticket.description, "Internet intermitente");
    assert_eq!(ticket.kind, "Suporte");
}

#[tokio::test]
async fn unauthorized_response_maps_to_typed_signal_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/supervisor/atendimentos"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1) // exactly one request - the client never retries
        .mount(&server)
        .await;

    let client = client(&server, Some("stale-token"));
    let error = client.all_tickets().await.unwrap_err();
    assert!(error.is_unauthorized(), "Expected Unauthorized, got {:?}", error);
}

#[tokio::test]
async fn non_401_errors_pass_through_without_unauthorized_signal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/supervisor/atendimentos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Some("tok-abc"));
    match client.all_tickets().await.unwrap_err() {
        ApiError::ServerError(body) => assert!(body.contains("database unavailable")),
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn create_ticket_posts_wire_format_and_parses_protocol() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/atendimentos"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(TICKET_JSON, "application/json"))
        .mount(&server)
        .await;

    let client = client(&server, Some("tok-abc"));
    let request = TicketRequest {
        customer_name: "Maria Souza".to_string(),
        cpf: "11144477735".to_string(),
        description: "Internet intermitente".to_string(),
        kind: "Suporte".to_string(),
    };
    let ticket = client.create_ticket(&request).await.unwrap();
    assert_eq!(ticket.protocolo, "550e8400-e29b-41d4-a716-446655440000");

    // The body on the wire uses the upstream field names
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["nomeCliente"], "Maria Souza");
    assert_eq!(body["descricao"], "Internet intermitente");
    assert_eq!(body["tipo"], "Suporte");
}

#[tokio::test]
async fn login_returns_token_without_writing_store() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"token": "fresh-token", "expiresIn": 3600}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = client(&server, None);
    let response = client.login("maria", "s3cret").await.unwrap();
    assert_eq!(response.token, "fresh-token");
    assert_eq!(response.expires_in, 3600);
}

#[tokio::test]
async fn no_content_answers_become_empty_lists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/supervisor/atendimentos/atendente/42"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client(&server, Some("tok-abc"));
    let tickets = client.tickets_by_agent(42).await.unwrap();
    assert!(tickets.is_empty());
}

#[tokio::test]
async fn edit_ticket_sends_description_as_query_param() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/supervisor/atendimentos/7/editar"))
        .and(query_param("novaDescricao", "resolved by restart"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Descrição atualizada com sucesso."))
        .mount(&server)
        .await;

    let client = client(&server, Some("tok-abc"));
    let message = client
        .update_ticket_description(7, "resolved by restart")
        .await
        .unwrap();
    assert!(message.contains("atualizada"));
}

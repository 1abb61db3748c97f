use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::format_cpf;

/// A service ticket as returned by the API.
///
/// The upstream wire format uses Portuguese camelCase field names
/// (`nomeCliente`, `descricao`, ...); they are mapped to English
/// snake_case here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique protocol number assigned by the server (a UUID string).
    pub protocolo: String,
    #[serde(rename = "nomeCliente")]
    pub customer_name: String,
    pub cpf: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
}

impl Ticket {
    /// CPF formatted for display (XXX.XXX.XXX-XX)
    pub fn cpf_display(&self) -> String {
        format_cpf(&self.cpf)
    }

    /// Creation timestamp formatted for display, or a dash when the
    /// server omitted it.
    pub fn created_display(&self) -> String {
        self.created_at
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Payload for creating a new ticket.
#[derive(Debug, Clone, Serialize)]
pub struct TicketRequest {
    #[serde(rename = "nomeCliente")]
    pub customer_name: String,
    pub cpf: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticket_response() {
        let json = r#"{
            "protocolo": "550e8400-e29b-41d4-a716-446655440000",
            "nomeCliente": "Maria Souza",
            "cpf": "11144477735",
            "descricao": "Internet intermitente desde ontem",
            "tipo": "Suporte",
            "createdAt": "2024-11-02T14:30:00"
        }"#;

        let ticket: Ticket = serde_json::from_str(json).expect("Failed to parse ticket JSON");
        assert_eq!(ticket.protocolo, "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(ticket.customer_name, "Maria Souza");
        assert_eq!(ticket.kind, "Suporte");
        assert_eq!(ticket.cpf_display(), "111.444.777-35");
        assert_eq!(ticket.created_display(), "2024-11-02 14:30");
    }

    #[test]
    fn test_parse_ticket_without_timestamp() {
        let json = r#"{
            "protocolo": "abc",
            "nomeCliente": "Jose",
            "cpf": "11144477735",
            "descricao": "x",
            "tipo": "Reclamacao"
        }"#;

        let ticket: Ticket = serde_json::from_str(json).expect("Failed to parse ticket JSON");
        assert_eq!(ticket.created_display(), "-");
    }

    #[test]
    fn test_ticket_request_wire_names() {
        let request = TicketRequest {
            customer_name: "Maria Souza".to_string(),
            cpf: "11144477735".to_string(),
            description: "Fatura duplicada".to_string(),
            kind: "Financeiro".to_string(),
        };

        let value = serde_json::to_value(&request).expect("Failed to serialize request");
        assert_eq!(value["nomeCliente"], "Maria Souza");
        assert_eq!(value["descricao"], "Fatura duplicada");
        assert_eq!(value["tipo"], "Financeiro");
        assert_eq!(value["cpf"], "11144477735");
    }
}

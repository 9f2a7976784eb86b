use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::now_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Aberto,
    EmAndamento,
    Pausado,
    Encerrado,
    // Declared but unreferenced by any transition rule
    Cancelado,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Aberto => write!(f, "ABERTO"),
            TicketStatus::EmAndamento => write!(f, "EM_ANDAMENTO"),
            TicketStatus::Pausado => write!(f, "PAUSADO"),
            TicketStatus::Encerrado => write!(f, "ENCERRADO"),
            TicketStatus::Cancelado => write!(f, "CANCELADO"),
        }
    }
}

// Convert from the stored TEXT value
impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "EM_ANDAMENTO" => TicketStatus::EmAndamento,
            "PAUSADO" => TicketStatus::Pausado,
            "ENCERRADO" => TicketStatus::Encerrado,
            "CANCELADO" => TicketStatus::Cancelado,
            _ => TicketStatus::Aberto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Baixa,
    Media,
    Alta,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Baixa => write!(f, "BAIXA"),
            Priority::Media => write!(f, "MEDIA"),
            Priority::Alta => write!(f, "ALTA"),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "MEDIA" => Priority::Media,
            "ALTA" => Priority::Alta,
            _ => Priority::Baixa,
        }
    }
}

/// A support ticket. Tickets are never physically deleted; closure is a
/// status transition that stamps closed_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub priority: Priority,
    pub status: TicketStatus,
    pub title: String,
    pub notes: Option<String>,
    pub client_id: String,
    pub technician_id: Option<String>,
}

impl Ticket {
    pub fn new(
        priority: Priority,
        title: String,
        notes: Option<String>,
        client_id: String,
        technician_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            opened_at: now_rfc3339(),
            closed_at: None,
            priority,
            status: TicketStatus::Aberto,
            title,
            notes,
            client_id,
            technician_id,
        }
    }
}

// DTOs for API requests/responses
#[derive(Debug, Clone, Deserialize)]
pub struct OpenTicketRequest {
    pub priority: Priority,
    pub title: String,
    pub notes: Option<String>,
    pub client_id: String,
    pub technician_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTicketRequest {
    pub priority: Priority,
    pub title: String,
    pub notes: Option<String>,
    pub client_id: String,
    pub technician_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignTechnicianRequest {
    pub technician_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub id: String,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub priority: Priority,
    pub status: TicketStatus,
    pub title: String,
    pub notes: Option<String>,
    pub client_id: String,
    pub client_name: Option<String>,
    pub technician_id: Option<String>,
    pub technician_name: Option<String>,
}

impl TicketResponse {
    pub fn from_ticket(
        ticket: Ticket,
        client_name: Option<String>,
        technician_name: Option<String>,
    ) -> Self {
        Self {
            id: ticket.id,
            opened_at: ticket.opened_at,
            closed_at: ticket.closed_at,
            priority: ticket.priority,
            status: ticket.status,
            title: ticket.title,
            notes: ticket.notes,
            client_id: ticket.client_id,
            client_name,
            technician_id: ticket.technician_id,
            technician_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket_starts_open_without_closure() {
        let ticket = Ticket::new(
            Priority::Alta,
            "Network failure".to_string(),
            None,
            "client-1".to_string(),
            None,
        );
        assert_eq!(ticket.status, TicketStatus::Aberto);
        assert!(ticket.closed_at.is_none());
        assert!(!ticket.opened_at.is_empty());
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            TicketStatus::Aberto,
            TicketStatus::EmAndamento,
            TicketStatus::Pausado,
            TicketStatus::Encerrado,
            TicketStatus::Cancelado,
        ] {
            assert_eq!(TicketStatus::from(status.to_string()), status);
        }
    }

    #[test]
    fn test_status_serializes_with_wire_labels() {
        let json = serde_json::to_string(&TicketStatus::EmAndamento).unwrap();
        assert_eq!(json, "\"EM_ANDAMENTO\"");
    }

    #[test]
    fn test_priority_round_trips_through_text() {
        for priority in [Priority::Baixa, Priority::Media, Priority::Alta] {
            assert_eq!(Priority::from(priority.to_string()), priority);
        }
    }
}
